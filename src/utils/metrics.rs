use std::fmt::Display;

/// Evaluation results for a binary classification run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    /// Fraction of predictions matching their targets
    pub accuracy: f64,

    /// Of the predicted positives, the fraction that are true positives
    pub precision: f64,

    /// Of the actual positives, the fraction that were predicted
    pub recall: f64,

    /// Harmonic mean of precision and recall
    pub f1: f64,
}

impl Display for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "accuracy: {:.4}, f1: {:.4}, precision: {:.4}, recall: {:.4}",
            self.accuracy, self.f1, self.precision, self.recall
        )
    }
}

/// Compute accuracy, precision, recall, and F1 for binary predictions
///
/// Precision, recall, and F1 are taken with respect to `positive_class`.
/// Degenerate cases (no predicted positives, no actual positives) yield 0.0
/// rather than NaN. Empty input yields all zeros.
pub fn binary_classification(
    predictions: &[usize],
    targets: &[usize],
    positive_class: usize,
) -> Metrics {
    assert_eq!(
        predictions.len(),
        targets.len(),
        "predictions and targets must have the same length"
    );

    if predictions.is_empty() {
        return Metrics {
            accuracy: 0.0,
            precision: 0.0,
            recall: 0.0,
            f1: 0.0,
        };
    }

    let mut correct = 0usize;
    let mut true_positives = 0usize;
    let mut predicted_positives = 0usize;
    let mut actual_positives = 0usize;

    for (&pred, &target) in predictions.iter().zip(targets) {
        if pred == target {
            correct += 1;
        }

        if pred == positive_class {
            predicted_positives += 1;

            if target == positive_class {
                true_positives += 1;
            }
        }

        if target == positive_class {
            actual_positives += 1;
        }
    }

    let accuracy = correct as f64 / predictions.len() as f64;

    let precision = if predicted_positives > 0 {
        true_positives as f64 / predicted_positives as f64
    } else {
        0.0
    };

    let recall = if actual_positives > 0 {
        true_positives as f64 / actual_positives as f64
    } else {
        0.0
    };

    let f1 = if precision + recall > 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };

    Metrics {
        accuracy,
        precision,
        recall,
        f1,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_perfect_predictions() {
        let metrics = binary_classification(&[0, 1, 1, 0], &[0, 1, 1, 0], 1);

        assert_eq!(
            metrics,
            Metrics {
                accuracy: 1.0,
                precision: 1.0,
                recall: 1.0,
                f1: 1.0,
            }
        );
    }

    #[test]
    fn test_mixed_predictions() {
        // TP = 1, FP = 1, FN = 1, TN = 1
        let metrics = binary_classification(&[1, 1, 0, 0], &[1, 0, 1, 0], 1);

        assert_eq!(metrics.accuracy, 0.5);
        assert_eq!(metrics.precision, 0.5);
        assert_eq!(metrics.recall, 0.5);
        assert_eq!(metrics.f1, 0.5);
    }

    #[test]
    fn test_no_predicted_positives() {
        let metrics = binary_classification(&[0, 0, 0], &[1, 1, 0], 1);

        assert_eq!(metrics.precision, 0.0);
        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_no_actual_positives() {
        let metrics = binary_classification(&[1, 0], &[0, 0], 1);

        assert_eq!(metrics.recall, 0.0);
        assert_eq!(metrics.f1, 0.0);
    }

    #[test]
    fn test_empty_input() {
        let metrics = binary_classification(&[], &[], 1);

        assert_eq!(
            metrics,
            Metrics {
                accuracy: 0.0,
                precision: 0.0,
                recall: 0.0,
                f1: 0.0,
            }
        );
    }

    #[test]
    fn test_metrics_within_unit_interval() {
        let metrics = binary_classification(&[1, 0, 1, 1, 0], &[1, 1, 0, 1, 0], 1);

        for value in [
            metrics.accuracy,
            metrics.precision,
            metrics.recall,
            metrics.f1,
        ] {
            assert!((0.0..=1.0).contains(&value));
        }
    }

    #[test]
    fn test_display_format() {
        let metrics = binary_classification(&[1, 1], &[1, 1], 1);

        assert_eq!(
            metrics.to_string(),
            "accuracy: 1.0000, f1: 1.0000, precision: 1.0000, recall: 1.0000"
        );
    }
}
