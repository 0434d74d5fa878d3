use burn::data::dataset::{self, Dataset as _, InMemDataset};
use derive_new::new;
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::pipelines::text_classification;

/// The name of the posts dataset
pub static DATASET: &str = "posts";

/// Class labels, indexed by class id
pub static LABELS: [&str; 2] = ["non-suicide", "suicide"];

/// The class id of the "suicide" label
pub const POSITIVE_CLASS: usize = 1;

/// Per-class row cap applied when balancing the dataset
pub const DEFAULT_ROWS_PER_CLASS: usize = 30_000;

/// Seed for the train/test shuffle
pub const SPLIT_SEED: u64 = 42;

/// Fraction of rows assigned to the training split
pub const TRAIN_FRACTION: f64 = 0.8;

/// Dataset Error
#[derive(thiserror::Error, Debug)]
pub enum DatasetError {
    /// The CSV file could not be read
    #[error("unable to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// A CSV row could not be parsed
    #[error("unable to parse dataset: {0}")]
    Csv(#[from] csv::Error),
}

/// A labeled social post
#[derive(Clone, Debug, Serialize, Deserialize, new)]
pub struct Item {
    /// The text of the post
    pub text: String,

    /// The class name of the post ("suicide" or "non-suicide")
    pub class: String,
}

impl text_classification::Item for Item {
    fn input(&self) -> &str {
        &self.text
    }

    fn class_label(&self) -> &str {
        &self.class
    }
}

/// Map a class name to its class id
pub fn label_id(class: &str) -> Option<usize> {
    LABELS.iter().position(|label| *label == class)
}

/// Balance the dataset by keeping at most `rows_per_class` rows per class
///
/// Rows keep their file order within each class. Rows with a class name
/// outside the label table are dropped.
pub fn balance(items: Vec<Item>, rows_per_class: usize) -> Vec<Item> {
    let mut buckets: Vec<Vec<Item>> = vec![Vec::new(); LABELS.len()];

    for item in items {
        if let Some(id) = label_id(&item.class) {
            if buckets[id].len() < rows_per_class {
                buckets[id].push(item);
            }
        }
    }

    buckets.into_iter().flatten().collect()
}

/// Partition items into train and test splits
///
/// The shuffle is seeded, so the same input always produces the same splits.
/// Every input row lands in exactly one split.
pub fn split(mut items: Vec<Item>, seed: u64, train_fraction: f64) -> (Vec<Item>, Vec<Item>) {
    let mut rng = StdRng::seed_from_u64(seed);
    items.shuffle(&mut rng);

    let n_train = (items.len() as f64 * train_fraction) as usize;
    let test = items.split_off(n_train);

    (items, test)
}

/// Struct for the posts dataset
pub struct Dataset {
    /// Underlying In-Memory dataset
    dataset: InMemDataset<Item>,
}

/// Implement the Dataset trait for the posts dataset
impl dataset::Dataset<Item> for Dataset {
    /// Returns a specific item from the dataset
    fn get(&self, index: usize) -> Option<Item> {
        self.dataset.get(index)
    }

    /// Returns the length of the dataset
    fn len(&self) -> usize {
        self.dataset.len()
    }
}

impl Dataset {
    /// Constructs a dataset from items already in memory
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            dataset: InMemDataset::new(items),
        }
    }

    /// Reads all rows from a CSV file with `text` and `class` columns
    pub fn read_csv(csv_path: &str) -> Result<Vec<Item>, DatasetError> {
        let mut reader = csv::Reader::from_path(csv_path)?;

        let items = reader
            .deserialize()
            .collect::<Result<Vec<Item>, csv::Error>>()?;

        Ok(items)
    }

    /// Loads the CSV, balances the classes, and splits into train and test
    pub fn load_splits(
        csv_path: &str,
        rows_per_class: usize,
    ) -> Result<(Self, Self), DatasetError> {
        let items = Self::read_csv(csv_path)?;
        let balanced = balance(items, rows_per_class);
        let (train, test) = split(balanced, SPLIT_SEED, TRAIN_FRACTION);

        Ok((Self::new(train), Self::new(test)))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn item(text: &str, class: &str) -> Item {
        Item::new(text.to_string(), class.to_string())
    }

    fn sample_items(per_class: usize) -> Vec<Item> {
        let mut items = Vec::new();

        for i in 0..per_class {
            items.push(item(&format!("dark post {i}"), "suicide"));
            items.push(item(&format!("ordinary post {i}"), "non-suicide"));
        }

        items
    }

    #[test]
    fn test_label_id_table() {
        assert_eq!(label_id("non-suicide"), Some(0));
        assert_eq!(label_id("suicide"), Some(1));
        assert_eq!(label_id("unrelated"), None);
    }

    #[test]
    fn test_balance_caps_each_class() {
        let balanced = balance(sample_items(10), 4);

        let suicide = balanced.iter().filter(|i| i.class == "suicide").count();
        let non_suicide = balanced.iter().filter(|i| i.class == "non-suicide").count();

        assert_eq!(suicide, 4);
        assert_eq!(non_suicide, 4);
    }

    #[test]
    fn test_balance_keeps_file_order_within_class() {
        let balanced = balance(sample_items(3), 2);

        let suicide_texts: Vec<&str> = balanced
            .iter()
            .filter(|i| i.class == "suicide")
            .map(|i| i.text.as_str())
            .collect();

        assert_eq!(suicide_texts, vec!["dark post 0", "dark post 1"]);
    }

    #[test]
    fn test_balance_drops_unknown_labels() {
        let mut items = sample_items(2);
        items.push(item("mislabeled", "spam"));

        let balanced = balance(items, 10);

        assert_eq!(balanced.len(), 4);
        assert!(balanced.iter().all(|i| label_id(&i.class).is_some()));
    }

    #[test]
    fn test_split_is_deterministic() {
        let (train_a, test_a) = split(sample_items(50), SPLIT_SEED, TRAIN_FRACTION);
        let (train_b, test_b) = split(sample_items(50), SPLIT_SEED, TRAIN_FRACTION);

        let texts = |items: &[Item]| -> Vec<String> {
            items.iter().map(|i| i.text.clone()).collect()
        };

        assert_eq!(texts(&train_a), texts(&train_b));
        assert_eq!(texts(&test_a), texts(&test_b));
    }

    #[test]
    fn test_split_partitions_all_rows() {
        let items = sample_items(50);
        let total = items.len();

        let (train, test) = split(items, SPLIT_SEED, TRAIN_FRACTION);

        assert_eq!(train.len(), 80);
        assert_eq!(test.len(), 20);
        assert_eq!(train.len() + test.len(), total);

        let mut texts: Vec<String> = train
            .iter()
            .chain(test.iter())
            .map(|i| i.text.clone())
            .collect();
        texts.sort();
        texts.dedup();

        assert_eq!(texts.len(), total);
    }
}
