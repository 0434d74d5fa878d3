use burn::{data::dataloader::batcher::Batcher as BatcherTrait, tensor::backend::Backend};

use crate::{
    models::bert::sequence_classification::Model,
    utils::metrics::{self, Metrics},
};

use super::{batcher::Train, Batcher, Item};

/// Run the model over held-out items and compute classification metrics
///
/// Precision, recall, and F1 are taken with respect to `positive_class`.
pub fn evaluate<B: Backend, I: Item>(
    model: &Model<B>,
    batcher: &Batcher<B>,
    items: &[I],
    batch_size: usize,
    positive_class: usize,
) -> Metrics {
    let mut predictions = Vec::with_capacity(items.len());
    let mut targets = Vec::with_capacity(items.len());

    for chunk in items.chunks(batch_size.max(1)) {
        let batch: Train<B> = batcher.batch(chunk.to_vec());

        let target_ids: Vec<i64> = batch.targets.clone().into_data().convert::<i64>().value;

        let scores = model.infer(batch.input);
        let predicted: Vec<i64> = scores.argmax(1).into_data().convert::<i64>().value;

        predictions.extend(predicted.into_iter().map(|id| id as usize));
        targets.extend(target_ids.into_iter().map(|id| id as usize));
    }

    metrics::binary_classification(&predictions, &targets, positive_class)
}
