use std::collections::BTreeMap;

use bert_burn::data::BertInferenceBatch;
use burn::{
    data::dataloader,
    nn::attention::generate_padding_mask,
    tensor::{backend::Backend, Data, ElementConversion, Int, Tensor},
};
use derive_new::new;
use tokenizers::Tokenizer;

use crate::models::bert::sequence_classification;

use super::Item;

/// A training batch for text classification
#[derive(Clone, Debug, new)]
pub struct Train<B: Backend> {
    /// Bert Model input
    pub input: BertInferenceBatch<B>,

    /// Class ids for the batch
    pub targets: Tensor<B, 1, Int>,
}

/// Struct for batching text classification items
#[derive(Clone)]
pub struct Batcher<B: Backend> {
    /// Tokenizer for converting text to token IDs
    tokenizer: Tokenizer,

    /// Maximum sequence length for tokenized text
    max_seq_length: usize,

    /// ID of the padding token
    pad_token_id: usize,

    /// A map from class name labels to class ids
    label2id: BTreeMap<String, usize>,

    /// Device on which to perform computation (e.g., CPU or CUDA device)
    device: B::Device,
}

impl<B: Backend> Batcher<B> {
    /// Creates a new batcher
    pub fn new(
        tokenizer: Tokenizer,
        config: &sequence_classification::Config,
        device: B::Device,
    ) -> Self {
        Self {
            tokenizer,
            max_seq_length: config.max_seq_length(),
            pad_token_id: config.pad_token_id,
            label2id: config.label2id(),
            device,
        }
    }
}

/// Implement Batcher trait for Batcher struct for inference
impl<B: Backend> dataloader::batcher::Batcher<String, BertInferenceBatch<B>> for Batcher<B> {
    /// Collects a vector of input texts into an inference batch
    fn batch(&self, items: Vec<String>) -> BertInferenceBatch<B> {
        let batch_size = items.len();

        let mut token_ids_list = Vec::with_capacity(batch_size);

        // Tokenize each input text
        for input in items {
            let tokens = self
                .tokenizer
                .encode(input, true)
                .expect("unable to encode");

            let token_ids: Vec<_> = tokens.get_ids().iter().map(|t| *t as usize).collect();

            token_ids_list.push(token_ids);
        }

        let pad_mask = generate_padding_mask(
            self.pad_token_id,
            token_ids_list,
            Some(self.max_seq_length),
            &self.device,
        );

        // Create and return inference batch
        BertInferenceBatch {
            tokens: pad_mask.tensor,
            mask_pad: pad_mask.mask,
        }
    }
}

/// Implement Batcher trait for Batcher struct for training
impl<B: Backend, I: Item> dataloader::batcher::Batcher<I, Train<B>> for Batcher<B> {
    /// Collects a vector of text classification items into a training batch
    fn batch(&self, items: Vec<I>) -> Train<B> {
        let batch_size = items.len();

        let inputs = items.iter().map(|item| item.input().to_string()).collect();
        let input: BertInferenceBatch<B> = self.batch(inputs);

        let mut class_id_list = Vec::with_capacity(batch_size);

        // Create a class_id tensor for each item; items with labels outside
        // the table are dropped during dataset balancing
        for item in &items {
            let class_id = self
                .label2id
                .get(item.class_label())
                .copied()
                .unwrap_or_default();

            class_id_list.push(Tensor::from_data(
                Data::from([(class_id as i64).elem()]),
                &self.device,
            ));
        }

        let targets = Tensor::cat(class_id_list, 0);

        // Create and return training batch
        Train { input, targets }
    }
}
