use std::collections::BTreeMap;

use bert_burn::model::BertModelConfig;
use burn::{nn::LinearConfig, tensor::backend::Backend};

use crate::utils::classes::invert_map;

use super::Model;

/// The Model Configuration
#[derive(burn::config::Config)]
pub struct Config {
    // -- Fields copied from BertModelConfig because #[serde(flatten)] is not supported yet
    /// Number of attention heads in the multi-head attention
    pub num_attention_heads: usize,
    /// Number of transformer encoder layers/blocks
    pub num_hidden_layers: usize,
    /// Layer normalization epsilon
    pub layer_norm_eps: f64,
    /// Size of bert embedding (e.g., 768 for roberta-base)
    pub hidden_size: usize,
    /// Size of the intermediate position wise feedforward layer
    pub intermediate_size: usize,
    /// Size of the vocabulary
    pub vocab_size: usize,
    /// Max position embeddings, in RoBERTa equal to max_seq_len + 2 (514), for BERT equal to max_seq_len (512)
    pub max_position_embeddings: usize,
    /// Identifier for sentence type in input (e.g., 0 for single sentence, 1 for pair)
    pub type_vocab_size: usize,
    /// Dropout value across layers, typically 0.1
    pub hidden_dropout_prob: f64,
    /// BERT model name (roberta)
    pub model_type: String,
    /// Index of the padding token
    pub pad_token_id: usize,
    /// Maximum sequence length for the tokenizer
    pub max_seq_len: Option<usize>,
    /// Whether to add a pooling layer to the model
    pub with_pooling_layer: Option<bool>,
    // -- End fields copied from BertModelConfig
    /// A map from class ids to class name labels
    pub id2label: BTreeMap<usize, String>,
}

impl Config {
    /// Build a classification configuration from a pretrained base config
    pub fn new_with_labels(model: BertModelConfig, labels: &[String]) -> Self {
        let id2label = labels
            .iter()
            .enumerate()
            .map(|(i, s)| (i, s.trim().to_string()))
            .collect();

        Config::new(
            model.num_attention_heads,
            model.num_hidden_layers,
            model.layer_norm_eps,
            model.hidden_size,
            model.intermediate_size,
            model.vocab_size,
            model.max_position_embeddings,
            model.type_vocab_size,
            model.hidden_dropout_prob,
            model.model_type,
            model.pad_token_id,
            id2label,
        )
        .with_max_seq_len(model.max_seq_len)
        .with_with_pooling_layer(model.with_pooling_layer)
    }

    /// Get the Bert model configuration
    pub fn get_bert_config(&self) -> BertModelConfig {
        BertModelConfig::new(
            self.num_attention_heads,
            self.num_hidden_layers,
            self.layer_norm_eps,
            self.hidden_size,
            self.intermediate_size,
            self.vocab_size,
            self.max_position_embeddings,
            self.type_vocab_size,
            self.hidden_dropout_prob,
            self.model_type.clone(),
            self.pad_token_id,
        )
        .with_max_seq_len(self.max_seq_len)
        .with_with_pooling_layer(self.with_pooling_layer)
    }

    /// A reverse map from class name labels to class ids
    pub fn label2id(&self) -> BTreeMap<String, usize> {
        invert_map(self.id2label.clone())
    }

    /// The maximum sequence length the batcher should pad and truncate to
    pub fn max_seq_length(&self) -> usize {
        self.max_seq_len.unwrap_or(self.max_position_embeddings)
    }

    /// Initializes a Bert model with default weights
    pub fn init<B: Backend>(&self, device: &B::Device) -> Model<B> {
        let model = self.get_bert_config().init(device);

        let n_classes = self.id2label.len();

        let output = LinearConfig::new(self.hidden_size, n_classes).init(device);

        Model {
            model,
            output,
            n_classes,
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn bert_config() -> BertModelConfig {
        BertModelConfig::new(
            12,
            12,
            1e-12,
            768,
            3072,
            50265,
            514,
            1,
            0.1,
            "roberta".to_string(),
            1,
        )
        .with_max_seq_len(Some(128))
        .with_with_pooling_layer(Some(true))
    }

    #[test]
    fn test_new_with_labels() {
        let labels = vec!["non-suicide".to_string(), "suicide".to_string()];
        let config = Config::new_with_labels(bert_config(), &labels);

        assert_eq!(config.id2label.get(&0), Some(&"non-suicide".to_string()));
        assert_eq!(config.id2label.get(&1), Some(&"suicide".to_string()));
        assert_eq!(config.max_seq_length(), 128);
    }

    #[test]
    fn test_label2id_inverts_id2label() {
        let labels = vec!["non-suicide".to_string(), "suicide".to_string()];
        let config = Config::new_with_labels(bert_config(), &labels);

        let label2id = config.label2id();

        assert_eq!(label2id.get("suicide"), Some(&1));
        assert_eq!(label2id.get("non-suicide"), Some(&0));
    }

    #[test]
    fn test_bert_config_round_trip() {
        let labels = vec!["non-suicide".to_string(), "suicide".to_string()];
        let config = Config::new_with_labels(bert_config(), &labels);

        let restored = config.get_bert_config();

        assert_eq!(restored.hidden_size, 768);
        assert_eq!(restored.max_position_embeddings, 514);
        assert_eq!(restored.pad_token_id, 1);
        assert_eq!(restored.max_seq_len, Some(128));
    }
}
