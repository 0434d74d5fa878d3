use std::{collections::HashMap, path::PathBuf};

use bert_burn::{
    loader::{
        load_embeddings_from_safetensors, load_encoder_from_safetensors,
        load_pooler_from_safetensors,
    },
    model::BertModelRecord,
};
use burn::{
    module::{ConstantRecord, Module},
    nn::{LinearConfig, LinearRecord},
    tensor::backend::Backend,
};
use candle_core::{safetensors, Device};

use super::{config::Config, model::Model, model::ModelRecord};

/// Initialize the classification model from pretrained safetensors weights
///
/// The encoder, embeddings, and pooler come from the checkpoint; the linear
/// classification head starts from fresh default weights.
pub fn load_pretrained<B: Backend>(
    config: &Config,
    weights_file: PathBuf,
    device: &B::Device,
) -> anyhow::Result<Model<B>> {
    let n_classes = config.id2label.len();
    let output = LinearConfig::new(config.hidden_size, n_classes).init::<B>(device);

    let record = ModelRecord {
        model: from_safetensors(weights_file, device, &config.model_type)?,
        output: LinearRecord {
            weight: output.weight,
            bias: output.bias,
        },
        n_classes: ConstantRecord::new(),
    };

    Ok(config.init(device).load_record(record))
}

/// Read a Hugging Face safetensors checkpoint into a Bert model record
fn from_safetensors<B: Backend>(
    file_path: PathBuf,
    device: &B::Device,
    model_type: &str,
) -> anyhow::Result<BertModelRecord<B>> {
    let load_device =
        Device::cuda_if_available(0).map_err(|e| anyhow!("Unable to resolve Device: {}", e))?;

    let weights = safetensors::load::<PathBuf>(file_path, &load_device)
        .map_err(|e| anyhow!("Error loading weights: {}", e))?;

    // Weights are stored in a HashMap<String, Tensor>
    // For each layer, it will either be prefixed with "encoder.layer." or "embeddings."
    // We need to extract both.
    let mut encoder_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut embeddings_layers: HashMap<String, candle_core::Tensor> = HashMap::new();
    let mut pooler_layers: HashMap<String, candle_core::Tensor> = HashMap::new();

    for (key, value) in weights.iter() {
        // If model name prefix present in keys, remove it to load keys consistently
        // across variants (bert-base, roberta-base etc.)
        let prefix = format!("{}.", model_type);
        let key_without_prefix = key.replace(&prefix, "");

        if key_without_prefix.starts_with("encoder.layer.") {
            encoder_layers.insert(key_without_prefix, value.clone());
        } else if key_without_prefix.starts_with("embeddings.") {
            embeddings_layers.insert(key_without_prefix, value.clone());
        } else if key_without_prefix.starts_with("pooler.") {
            pooler_layers.insert(key_without_prefix, value.clone());
        }
    }

    let embeddings_record = load_embeddings_from_safetensors(embeddings_layers, device);
    let encoder_record = load_encoder_from_safetensors(encoder_layers, device);
    let pooler_record = load_pooler_from_safetensors(pooler_layers, device);

    Ok(BertModelRecord {
        embeddings: embeddings_record,
        encoder: encoder_record,
        pooler: Some(pooler_record),
    })
}
