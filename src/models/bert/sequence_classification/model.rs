use bert_burn::{
    data::BertInferenceBatch,
    model::{BertModel, BertModelOutput},
};
use burn::{
    module::Module,
    nn::{loss::CrossEntropyLossConfig, Linear},
    tensor::{activation::softmax, backend::AutodiffBackend, backend::Backend, Int, Tensor},
    train::{ClassificationOutput, TrainOutput, TrainStep, ValidStep},
};
use derive_new::new;

use crate::pipelines::text_classification::batcher::Train;

/// BERT for Sequence Classification
#[derive(Module, Debug, new)]
pub struct Model<B: Backend> {
    /// The base BERT model
    pub model: BertModel<B>,

    /// Linear layer for sequence classification
    pub output: Linear<B>,

    /// Total number of classes
    pub n_classes: usize,
}

/// Define model behavior
impl<B: Backend> Model<B> {
    /// Defines forward pass for training
    pub fn forward(
        &self,
        input: BertInferenceBatch<B>,
        targets: Tensor<B, 1, Int>,
    ) -> ClassificationOutput<B> {
        let device = &self.model.devices()[0];
        let targets = targets.to_device(device);

        let output = self.logits(input);

        let loss = CrossEntropyLossConfig::new()
            .init(&output.device())
            .forward(output.clone(), targets.clone());

        ClassificationOutput {
            loss,
            output,
            targets,
        }
    }

    /// Defines forward pass for inference, returning per-class scores
    pub fn infer(&self, input: BertInferenceBatch<B>) -> Tensor<B, 2> {
        softmax(self.logits(input), 1)
    }

    /// Run the encoder and project the sequence features onto the classes
    fn logits(&self, input: BertInferenceBatch<B>) -> Tensor<B, 2> {
        let [batch_size, _seq_length] = input.tokens.dims();

        let BertModelOutput {
            pooled_output,
            hidden_states,
        } = self.model.forward(input);

        // RoBERTa checkpoints ship without a pooler; fall back to the
        // first-token hidden state
        let features: Tensor<B, 2> = match pooled_output {
            Some(pooled) => pooled,
            None => hidden_states.slice([0..batch_size, 0..1]).squeeze(1),
        };

        self.output.forward(features)
    }
}

/// Define training step
impl<B: AutodiffBackend> TrainStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> TrainOutput<ClassificationOutput<B>> {
        // Run forward pass, calculate gradients and return them along with the output
        let output = self.forward(item.input, item.targets);
        let grads = output.loss.backward();

        TrainOutput::new(self, grads, output)
    }
}

/// Define validation step
impl<B: Backend> ValidStep<Train<B>, ClassificationOutput<B>> for Model<B> {
    fn step(&self, item: Train<B>) -> ClassificationOutput<B> {
        // Run forward pass and return the output
        self.forward(item.input, item.targets)
    }
}
