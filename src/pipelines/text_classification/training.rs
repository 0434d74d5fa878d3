use bert_burn::model::BertModelConfig;
use burn::{
    config::Config as _,
    data::{dataloader::DataLoaderBuilder, dataset::Dataset},
    lr_scheduler::noam::NoamLrSchedulerConfig,
    module::AutodiffModule,
    optim::AdamWConfig,
    record::{CompactRecorder, Recorder},
    tensor::backend::AutodiffBackend,
    train::{
        metric::{AccuracyMetric, CudaMetric, LearningRateMetric, LossMetric},
        LearnerBuilder,
    },
    LearningRate,
};
use tokenizers::Tokenizer;

use crate::{
    datasets::posts,
    models::bert::sequence_classification::{self, loader},
    utils::{hugging_face::download_hf_model, metrics::Metrics, renderer::Simple},
};

use super::{evaluation, Batcher, Item};

/// Define configuration struct for the experiment
#[derive(burn::config::Config)]
pub struct Config {
    /// Maximum sequence length
    #[config(default = 128)]
    pub max_seq_length: usize,

    /// Batch size
    #[config(default = 4)]
    pub batch_size: usize,

    /// Number of epochs
    #[config(default = 3)]
    pub num_epochs: usize,

    /// Adam epsilon
    #[config(default = 1e-8)]
    pub adam_epsilon: f32,

    /// Weight decay applied by the optimizer
    #[config(default = 0.01)]
    pub weight_decay: f32,

    /// Initial learning rate
    #[config(default = 5e-5)]
    pub learning_rate: LearningRate,

    /// Learning rate warmup steps
    #[config(default = 10)]
    pub warmup_steps: usize,

    /// Dropout rate
    #[config(default = 0.1)]
    pub hidden_dropout_prob: f64,

    /// Model name (e.g., "roberta-base")
    #[config(default = "\"roberta-base\".to_string()")]
    pub model_name: String,

    /// Directory to save the model artifact to
    #[config(default = "\"data/model\".to_string()")]
    pub artifact_dir: String,

    /// Class labels, indexed by class id
    pub labels: Vec<String>,
}

/// Fine-tune the pretrained model and save the artifact directory
///
/// Returns the evaluation metrics computed on the held-out test dataset.
pub async fn train<B, I, D>(
    devices: Vec<B::Device>, // Devices on which to perform computation (e.g., CPU or CUDA device)
    dataset_train: D,        // Training dataset
    dataset_test: D,         // Testing dataset
    config: Config,          // Experiment configuration
    use_tui: bool,           // Whether to render training progress with the TUI
) -> anyhow::Result<Metrics>
where
    B: AutodiffBackend,
    I: Item + 'static,
    D: Dataset<I> + 'static,
{
    let device = &devices[0];
    let artifact_dir = config.artifact_dir.clone();

    let (config_file, model_file) = download_hf_model(&config.model_name).await?;

    let mut bert_config = BertModelConfig::load(config_file)
        .map_err(|e| anyhow!("Unable to load Hugging Face Config file: {}", e))?;

    bert_config.max_seq_len = Some(config.max_seq_length);
    bert_config.hidden_dropout_prob = config.hidden_dropout_prob;

    // Enable the pooling layer for sequence classification
    bert_config.with_pooling_layer = Some(true);

    let model_config = sequence_classification::Config::new_with_labels(bert_config, &config.labels);

    if model_config.id2label.is_empty() {
        return Err(anyhow!("Classes are not defined in the model configuration"));
    }

    let model = loader::load_pretrained::<B>(&model_config, model_file, device)?;

    // Initialize tokenizer
    let tokenizer = Tokenizer::from_pretrained(&config.model_name, None)
        .map_err(|e| anyhow!("Unable to load tokenizer for {}: {}", config.model_name, e))?;

    // Initialize batchers for training and testing data
    let batcher_train = Batcher::<B>::new(tokenizer.clone(), &model_config, device.clone());
    let batcher_test =
        Batcher::<B::InnerBackend>::new(tokenizer.clone(), &model_config, device.clone());
    let batcher_eval = batcher_test.clone();

    // Keep the raw test items around for the evaluation pass after training
    let test_items: Vec<I> = dataset_test.iter().collect();

    let workers = std::thread::available_parallelism()?;

    // Initialize data loaders for training and testing data
    let dataloader_train = DataLoaderBuilder::new(batcher_train)
        .batch_size(config.batch_size)
        .num_workers(workers.into())
        .build(dataset_train);

    let dataloader_test = DataLoaderBuilder::new(batcher_test)
        .batch_size(config.batch_size * 2)
        .num_workers(workers.into())
        .build(dataset_test);

    // Initialize optimizer
    let optimizer = AdamWConfig::new()
        .with_epsilon(config.adam_epsilon)
        .with_weight_decay(config.weight_decay)
        .init();

    // Initialize learning rate scheduler
    let lr_scheduler = NoamLrSchedulerConfig::new(config.learning_rate)
        .with_warmup_steps(config.warmup_steps)
        .with_model_size(model_config.hidden_size)
        .init();

    // Initialize learner
    let mut builder = LearnerBuilder::new(&artifact_dir)
        .metric_train(CudaMetric::new())
        .metric_valid(CudaMetric::new())
        .metric_train_numeric(AccuracyMetric::new())
        .metric_valid_numeric(AccuracyMetric::new())
        .metric_train_numeric(LossMetric::new())
        .metric_valid_numeric(LossMetric::new())
        .metric_train_numeric(LearningRateMetric::new())
        .with_file_checkpointer(CompactRecorder::new())
        .devices(devices.clone())
        .num_epochs(config.num_epochs)
        .summary();

    if !use_tui {
        builder = builder.renderer(Simple::new());
    }

    let learner = builder.build(model, optimizer, lr_scheduler);

    // Train the model
    let model_trained = learner.fit(dataloader_train, dataloader_test);

    // Save the configuration and the trained model
    model_config.save(format!("{artifact_dir}/config.json"))?;

    CompactRecorder::new()
        .record(
            model_trained.clone().into_record(),
            format!("{artifact_dir}/model").into(),
        )
        .map_err(|e| anyhow!("Unable to save trained model weights: {}", e))?;

    // The artifact directory bundles the tokenizer, so serving never goes to
    // the network
    tokenizer
        .save(format!("{artifact_dir}/tokenizer.json"), false)
        .map_err(|e| anyhow!("Unable to save tokenizer: {}", e))?;

    log::info!("Saved model artifact to {artifact_dir}");

    // Evaluate on the held-out split
    let metrics = evaluation::evaluate(
        &model_trained.valid(),
        &batcher_eval,
        &test_items,
        config.batch_size * 2,
        posts::POSITIVE_CLASS,
    );

    Ok(metrics)
}
