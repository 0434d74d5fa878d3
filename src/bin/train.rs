//! Command line tool to fine-tune the classifier on a labeled posts CSV

use anyhow::Result;
use burn::backend::{libtorch::LibTorchDevice, Autodiff, LibTorch};
use pico_args::Arguments;
use smart_detector::{
    datasets::posts,
    pipelines::text_classification::{self, training, Classifier},
};

const HELP: &str = "\
Usage: train [OPTIONS]

Options:
  -h, --help                Print help
  -c, --csv                 Path to the labeled posts CSV (defaults to 'data/posts.csv')
  -a, --artifact-dir        Directory to save the model artifact to (defaults to 'data/model')
  -n, --num-epochs          Number of epochs to train for
  -b, --batch-size          Batch size
      --max-rows-per-class  Per-class row cap when balancing (defaults to 30000)
      --no-tui              Disable TUI
";

#[derive(Debug)]
struct Args {
    csv: Option<String>,
    artifact_dir: Option<String>,
    num_epochs: Option<usize>,
    batch_size: Option<usize>,
    max_rows_per_class: Option<usize>,
    use_tui: bool,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            csv: pargs.opt_value_from_str(["-c", "--csv"])?,
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifact-dir"])?,
            num_epochs: pargs.opt_value_from_str(["-n", "--num-epochs"])?,
            batch_size: pargs.opt_value_from_str(["-b", "--batch-size"])?,
            max_rows_per_class: pargs.opt_value_from_str("--max-rows-per-class")?,
            use_tui: !(pargs.contains("--no-tui")),
        };

        Ok(Some(args))
    }
}

/// Example posts classified after training to sanity-check the saved artifact
const EXAMPLE_POSTS: [&str; 2] = [
    "I just can't take it anymore. Everything is falling apart and no matter how hard I try \
     I can't fix it. It feels like it would be easier if I just disappeared.",
    "Made pancakes for the first time this weekend and they actually turned out great. \
     Definitely making them again next Sunday.",
];

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let output = Args::parse()?;

    if output.is_none() {
        print!("{}", HELP);

        return Ok(());
    }
    let args = output.unwrap();

    let csv_path = args.csv.unwrap_or_else(|| "data/posts.csv".to_string());

    let (train, test) = posts::Dataset::load_splits(
        &csv_path,
        args.max_rows_per_class
            .unwrap_or(posts::DEFAULT_ROWS_PER_CLASS),
    )?;

    let labels = posts::LABELS.iter().map(|label| (*label).to_string()).collect();
    let mut config = training::Config::new(labels);

    if let Some(num_epochs) = args.num_epochs {
        config.num_epochs = num_epochs;
    }

    if let Some(batch_size) = args.batch_size {
        config.batch_size = batch_size;
    }

    if let Some(artifact_dir) = args.artifact_dir {
        config.artifact_dir = artifact_dir;
    }

    let artifact_dir = config.artifact_dir.clone();

    let device = if tch::Cuda::is_available() {
        LibTorchDevice::Cuda(0)
    } else {
        LibTorchDevice::Cpu
    };

    let metrics = text_classification::train::<Autodiff<LibTorch>, posts::Item, posts::Dataset>(
        vec![device.clone()],
        train,
        test,
        config,
        args.use_tui,
    )
    .await?;

    println!("Evaluation results: {metrics}");

    // Classify a couple of example posts with the freshly saved artifact
    let classifier = Classifier::<LibTorch>::load(&artifact_dir, device)?;

    let samples: Vec<String> = EXAMPLE_POSTS.iter().map(|s| (*s).to_string()).collect();
    let predictions = classifier.predict(samples);

    for (i, (text, class_id)) in EXAMPLE_POSTS.iter().zip(&predictions).enumerate() {
        let class = classifier.label(*class_id).unwrap_or("unknown");

        println!(
            "\n=== Item {i} ===\
             \n- Text: {text}\
             \n- Class: {class}\
             \n================"
        );
    }

    Ok(())
}
