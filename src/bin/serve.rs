//! Command line tool to run the HTTP inference service

use std::sync::Arc;

use anyhow::Result;
use burn::backend::{libtorch::LibTorchDevice, LibTorch};
use pico_args::Arguments;
use smart_detector::{
    pipelines::text_classification::Classifier,
    server::{self, AppState, InferenceHandle, ServerConfig},
};

const HELP: &str = "\
Usage: serve [OPTIONS]

Options:
  -h, --help           Print help
  -a, --artifact-dir   Directory containing the model artifact (defaults to 'data/model')
      --host           Host to bind to (defaults to 127.0.0.1)
  -p, --port           Port to bind to (defaults to 8000)
      --queue-depth    Maximum number of queued inference requests (defaults to 64)
";

#[derive(Debug)]
struct Args {
    artifact_dir: Option<String>,
    host: Option<String>,
    port: Option<u16>,
    queue_depth: Option<usize>,
}

impl Args {
    fn parse() -> Result<Option<Self>> {
        let mut pargs = Arguments::from_env();

        // Help has a higher priority and should be handled separately.
        if pargs.contains(["-h", "--help"]) {
            return Ok(None);
        }

        let args = Args {
            artifact_dir: pargs.opt_value_from_str(["-a", "--artifact-dir"])?,
            host: pargs.opt_value_from_str("--host")?,
            port: pargs.opt_value_from_str(["-p", "--port"])?,
            queue_depth: pargs.opt_value_from_str("--queue-depth")?,
        };

        Ok(Some(args))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    pretty_env_logger::init();

    let output = Args::parse()?;

    if output.is_none() {
        print!("{}", HELP);

        return Ok(());
    }
    let args = output.unwrap();

    let artifact_dir = args
        .artifact_dir
        .unwrap_or_else(|| "data/model".to_string());

    let host = args.host.unwrap_or_else(|| "127.0.0.1".to_string());
    let port = args.port.unwrap_or(8000);
    let address = format!("{host}:{port}").parse()?;

    let mut config = ServerConfig::default().with_address(address);

    if let Some(queue_depth) = args.queue_depth {
        config = config.with_queue_depth(queue_depth);
    }

    let device = if tch::Cuda::is_available() {
        LibTorchDevice::Cuda(0)
    } else {
        LibTorchDevice::Cpu
    };

    // The model and tokenizer are loaded once and owned by the worker thread
    // for the process lifetime
    let classifier = Classifier::<LibTorch>::load(&artifact_dir, device)?;
    let handle = InferenceHandle::spawn(classifier, config.queue_depth);

    let state = AppState::new(Arc::new(handle));

    server::serve(state, config).await
}
