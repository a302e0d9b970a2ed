use anyhow::Result;
use clap::Parser;
use tracing::{debug, error, trace};

use s3empty::config::Config;
use s3empty::{CLIArgs, EmptyBucketPipeline, batch_failure_details, exit_code_from_error};

mod tracing_init;

/// s3empty - Empty a versioned Amazon S3 bucket.
///
/// This binary is a thin wrapper over the s3empty library.
/// All core functionality is implemented in the library crate.
#[tokio::main]
async fn main() {
    let config = load_config_exit_if_err();

    start_tracing_if_necessary(&config);

    trace!("config = {:?}", config);

    if let Err(e) = run(config).await {
        if let Some(details) = batch_failure_details(&e) {
            for detail in details {
                error!("{}", detail);
            }
        }
        error!("{:#}", e);

        std::process::exit(exit_code_from_error(&e));
    }
}

fn load_config_exit_if_err() -> Config {
    let config = Config::try_from(CLIArgs::parse());
    if let Err(error_message) = config {
        clap::Error::raw(clap::error::ErrorKind::ValueValidation, error_message).exit();
    }
    config.unwrap()
}

fn start_tracing_if_necessary(config: &Config) -> bool {
    if config.tracing_config.is_none() {
        return false;
    }

    tracing_init::init_tracing(config.tracing_config.as_ref().unwrap());
    true
}

async fn run(config: Config) -> Result<()> {
    let start_time = tokio::time::Instant::now();
    debug!("bucket emptying start.");

    let pipeline = EmptyBucketPipeline::new(config).await;
    let result = pipeline.run().await;

    let duration_sec = format!("{:.3}", start_time.elapsed().as_secs_f32());
    match &result {
        Ok(()) => debug!(duration_sec = duration_sec, "s3empty has been completed."),
        Err(_) => error!(duration_sec = duration_sec, "s3empty failed."),
    }

    result
}
