pub mod args;

use crate::types::{ClientConfigLocation, OutputFormat, S3Credentials};

/// Main configuration for the s3empty pipeline.
///
/// Holds everything needed to run an [`EmptyBucketPipeline`](crate::pipeline::EmptyBucketPipeline):
/// the target bucket, AWS client configuration, output format, and the
/// dry-run / show-objects switches.
///
/// # Quick Start
///
/// Use [`Config::for_bucket`] for a minimal configuration with defaults:
///
/// ```
/// use s3empty::Config;
///
/// let config = Config::for_bucket("my-bucket");
/// assert_eq!(config.batch_size, 1000);
/// assert!(!config.dry_run);
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    pub bucket: String,
    pub client_config: Option<ClientConfig>,
    pub tracing_config: Option<TracingConfig>,
    pub format: OutputFormat,
    pub dry_run: bool,
    pub show_objects: bool,
    /// Objects per DeleteObjects request, clamped to the S3 API limit of 1000.
    pub batch_size: u16,
    /// Keys per ListObjectVersions request (pagination page size).
    pub max_keys: i32,
}

impl Config {
    /// Create a `Config` targeting the given bucket, with library defaults.
    pub fn for_bucket(bucket: &str) -> Self {
        Config {
            bucket: bucket.to_string(),
            ..Config::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bucket: String::new(),
            client_config: None,
            tracing_config: None,
            format: OutputFormat::PrettyJson,
            dry_run: false,
            show_objects: false,
            batch_size: 1000,
            max_keys: 1000,
        }
    }
}

/// AWS S3 client configuration: credential source, region, endpoint,
/// and SDK retry attempts.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub client_config_location: ClientConfigLocation,
    pub credential: S3Credentials,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
    pub aws_max_attempts: u32,
}

impl Default for ClientConfig {
    /// Default AWS credential chain, default region resolution, no
    /// custom endpoint. Used when a `Config` carries no explicit
    /// client configuration.
    fn default() -> Self {
        ClientConfig {
            client_config_location: ClientConfigLocation {
                aws_config_file: None,
                aws_shared_credentials_file: None,
            },
            credential: S3Credentials::FromEnvironment,
            region: None,
            endpoint_url: None,
            force_path_style: false,
            aws_max_attempts: 10,
        }
    }
}

/// Tracing (logging) configuration.
#[derive(Debug, Clone, Copy)]
pub struct TracingConfig {
    pub tracing_level: log::Level,
    pub json_tracing: bool,
    pub aws_sdk_tracing: bool,
    pub disable_color_tracing: bool,
}
