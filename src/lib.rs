/*!
# Overview
s3empty empties a versioned Amazon S3 bucket.
It lists every object version and delete marker in the bucket and
deletes them all with the S3 batch delete API, so that the bucket can
be removed afterwards.

## Features
- **Versioning Aware**: Deletes object versions and delete markers, not just current objects
- **Batch Deletion**: Up to 1000 objects per DeleteObjects request
- **Safe Ordering**: Directory placeholder entries are deleted last, deepest first
- **Dry Run**: Print what would be deleted, as JSON or pretty JSON, without deleting
- **Library-First**: The s3empty CLI is a thin wrapper over this library

## As a Library
All CLI features are available in the library.

Example usage
=============

```toml
[dependencies]
s3empty = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
use s3empty::config::Config;
use s3empty::config::args::parse_from_args;
use s3empty::pipeline::EmptyBucketPipeline;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = vec!["s3empty", "s3://my-bucket", "--dry-run"];

    let parsed_args = parse_from_args(args).unwrap();
    let config = Config::try_from(parsed_args).unwrap();
    let pipeline = EmptyBucketPipeline::new(config).await;
    pipeline.run().await
}
```
*/

pub mod config;
pub mod deleter;
pub mod enumerator;
pub mod pipeline;
pub mod planner;
pub mod storage;
pub mod types;

pub use config::Config;
pub use config::args::CLIArgs;
pub use pipeline::EmptyBucketPipeline;
pub use types::error::{batch_failure_details, exit_code_from_error, is_empty_bucket_error};
