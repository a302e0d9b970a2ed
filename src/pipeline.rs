//! The end-to-end bucket-emptying pipeline: enumerate, plan, delete.

use anyhow::Result;
use tracing::info;

use crate::config::Config;
use crate::deleter::BatchDeleter;
use crate::enumerator::VersionEnumerator;
use crate::planner::DeletionPlanner;
use crate::storage::{Storage, create_storage};

/// Empties a versioned S3 bucket.
///
/// A pipeline runs at most once: enumerate every object version and
/// delete marker, build the deletion plan, then execute it batch by
/// batch. With `--dry-run` the run stops after printing the listing;
/// with `--show-objects` the listing is printed and deletion proceeds.
///
/// # Example
///
/// ```no_run
/// use s3empty::Config;
/// use s3empty::pipeline::EmptyBucketPipeline;
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     let mut config = Config::for_bucket("my-bucket");
///     config.dry_run = true;
///
///     let pipeline = EmptyBucketPipeline::new(config).await;
///     pipeline.run().await
/// }
/// ```
pub struct EmptyBucketPipeline {
    config: Config,
    storage: Storage,
}

impl EmptyBucketPipeline {
    pub async fn new(config: Config) -> Self {
        let storage = create_storage(&config).await;
        Self { config, storage }
    }

    /// Build a pipeline on an already-constructed storage. Used by
    /// tests and by callers that manage their own client.
    pub fn with_storage(config: Config, storage: Storage) -> Self {
        Self { config, storage }
    }

    pub async fn run(&self) -> Result<()> {
        info!(bucket = self.config.bucket, "emptying s3://{}.", self.config.bucket);

        let enumerator = VersionEnumerator::new(self.storage.clone(), self.config.max_keys);
        let collection = enumerator.enumerate().await?;

        if self.config.dry_run || self.config.show_objects {
            println!("{}", collection.render(self.config.format)?);
        }

        if self.config.dry_run {
            info!(
                count = collection.count(),
                "dry run: {} object(s) would be deleted.",
                collection.count(),
            );
            return Ok(());
        }

        let planner = DeletionPlanner::new(self.config.batch_size);
        let batches = planner.plan(&collection)?;

        let deleter = BatchDeleter::new(self.storage.clone());
        deleter.execute(batches).await?;

        Ok(())
    }
}
