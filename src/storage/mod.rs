use anyhow::Result;
use async_channel::Sender;
use async_trait::async_trait;
use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
use aws_sdk_s3::types::ObjectIdentifier;
use dyn_clone::DynClone;

use crate::config::{ClientConfig, Config};
use crate::types::VersionPage;

pub mod s3;

/// Type alias for a boxed Storage trait object.
pub type Storage = Box<dyn StorageTrait + Send + Sync>;

/// The storage capability the pipeline consumes: paginated version
/// listing and bulk deletion. Everything else about the backend is
/// out of scope.
#[async_trait]
pub trait StorageTrait: DynClone {
    /// List object versions and delete markers, sending each response
    /// page to the provided channel in arrival order.
    ///
    /// Listing failures are unrecoverable; the caller discards whatever
    /// was aggregated so far.
    async fn list_object_versions(&self, sender: &Sender<VersionPage>, max_keys: i32)
        -> Result<()>;

    /// Delete multiple object versions in a single request via the
    /// DeleteObjects batch API. Supports up to 1000 identifiers per
    /// request; the caller is responsible for batching.
    ///
    /// Returns DeleteObjectsOutput containing both successfully deleted
    /// objects and any per-item errors (partial failure).
    async fn delete_objects(&self, objects: Vec<ObjectIdentifier>) -> Result<DeleteObjectsOutput>;
}

dyn_clone::clone_trait_object!(StorageTrait);

/// Create the S3 storage instance for a pipeline run.
///
/// Without an explicit client configuration the client is built from
/// the default AWS credential chain, so `Config::for_bucket` alone is
/// enough to get a working storage.
pub async fn create_storage(config: &Config) -> Storage {
    let client = match &config.client_config {
        Some(client_config) => client_config.create_client().await,
        None => ClientConfig::default().create_client().await,
    };

    Box::new(s3::S3Storage::new(
        config.bucket.clone(),
        std::sync::Arc::new(client),
    ))
}
