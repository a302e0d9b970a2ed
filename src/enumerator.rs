//! Enumerates every object version and delete marker in the target
//! bucket and aggregates them into an [`ObjectCollection`].
//!
//! The enumerator splits the work across two tasks joined by a bounded
//! hand-off channel: the producer runs the storage pagination loop and
//! sends each response page as a unit, while a spawned consumer drains
//! the channel and appends each page (versions first, then that page's
//! delete markers) to the collection. The channel capacity of one means
//! at most a single page is in flight beyond the one being aggregated.

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use crate::storage::Storage;
use crate::types::error::S3EmptyError;
use crate::types::{ObjectCollection, VersionPage};

const PAGE_CHANNEL_CAPACITY: usize = 1;

pub struct VersionEnumerator {
    storage: Storage,
    max_keys: i32,
}

impl VersionEnumerator {
    pub fn new(storage: Storage, max_keys: i32) -> Self {
        Self { storage, max_keys }
    }

    /// Run the full listing and return the aggregated collection.
    ///
    /// Fails with [`S3EmptyError::Listing`] if any pagination request
    /// fails (partial aggregation is discarded), and with
    /// [`S3EmptyError::EmptyBucket`] if the listing completes but the
    /// bucket holds nothing.
    pub async fn enumerate(&self) -> Result<ObjectCollection> {
        debug!(max_keys = self.max_keys, "version listing has started.");

        let (sender, receiver) = async_channel::bounded::<VersionPage>(PAGE_CHANNEL_CAPACITY);

        let aggregator = tokio::spawn(async move {
            let mut collection = ObjectCollection::new();
            while let Ok(page) = receiver.recv().await {
                for version in &page.versions {
                    collection.add(
                        version.key().unwrap_or_default(),
                        version.version_id().unwrap_or_default(),
                    );
                }
                collection.append_delete_markers(page.delete_markers);
            }
            collection
        });

        let listing_result = self.storage.list_object_versions(&sender, self.max_keys).await;
        sender.close();

        // The aggregator drains remaining pages before its channel read
        // fails, so every sent page is accounted for.
        let collection = aggregator
            .await
            .context("tokio::spawn() aggregation task failed.")?;

        if let Err(e) = listing_result {
            return Err(anyhow!(S3EmptyError::Listing(format!("{e:#}"))));
        }

        if collection.is_empty() {
            return Err(anyhow!(S3EmptyError::EmptyBucket));
        }

        info!(
            count = collection.count(),
            objects = collection.objects().len(),
            delete_markers = collection.delete_markers().len(),
            "version listing has been completed.",
        );

        Ok(collection)
    }
}
