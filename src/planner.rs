//! Turns an aggregated [`ObjectCollection`] into an ordered sequence of
//! bulk-delete batches.
//!
//! Planning is pure: no I/O, no clock, no randomness. The same
//! collection and batch size always produce the same batches, which is
//! what makes `--dry-run` output trustworthy.
//!
//! Ordering rules:
//! - Object versions whose key ends with `/` are directory placeholder
//!   entries and are deleted after everything else.
//! - Delete markers are never directory entries, whatever their key
//!   looks like; removing a marker only un-hides an older version.
//! - Directory entries are sorted deepest first (descending separator
//!   count, stable within a depth) so that a child placeholder is never
//!   deleted after its parent.

use anyhow::{Context, Result, anyhow};
use aws_sdk_s3::types::ObjectIdentifier;
use tracing::debug;

use crate::types::ObjectCollection;
use crate::types::error::S3EmptyError;

const DIRECTORY_SUFFIX: char = '/';
const KEY_SEPARATOR: char = '/';

/// DeleteObjects accepts at most this many identifiers per request.
const MAX_BATCH_SIZE: usize = 1000;

pub struct DeletionPlanner {
    batch_size: usize,
}

impl DeletionPlanner {
    pub fn new(batch_size: u16) -> Self {
        Self {
            batch_size: usize::from(batch_size),
        }
    }

    /// Partition, order and chunk the collection into deletion batches.
    ///
    /// Every item of the collection appears in exactly one batch, all
    /// regular batches precede all directory batches, and no batch is
    /// empty or larger than the configured batch size. A batch size of
    /// zero or above the DeleteObjects limit is rejected with
    /// [`S3EmptyError::InvalidConfig`].
    pub fn plan(&self, collection: &ObjectCollection) -> Result<Vec<Vec<ObjectIdentifier>>> {
        if self.batch_size == 0 || self.batch_size > MAX_BATCH_SIZE {
            return Err(anyhow!(S3EmptyError::InvalidConfig(format!(
                "batch size must be between 1 and {MAX_BATCH_SIZE}, got {}.",
                self.batch_size
            ))));
        }

        let mut regular_entries = Vec::new();
        let mut directory_entries = Vec::new();

        for object in collection.objects() {
            let identifier = ObjectIdentifier::builder()
                .key(&object.key)
                .version_id(&object.version_id)
                .build()
                .context("Failed to build ObjectIdentifier")?;

            if object.key.ends_with(DIRECTORY_SUFFIX) {
                directory_entries.push(identifier);
            } else {
                regular_entries.push(identifier);
            }
        }

        for marker in collection.delete_markers() {
            let identifier = ObjectIdentifier::builder()
                .key(marker.key().unwrap_or_default())
                .version_id(marker.version_id().unwrap_or_default())
                .build()
                .context("Failed to build ObjectIdentifier")?;
            regular_entries.push(identifier);
        }

        // Deepest directories first. A stable sort keeps the listing
        // order for entries at the same depth.
        directory_entries.sort_by_key(|entry| {
            std::cmp::Reverse(entry.key().matches(KEY_SEPARATOR).count())
        });

        let mut batches: Vec<Vec<ObjectIdentifier>> = Vec::new();
        for chunk in regular_entries.chunks(self.batch_size) {
            batches.push(chunk.to_vec());
        }
        for chunk in directory_entries.chunks(self.batch_size) {
            batches.push(chunk.to_vec());
        }

        debug!(
            batches = batches.len(),
            regular_entries = regular_entries.len(),
            directory_entries = directory_entries.len(),
            "deletion plan has been built.",
        );

        Ok(batches)
    }
}
