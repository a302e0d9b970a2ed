//! Executes a deletion plan against storage, one batch at a time.
//!
//! Batches run strictly in plan order and the first failure aborts the
//! run. There is no retry and no skipping: remaining batches are never
//! attempted, so on failure the bucket is left with the failing batch
//! and everything after it intact.

use anyhow::{Result, anyhow};
use aws_sdk_s3::types::ObjectIdentifier;
use tracing::info;

use crate::storage::Storage;
use crate::types::error::S3EmptyError;

pub struct BatchDeleter {
    storage: Storage,
}

impl BatchDeleter {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    /// Delete every batch in order, returning the number of deleted
    /// items on success.
    ///
    /// A request failure propagates as-is; per-item errors in a
    /// response become [`S3EmptyError::BatchDelete`] with one
    /// diagnostic line per failed item. Either way no later batch is
    /// attempted.
    pub async fn execute(&self, batches: Vec<Vec<ObjectIdentifier>>) -> Result<u64> {
        let batch_count = batches.len();
        let mut deleted: u64 = 0;

        for (index, batch) in batches.into_iter().enumerate() {
            info!(
                batch = index + 1,
                batch_count = batch_count,
                object_count = batch.len(),
                "deleting {} object(s).",
                batch.len(),
            );

            let requested = batch.len() as u64;
            let output = self.storage.delete_objects(batch).await?;

            let errors = output.errors();
            if !errors.is_empty() {
                let details: Vec<String> = errors
                    .iter()
                    .map(|error| {
                        format!(
                            "{} ({}): {}: {}",
                            error.key().unwrap_or("unknown key"),
                            error.version_id().unwrap_or("no version"),
                            error.code().unwrap_or("unknown"),
                            error.message().unwrap_or("no message"),
                        )
                    })
                    .collect();
                return Err(anyhow!(S3EmptyError::BatchDelete { details }));
            }

            deleted += requested;
        }

        info!(deleted = deleted, "bucket emptying has been completed.");

        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::StorageTrait;
    use crate::types::VersionPage;
    use crate::types::error::batch_failure_details;
    use async_channel::Sender;
    use async_trait::async_trait;
    use aws_sdk_s3::operation::delete_objects::DeleteObjectsOutput;
    use aws_sdk_s3::types::Error as S3Error;
    use std::sync::{Arc, Mutex};

    fn init_dummy_tracing_subscriber() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter("dummy=trace")
            .try_init();
    }

    fn make_identifier(key: &str, version_id: &str) -> ObjectIdentifier {
        ObjectIdentifier::builder()
            .key(key)
            .version_id(version_id)
            .build()
            .unwrap()
    }

    /// Outcome script for one delete_objects call.
    #[derive(Clone)]
    enum BatchOutcome {
        Success,
        ItemErrors(Vec<(&'static str, &'static str, &'static str)>),
        RequestFailure,
    }

    /// Storage stub that records every batch it receives and replays a
    /// scripted outcome per call.
    #[derive(Clone)]
    struct ScriptedStorage {
        outcomes: Vec<BatchOutcome>,
        received: Arc<Mutex<Vec<Vec<ObjectIdentifier>>>>,
    }

    impl ScriptedStorage {
        fn new(outcomes: Vec<BatchOutcome>) -> Self {
            Self {
                outcomes,
                received: Arc::new(Mutex::new(Vec::new())),
            }
        }

        fn received_batches(&self) -> Vec<Vec<ObjectIdentifier>> {
            self.received.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl StorageTrait for ScriptedStorage {
        async fn list_object_versions(
            &self,
            _sender: &Sender<VersionPage>,
            _max_keys: i32,
        ) -> Result<()> {
            unreachable!("deletion never lists")
        }

        async fn delete_objects(
            &self,
            objects: Vec<ObjectIdentifier>,
        ) -> Result<DeleteObjectsOutput> {
            let call_index = {
                let mut received = self.received.lock().unwrap();
                received.push(objects);
                received.len() - 1
            };

            match &self.outcomes[call_index] {
                BatchOutcome::Success => Ok(DeleteObjectsOutput::builder().build()),
                BatchOutcome::ItemErrors(items) => {
                    let mut builder = DeleteObjectsOutput::builder();
                    for (key, code, message) in items {
                        builder = builder.errors(
                            S3Error::builder()
                                .key(*key)
                                .version_id("v1")
                                .code(*code)
                                .message(*message)
                                .build(),
                        );
                    }
                    Ok(builder.build())
                }
                BatchOutcome::RequestFailure => {
                    Err(anyhow!("InternalError: simulated request failure"))
                }
            }
        }
    }

    #[tokio::test]
    async fn execute_all_batches_in_order() {
        init_dummy_tracing_subscriber();

        let storage = ScriptedStorage::new(vec![BatchOutcome::Success, BatchOutcome::Success]);
        let deleter = BatchDeleter::new(Box::new(storage.clone()));

        let deleted = deleter
            .execute(vec![
                vec![make_identifier("a.txt", "v1"), make_identifier("b.txt", "v1")],
                vec![make_identifier("dir/", "v1")],
            ])
            .await
            .unwrap();

        assert_eq!(deleted, 3);

        let received = storage.received_batches();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0][0].key(), "a.txt");
        assert_eq!(received[1][0].key(), "dir/");
    }

    #[tokio::test]
    async fn execute_no_batches_is_a_no_op() {
        init_dummy_tracing_subscriber();

        let storage = ScriptedStorage::new(vec![]);
        let deleter = BatchDeleter::new(Box::new(storage.clone()));

        let deleted = deleter.execute(vec![]).await.unwrap();
        assert_eq!(deleted, 0);
        assert!(storage.received_batches().is_empty());
    }

    #[tokio::test]
    async fn execute_stops_at_first_per_item_failure() {
        init_dummy_tracing_subscriber();

        let storage = ScriptedStorage::new(vec![
            BatchOutcome::Success,
            BatchOutcome::ItemErrors(vec![
                ("locked.txt", "AccessDenied", "Access Denied"),
                ("held.txt", "AccessDenied", "Access Denied"),
            ]),
            BatchOutcome::Success,
        ]);
        let deleter = BatchDeleter::new(Box::new(storage.clone()));

        let err = deleter
            .execute(vec![
                vec![make_identifier("a.txt", "v1")],
                vec![make_identifier("locked.txt", "v1"), make_identifier("held.txt", "v1")],
                vec![make_identifier("never-reached.txt", "v1")],
            ])
            .await
            .unwrap_err();

        let details = batch_failure_details(&err).unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], "locked.txt (v1): AccessDenied: Access Denied");

        // The third batch is never sent.
        assert_eq!(storage.received_batches().len(), 2);
    }

    #[tokio::test]
    async fn execute_stops_at_request_failure() {
        init_dummy_tracing_subscriber();

        let storage = ScriptedStorage::new(vec![
            BatchOutcome::RequestFailure,
            BatchOutcome::Success,
        ]);
        let deleter = BatchDeleter::new(Box::new(storage.clone()));

        let err = deleter
            .execute(vec![
                vec![make_identifier("a.txt", "v1")],
                vec![make_identifier("b.txt", "v1")],
            ])
            .await
            .unwrap_err();

        assert!(err.to_string().contains("simulated request failure"));
        assert_eq!(storage.received_batches().len(), 1);
    }

    #[tokio::test]
    async fn per_item_detail_handles_missing_fields() {
        init_dummy_tracing_subscriber();

        let storage = ScriptedStorage::new(vec![BatchOutcome::ItemErrors(vec![(
            "k.txt", "InternalError", "We encountered an internal error.",
        )])]);
        let deleter = BatchDeleter::new(Box::new(storage));

        let err = deleter
            .execute(vec![vec![make_identifier("k.txt", "v1")]])
            .await
            .unwrap_err();

        let details = batch_failure_details(&err).unwrap();
        assert_eq!(
            details[0],
            "k.txt (v1): InternalError: We encountered an internal error."
        );
    }
}
