use anyhow::Error;
use thiserror::Error;

/// Application-level error types for s3empty.
///
/// All three run-time variants are fatal for the run: there is no retry
/// or local recovery, the operator re-invokes the tool from scratch.
///
/// ## Exit Codes
///
/// Each variant maps to an exit code (via `exit_code()`):
/// - 1: Run-time failures (Listing, EmptyBucket, BatchDelete)
/// - 2: Configuration errors (InvalidConfig)
#[derive(Error, Debug, PartialEq)]
pub enum S3EmptyError {
    /// Listing pagination failed; already-aggregated pages are discarded.
    #[error("Listing failed: {0}")]
    Listing(String),

    /// Listing succeeded but the bucket holds no versions and no delete
    /// markers. Reported as an error rather than a silent no-op since it
    /// usually means the wrong bucket was named.
    #[error("No object versions or delete markers found in the bucket")]
    EmptyBucket,

    /// A batch delete call failed or reported per-item errors.
    /// Carries the per-item diagnostic strings for the failing batch.
    #[error("Batch delete failed with {} per-item error(s)", details.len())]
    BatchDelete { details: Vec<String> },

    /// Configuration error (CLI validation).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl S3EmptyError {
    /// Get the appropriate process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            S3EmptyError::InvalidConfig(_) => 2,
            _ => 1,
        }
    }
}

/// Check if an anyhow::Error wraps an empty-bucket error.
pub fn is_empty_bucket_error(e: &Error) -> bool {
    if let Some(err) = e.downcast_ref::<S3EmptyError>() {
        return *err == S3EmptyError::EmptyBucket;
    }
    false
}

/// Extract the per-item failure details from an anyhow::Error wrapping
/// a batch-delete failure. Returns `None` for any other error.
pub fn batch_failure_details(e: &Error) -> Option<&[String]> {
    if let Some(S3EmptyError::BatchDelete { details }) = e.downcast_ref::<S3EmptyError>() {
        return Some(details);
    }
    None
}

/// Extract the exit code from an anyhow::Error, defaulting to 1.
pub fn exit_code_from_error(e: &Error) -> i32 {
    if let Some(err) = e.downcast_ref::<S3EmptyError>() {
        return err.exit_code();
    }
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    #[test]
    fn is_empty_bucket_error_test() {
        assert!(is_empty_bucket_error(&anyhow!(S3EmptyError::EmptyBucket)));
    }

    #[test]
    fn is_empty_bucket_error_false_for_other_errors() {
        assert!(!is_empty_bucket_error(&anyhow!(S3EmptyError::Listing(
            "test".to_string()
        ))));
        assert!(!is_empty_bucket_error(&anyhow!("generic error")));
    }

    #[test]
    fn batch_failure_details_extracts_items() {
        let e = anyhow!(S3EmptyError::BatchDelete {
            details: vec!["a: AccessDenied".to_string(), "b: InternalError".to_string()],
        });
        let details = batch_failure_details(&e).unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0], "a: AccessDenied");
    }

    #[test]
    fn batch_failure_details_none_for_other_errors() {
        assert!(batch_failure_details(&anyhow!(S3EmptyError::EmptyBucket)).is_none());
        assert!(batch_failure_details(&anyhow!("generic")).is_none());
    }

    #[test]
    fn exit_code_listing() {
        assert_eq!(S3EmptyError::Listing("x".to_string()).exit_code(), 1);
    }

    #[test]
    fn exit_code_empty_bucket() {
        assert_eq!(S3EmptyError::EmptyBucket.exit_code(), 1);
    }

    #[test]
    fn exit_code_batch_delete() {
        assert_eq!(
            S3EmptyError::BatchDelete { details: vec![] }.exit_code(),
            1
        );
    }

    #[test]
    fn exit_code_invalid_config() {
        assert_eq!(S3EmptyError::InvalidConfig("bad".to_string()).exit_code(), 2);
    }

    #[test]
    fn error_display_messages() {
        assert_eq!(
            S3EmptyError::Listing("timeout".to_string()).to_string(),
            "Listing failed: timeout"
        );
        assert_eq!(
            S3EmptyError::EmptyBucket.to_string(),
            "No object versions or delete markers found in the bucket"
        );
        assert_eq!(
            S3EmptyError::BatchDelete {
                details: vec!["k1: err".to_string(), "k2: err".to_string()]
            }
            .to_string(),
            "Batch delete failed with 2 per-item error(s)"
        );
        assert_eq!(
            S3EmptyError::InvalidConfig("missing bucket".to_string()).to_string(),
            "Invalid configuration: missing bucket"
        );
    }

    #[test]
    fn exit_code_from_anyhow_error() {
        assert_eq!(exit_code_from_error(&anyhow!(S3EmptyError::EmptyBucket)), 1);
        assert_eq!(
            exit_code_from_error(&anyhow!(S3EmptyError::InvalidConfig("x".to_string()))),
            2
        );
        assert_eq!(exit_code_from_error(&anyhow!("unknown error")), 1);
    }
}
