//! Typed error hierarchy for the airlift CLI.
//!
//! Two top-level enums cover the two subsystems:
//! - `ResolveError` — selector resolution failures
//! - `JobError` — deploy job lifecycle failures (stash access, status polling)

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors from selector resolution (component set building).
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("The specified metadata type is unsupported: [{type_name}]")]
    UnsupportedMetadataType { type_name: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Errors from the deploy job lifecycle (stash access, status polling).
#[derive(Debug, Error)]
pub enum JobError {
    #[error("The stash file was unparsable and has been renamed to {quarantine}: {source}")]
    InvalidStashFile {
        quarantine: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No deploy ID was provided or found in the stash. Re-run with an explicit job ID")]
    MissingDeployId,

    #[error("Deploy job {job_id} did not finish within {} seconds", .waited.as_secs())]
    PollTimeout { job_id: String, waited: Duration },

    #[error("Failed to access stash file at {path}: {source}")]
    StashIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_metadata_type_carries_type_name() {
        let err = ResolveError::UnsupportedMetadataType {
            type_name: "NonExistentType".to_string(),
        };
        match &err {
            ResolveError::UnsupportedMetadataType { type_name } => {
                assert_eq!(type_name, "NonExistentType");
            }
            _ => panic!("Expected UnsupportedMetadataType variant"),
        }
        assert!(err.to_string().contains("[NonExistentType]"));
    }

    #[test]
    fn invalid_stash_file_names_quarantine_path() {
        let parse_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err = JobError::InvalidStashFile {
            quarantine: PathBuf::from("/tmp/stash.json_corrupted_1700000000000"),
            source: parse_err,
        };
        assert!(err.to_string().contains("stash.json_corrupted_1700000000000"));
    }

    #[test]
    fn invalid_stash_file_chains_parse_error() {
        use std::error::Error as _;
        let parse_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = JobError::InvalidStashFile {
            quarantine: PathBuf::from("/tmp/quarantined"),
            source: parse_err,
        };
        assert!(err.source().is_some());
    }

    #[test]
    fn poll_timeout_carries_job_id_and_duration() {
        let err = JobError::PollTimeout {
            job_id: "0Af000001".to_string(),
            waited: Duration::from_secs(120),
        };
        match &err {
            JobError::PollTimeout { job_id, waited } => {
                assert_eq!(job_id, "0Af000001");
                assert_eq!(*waited, Duration::from_secs(120));
            }
            _ => panic!("Expected PollTimeout"),
        }
        assert!(err.to_string().contains("120"));
    }

    #[test]
    fn missing_deploy_id_is_matchable() {
        let err = JobError::MissingDeployId;
        assert!(matches!(err, JobError::MissingDeployId));
    }

    #[test]
    fn all_error_types_implement_std_error_trait() {
        fn assert_std_error<E: std::error::Error>(_: &E) {}
        let resolve_err = ResolveError::UnsupportedMetadataType {
            type_name: "x".into(),
        };
        assert_std_error(&resolve_err);
        let job_err = JobError::MissingDeployId;
        assert_std_error(&job_err);
    }
}
