//! Durable job-id stash.
//!
//! One JSON file in the per-user airlift directory, shared across every
//! project on the machine, keyed by job class:
//!
//! ```json
//! { "SOURCE_DEPLOY": { "jobid": "0Af000001" } }
//! ```
//!
//! The file has no multi-writer protection; concurrent writers race
//! last-write-wins (single operator workflow assumed). An unparsable file is
//! renamed aside with a timestamp suffix rather than deleted, so the record
//! stays inspectable.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::config;
use crate::errors::JobError;

pub const STASH_FILE: &str = "stash.json";

/// Job classes keyed in the stash.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobClass {
    Source,
    MetadataApi,
}

impl JobClass {
    pub fn stash_key(&self) -> &'static str {
        match self {
            JobClass::Source => "SOURCE_DEPLOY",
            JobClass::MetadataApi => "MDAPI_DEPLOY",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StashEntry {
    pub jobid: String,
}

type StashRecords = BTreeMap<String, StashEntry>;

/// Read/write/quarantine access to the stash file.
#[derive(Debug, Clone)]
pub struct DeployStash {
    path: PathBuf,
}

impl DeployStash {
    /// Stash in the per-user airlift directory (`AIRLIFT_CONFIG_DIR`
    /// overrides the location).
    pub fn open() -> anyhow::Result<Self> {
        Ok(Self::at(config::config_dir()?))
    }

    /// Stash under an explicit directory.
    pub fn at(dir: impl Into<PathBuf>) -> Self {
        Self {
            path: dir.into().join(STASH_FILE),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Record a submitted job id under the class key, overwriting any prior
    /// record for that class. Creates the file and its directory on first
    /// use. A write failure is fatal.
    pub fn write(&self, class: JobClass, job_id: &str) -> Result<(), JobError> {
        debug!(
            job_id,
            key = class.stash_key(),
            path = %self.path.display(),
            "stashing deploy ID"
        );
        let mut records: StashRecords = match fs::read_to_string(&self.path) {
            // An unparsable file is replaced wholesale here; quarantine is
            // the reader's job.
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => StashRecords::default(),
            Err(source) => {
                return Err(JobError::StashIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };
        records.insert(
            class.stash_key().to_string(),
            StashEntry {
                jobid: job_id.to_string(),
            },
        );

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| JobError::StashIo {
                path: self.path.clone(),
                source,
            })?;
        }
        let raw = serde_json::to_string_pretty(&records)
            .map_err(|err| JobError::Other(err.into()))?;
        fs::write(&self.path, raw).map_err(|source| JobError::StashIo {
            path: self.path.clone(),
            source,
        })
    }

    /// Resolve a job id: an explicit id wins without touching storage;
    /// otherwise the stashed record for the class is read.
    pub fn resolve_job_id(
        &self,
        class: JobClass,
        explicit: Option<&str>,
    ) -> Result<String, JobError> {
        if let Some(id) = explicit {
            return Ok(id.to_string());
        }

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(JobError::MissingDeployId);
            }
            Err(source) => {
                return Err(JobError::StashIo {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let records: StashRecords = match serde_json::from_str(&raw) {
            Ok(records) => records,
            Err(source) => return Err(self.quarantine(source)),
        };

        match records.get(class.stash_key()) {
            Some(entry) => {
                debug!(
                    job_id = %entry.jobid,
                    path = %self.path.display(),
                    "using stashed deploy ID"
                );
                Ok(entry.jobid.clone())
            }
            None => Err(JobError::MissingDeployId),
        }
    }

    /// Move the unparsable file aside so it stays inspectable, then report
    /// where it went.
    fn quarantine(&self, source: serde_json::Error) -> JobError {
        let quarantine = PathBuf::from(format!(
            "{}_corrupted_{}",
            self.path.display(),
            Utc::now().timestamp_millis()
        ));
        if let Err(err) = fs::rename(&self.path, &quarantine) {
            return JobError::StashIo {
                path: self.path.clone(),
                source: err,
            };
        }
        warn!(
            quarantine = %quarantine.display(),
            "stash file was unparsable and has been quarantined"
        );
        JobError::InvalidStashFile { quarantine, source }
    }
}
