//! Deploy job lifecycle: submission, id stashing, status polling.
//!
//! | Module   | Responsibility                                         |
//! |----------|--------------------------------------------------------|
//! | `api`    | Remote deploy service client (trait seam + HTTP impl)  |
//! | `stash`  | Durable job-id records shared across projects          |
//! | `poller` | Deadline-bounded status polling                        |
//! | `status` | Status payloads, results, lifecycle states             |
//! | `banner` | Human-readable version banner                          |

pub mod api;
pub mod banner;
pub mod poller;
pub mod stash;
pub mod status;

pub use api::{ApiOptions, DeployApi, HttpDeployApi, TestLevel};
pub use banner::{DeployAction, version_banner};
pub use poller::{PollOptions, poll};
pub use stash::{DeployStash, JobClass};
pub use status::{ComponentFailure, DeployResult, DeployStatus, JobState};
