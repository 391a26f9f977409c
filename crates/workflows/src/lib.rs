//! Repository hygiene workflows.
//!
//! Three independent batch stages, each generic over the [`policy::Forge`]
//! port and composed only through the report file:
//!
//! 1. [`collector`]: enumerate recently created repositories and probe
//!    their compliance facts into a new report.
//! 2. [`remediator`]: commit missing config files to eligible repositories,
//!    directly or through a pull request.
//! 3. [`enforcer`]: apply the standard branch protection to eligible
//!    repositories.
//!
//! ## Architectural Layer
//!
//! **Orchestration layer.** Stages sequence forge calls and apply the
//! decisions made in [`policy::compliance`]. They contain no HTTP or file
//! handling of their own. Repositories are processed strictly one at a time,
//! in report order; a failure is contained to the repository it happened in.

pub mod collector;
pub mod enforcer;
pub mod remediator;

#[cfg(test)]
mod fake_forge;

pub use collector::{collect_recent_repositories, probe_repository, PAGE_SIZE};
pub use enforcer::{enforce_report, enforce_repository, EnforcementSummary};
pub use remediator::{remediate_report, remediate_repository, RemediationSummary};

use policy::ForgeError;
use thiserror::Error;

/// Failures that abort remediation of a single repository.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("Repository has no resolvable default branch")]
    MissingDefaultBranch,

    #[error(transparent)]
    Forge(#[from] ForgeError),
}
