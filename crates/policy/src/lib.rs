//! Core domain for the repository hygiene tools.
//!
//! This crate contains every domain concept shared by the three workflows
//! (metadata collection, config remediation, branch-protection enforcement):
//! newtype identifiers, the repository record and its tri-state facts, the
//! compliance policy that decides what to do with a record, the embedded file
//! templates, and the [`Forge`] port trait that infrastructure crates implement.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`RepositoryId`, `BranchName`, etc.) |
//! | [`types`] | Value types (`TriState`, `RepositoryRecord`, outcomes, window) |
//! | [`compliance`] | Remediation and enforcement eligibility decisions |
//! | [`templates`] | Embedded config files and the branch-protection payload |
//! | [`forge`] | The [`Forge`] port trait |
//! | [`errors`] | Forge error and retry-policy types |

pub mod compliance;
pub mod errors;
pub mod forge;
pub mod identifiers;
pub mod templates;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use compliance::{
    is_protection_eligible, missing_files, protection_conditions_met, pull_request_text,
    remediation_plan, PullRequestText, RemediationPlan, REMEDIATION_BRANCH,
};
pub use errors::{ForgeError, RetryPolicy};
pub use forge::{FileCommit, Forge, PullRequestRequest, RepositorySummary};
pub use identifiers::{
    AccessToken, BranchName, CommitSha, OrgName, RepositoryId, RepositoryName, RunId,
};
pub use templates::{BranchProtectionSettings, ConfigFile};
pub use types::{
    ComplianceFacts, CreationWindow, FileOutcome, ProtectionResult, RemediationOutcome,
    RemediationStatus, RepoType, RepositoryRecord, Timestamp, TriState,
};
