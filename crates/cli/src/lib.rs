//! Composition root for the repository hygiene tools.
//!
//! Each binary under `src/bin/` parses its arguments, wires observability
//! through [`logging::init_tracing`], builds a [`github::GithubForge`] and
//! hands it to one workflow through [`commands`]:
//!
//! | Binary | Workflow | Reads | Writes |
//! |---|---|---|---|
//! | `fetch-metadata` | [`workflows::collector`] | — | new report |
//! | `add-configs` | [`workflows::remediator`] | report | report, in place |
//! | `apply-branch-protection` | [`workflows::enforcer`] | report | results report |
//!
//! Per-repository failures are logged and recorded in the report; only a
//! failure that prevents the run as a whole (bad arguments, unreadable input,
//! unwritable output) makes a binary exit non-zero.

pub mod args;
pub mod commands;
pub mod logging;

pub use args::{
    normalize_legacy_flags, AddConfigsArgs, ApplyBranchProtectionArgs, CommonArgs,
    FetchMetadataArgs, LogFormat,
};
pub use commands::{add_configs, apply_branch_protection, fetch_metadata};
pub use logging::init_tracing;
