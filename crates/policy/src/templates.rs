//! Embedded configuration files and the branch-protection payload.
//!
//! The two file bodies are committed verbatim; downstream tooling (pre-commit,
//! the reusable Gitleaks workflow) consumes them, so they must stay byte-exact.

use serde::{Deserialize, Serialize};

#[cfg(test)]
#[path = "templates_tests.rs"]
mod tests;

/// Pre-commit hook configuration running Gitleaks locally.
pub const PRE_COMMIT_CONTENT: &str = r#"repos:
  - repo: https://github.com/gitleaks/gitleaks
    rev: v8.18.1
    hooks:
      - id: gitleaks
"#;

/// CI workflow delegating to the organization's reusable Gitleaks scan.
pub const GITLEAKS_WORKFLOW_CONTENT: &str = r#"name: Gitleaks - Scanning Secrets in PR
on:
  pull_request:
    types: [synchronize, opened]
    branches: [main, master]
jobs:
  scan:
    uses: Capillary/security-workflows/.github/workflows/gitLeaks_reusable_worflow.yml@main
    secrets:
      GITLEAKS_LICENSE: ${{ secrets.GITLEAKS_LICENSE }}
"#;

/// Status check context the protection policy requires.
pub const GITLEAKS_STATUS_CHECK: &str = "scan / Gitleaks Secret Scanning";

// ---------------------------------------------------------------------------
// Required files
// ---------------------------------------------------------------------------

/// One of the two files every production repository must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigFile {
    /// `.pre-commit-config.yaml`
    PreCommitConfig,
    /// `.github/workflows/gitleaks_secret_scan.yml`
    GitleaksWorkflow,
}

impl ConfigFile {
    /// Both files, in the order they are probed and committed.
    pub const ALL: [ConfigFile; 2] = [ConfigFile::PreCommitConfig, ConfigFile::GitleaksWorkflow];

    /// Repository-relative path of the file.
    pub fn path(self) -> &'static str {
        match self {
            ConfigFile::PreCommitConfig => ".pre-commit-config.yaml",
            ConfigFile::GitleaksWorkflow => ".github/workflows/gitleaks_secret_scan.yml",
        }
    }

    /// Exact file body to commit.
    pub fn content(self) -> &'static str {
        match self {
            ConfigFile::PreCommitConfig => PRE_COMMIT_CONTENT,
            ConfigFile::GitleaksWorkflow => GITLEAKS_WORKFLOW_CONTENT,
        }
    }

    /// Short human label used in pull request titles.
    pub fn label(self) -> &'static str {
        match self {
            ConfigFile::PreCommitConfig => "pre-commit config",
            ConfigFile::GitleaksWorkflow => "gitleaks workflow",
        }
    }

    /// Commit message used when adding the file.
    pub fn commit_message(self) -> String {
        format!("Add {}", self.path())
    }
}

// ---------------------------------------------------------------------------
// Branch protection payload
// ---------------------------------------------------------------------------

/// `required_status_checks` block of the protection payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredStatusChecks {
    pub strict: bool,
    pub contexts: Vec<String>,
}

/// `required_pull_request_reviews` block of the protection payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequiredPullRequestReviews {
    pub dismiss_stale_reviews: bool,
    pub require_code_owner_reviews: bool,
    pub required_approving_review_count: u32,
}

/// Body of `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchProtectionSettings {
    pub required_status_checks: RequiredStatusChecks,
    pub enforce_admins: bool,
    pub required_conversation_resolution: bool,
    pub required_pull_request_reviews: RequiredPullRequestReviews,
    /// No push restrictions. Serialises as the `null` the API requires.
    pub restrictions: (),
    pub allow_force_pushes: bool,
    pub allow_deletions: bool,
    pub required_linear_history: bool,
    pub required_signatures: bool,
    pub lock_branch: bool,
}

impl BranchProtectionSettings {
    /// The fixed policy applied to unprotected production repositories.
    pub fn standard() -> Self {
        Self {
            required_status_checks: RequiredStatusChecks {
                strict: true,
                contexts: vec![GITLEAKS_STATUS_CHECK.to_string()],
            },
            enforce_admins: true,
            required_conversation_resolution: true,
            required_pull_request_reviews: RequiredPullRequestReviews {
                dismiss_stale_reviews: true,
                require_code_owner_reviews: true,
                required_approving_review_count: 1,
            },
            restrictions: (),
            allow_force_pushes: false,
            allow_deletions: false,
            required_linear_history: false,
            required_signatures: false,
            lock_branch: false,
        }
    }
}
