//! Compliance policy shared by the remediator and the enforcer.
//!
//! Pure decisions over [`ComplianceFacts`]: which files a repository is
//! missing, which delivery path remediation takes, whether the protection
//! policy may be applied, and how a remediation pull request is worded.

use tracing::warn;

use crate::{ComplianceFacts, ConfigFile, RepoType, TriState};

#[cfg(test)]
#[path = "compliance_tests.rs"]
mod tests;

/// Side branch that carries remediation commits when the default branch is protected.
pub const REMEDIATION_BRANCH: &str = "add-gitleaks-config";

/// Title used when a pull request is opened without any listed files.
pub const FALLBACK_PR_TITLE: &str = "Add Gitleaks configs";

/// Body used when a pull request is opened without any listed files.
pub const FALLBACK_PR_BODY: &str =
    "Adding `.pre-commit-config.yaml` and Gitleaks secret scan workflow.";

// ---------------------------------------------------------------------------
// Remediation
// ---------------------------------------------------------------------------

/// How remediation should deliver the missing files of one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemediationPlan {
    /// Not a production repository, or nothing is missing.
    Skip,
    /// Commit straight to the default branch (branch protection is off).
    DirectCommit(Vec<ConfigFile>),
    /// Commit to [`REMEDIATION_BRANCH`] and open a pull request.
    PullRequest(Vec<ConfigFile>),
}

/// Files the report confirms as absent.
///
/// A file whose presence is `Unknown` is not listed: writing it could
/// overwrite content we never saw.
pub fn missing_files(facts: &ComplianceFacts) -> Vec<ConfigFile> {
    ConfigFile::ALL
        .into_iter()
        .filter(|file| facts.presence(*file).is_false())
        .collect()
}

/// Decides the remediation path for `facts`.
///
/// Only production repositories missing at least one file are remediated.
/// Unprotected default branches get direct commits; protected ones, and
/// ones whose protection state is unknown, get a pull request.
pub fn remediation_plan(facts: &ComplianceFacts) -> RemediationPlan {
    if !facts.repo_type.is_prod() {
        return RemediationPlan::Skip;
    }
    let missing = missing_files(facts);
    if missing.is_empty() {
        return RemediationPlan::Skip;
    }
    match facts.branch_protection {
        TriState::False => RemediationPlan::DirectCommit(missing),
        TriState::True => RemediationPlan::PullRequest(missing),
        TriState::Unknown => {
            warn!(
                repo = %facts.name,
                "Branch protection state unknown; delivering files through a pull request"
            );
            RemediationPlan::PullRequest(missing)
        }
    }
}

// ---------------------------------------------------------------------------
// Enforcement
// ---------------------------------------------------------------------------

/// Whether the standard protection policy should be applied.
///
/// Requires a production repository with neither branch protection nor an
/// enforcing rule-set. An `Unknown` state counts as "not enabled"; each such
/// case is logged because the true state may simply have been unobservable.
pub fn is_protection_eligible(facts: &ComplianceFacts) -> bool {
    if !protection_conditions_met(&facts.repo_type, facts.branch_protection, facts.rulesets) {
        return false;
    }
    if facts.branch_protection == TriState::Unknown || facts.rulesets == TriState::Unknown {
        warn!(
            repo = %facts.name,
            branch_protection = %facts.branch_protection,
            rulesets = %facts.rulesets,
            "Treating unknown protection state as disabled"
        );
    }
    true
}

/// The eligibility rule on its own: production, and neither branch protection
/// nor an enforcing rule-set confirmed.
pub fn protection_conditions_met(
    repo_type: &RepoType,
    branch_protection: TriState,
    rulesets: TriState,
) -> bool {
    repo_type.is_prod() && !branch_protection.is_true() && !rulesets.is_true()
}

// ---------------------------------------------------------------------------
// Pull request wording
// ---------------------------------------------------------------------------

/// Title and body of a remediation pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestText {
    pub title: String,
    pub body: String,
}

/// Words the pull request after the files it actually adds.
pub fn pull_request_text(files: &[ConfigFile]) -> PullRequestText {
    if files.is_empty() {
        return PullRequestText {
            title: FALLBACK_PR_TITLE.to_string(),
            body: FALLBACK_PR_BODY.to_string(),
        };
    }
    let labels: Vec<String> = files.iter().map(|f| f.label().to_string()).collect();
    let paths: Vec<String> = files.iter().map(|f| format!("`{}`", f.path())).collect();
    PullRequestText {
        title: format!("Add {}.", join_with_and(&labels)),
        body: format!(
            "Adding {} to enable Gitleaks secret scanning.",
            join_with_and(&paths)
        ),
    }
}

/// `a`, `a and b`, `a, b and c`.
fn join_with_and(items: &[String]) -> String {
    match items {
        [] => String::new(),
        [only] => only.clone(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}
