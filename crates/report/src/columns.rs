//! Exact column names of the repository report.

pub const REPO_NAME: &str = "Repo Name";
pub const CREATED_AT: &str = "Created At";
pub const CREATED_BY: &str = "Created By";
pub const LAST_UPDATED_BY: &str = "Last Updated By";
pub const HAS_PRE_COMMIT_CONFIG: &str = "Has .pre-commit-config.yaml";
pub const HAS_GITLEAKS_WORKFLOW: &str = "Has gitleaks_secret_scan.yml";
pub const REPO_TYPE: &str = "Repo_Type";
pub const BRANCH_PROTECTION_ENABLED: &str = "Branch Protection Enabled";
pub const RULESETS_ENABLED: &str = "Rulesets Enabled";
pub const DEFAULT_BRANCH_NAME: &str = "Default Branch Name";

/// Columns written by the collector, in order.
pub const COLLECTOR: [&str; 10] = [
    REPO_NAME,
    CREATED_AT,
    CREATED_BY,
    LAST_UPDATED_BY,
    HAS_PRE_COMMIT_CONFIG,
    HAS_GITLEAKS_WORKFLOW,
    REPO_TYPE,
    BRANCH_PROTECTION_ENABLED,
    RULESETS_ENABLED,
    DEFAULT_BRANCH_NAME,
];

pub const PRE_COMMIT_ADDED: &str = "pre_commit_added";
pub const GITLEAKS_ADDED: &str = "gitleaks_added";
pub const PULL_REQUEST_URL: &str = "pull_request_url";
pub const STATUS: &str = "status";

/// Columns appended by the remediator, in order.
pub const REMEDIATION: [&str; 4] = [PRE_COMMIT_ADDED, GITLEAKS_ADDED, PULL_REQUEST_URL, STATUS];

/// Column appended by the enforcer.
pub const PROTECTION_NEWLY_ADDED: &str = "Branch Protection Newly Added";

/// Columns the remediator reads and refuses to run without.
pub const REMEDIATION_INPUT: [&str; 6] = [
    REPO_NAME,
    REPO_TYPE,
    BRANCH_PROTECTION_ENABLED,
    HAS_PRE_COMMIT_CONFIG,
    HAS_GITLEAKS_WORKFLOW,
    DEFAULT_BRANCH_NAME,
];
