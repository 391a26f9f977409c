//! Shared value types for the repository hygiene domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! facts and outcomes that the compliance policy reasons about. Each type
//! knows its exact textual form in the interchange report (`as_str` /
//! `parse_cell`), because those strings are part of the contract between the
//! three workflows.

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::{BranchName, ConfigFile, RepositoryName};

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;

// ---------------------------------------------------------------------------
// Tri-state facts
// ---------------------------------------------------------------------------

/// A fact that was either confirmed, refuted, or could not be observed.
///
/// `Unknown` is kept distinct from `False` all the way through the pipeline:
/// a 404 from the forge means "confirmed absent", whereas a 403 or an
/// exhausted retry means "we do not know".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TriState {
    /// Confirmed present / enabled.
    True,
    /// Confirmed absent / disabled.
    False,
    /// Could not be determined.
    Unknown,
}

impl TriState {
    /// Parses a report cell.
    ///
    /// Case-insensitive and whitespace-trimmed: `true`/`yes` → `True`;
    /// `false`/`no`/`none`/empty → `False`; `unknown` → `Unknown`. Any other
    /// text is read as `True`, the conservative reading for both consumers
    /// (do not overwrite files, do not replace protection).
    pub fn parse_cell(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "false" | "no" | "none" | "" => TriState::False,
            "unknown" => TriState::Unknown,
            _ => TriState::True,
        }
    }

    /// The textual form written to the report.
    pub fn as_str(self) -> &'static str {
        match self {
            TriState::True => "True",
            TriState::False => "False",
            TriState::Unknown => "Unknown",
        }
    }

    /// Returns `true` only for a confirmed `True`.
    pub fn is_true(self) -> bool {
        self == TriState::True
    }

    /// Returns `true` only for a confirmed `False`.
    pub fn is_false(self) -> bool {
        self == TriState::False
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value {
            TriState::True
        } else {
            TriState::False
        }
    }
}

impl std::fmt::Display for TriState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Repository classification
// ---------------------------------------------------------------------------

/// The value of the `Repo_Type` custom property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepoType {
    /// The property is set; holds its value verbatim (e.g. `"prod"`).
    Value(String),
    /// The property lookup succeeded but `Repo_Type` is not defined.
    NotFound,
    /// The property lookup failed.
    Unknown,
}

impl RepoType {
    /// Report text for [`RepoType::NotFound`].
    pub const NOT_FOUND: &'static str = "Repo_Type not found";
    /// Report text for [`RepoType::Unknown`].
    pub const UNKNOWN: &'static str = "Unknown";

    /// Parses a report cell. The two sentinel strings map back to their variants.
    pub fn parse_cell(raw: &str) -> Self {
        match raw {
            Self::NOT_FOUND => RepoType::NotFound,
            Self::UNKNOWN => RepoType::Unknown,
            other => RepoType::Value(other.to_string()),
        }
    }

    /// The textual form written to the report.
    pub fn as_str(&self) -> &str {
        match self {
            RepoType::Value(value) => value,
            RepoType::NotFound => Self::NOT_FOUND,
            RepoType::Unknown => Self::UNKNOWN,
        }
    }

    /// Whether this is a production repository (`"prod"`, case-insensitive, trimmed).
    pub fn is_prod(&self) -> bool {
        match self {
            RepoType::Value(value) => value.trim().eq_ignore_ascii_case("prod"),
            RepoType::NotFound | RepoType::Unknown => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly. Displays as `YYYY-MM-DDTHH:MM:SSZ`, the same form the forge uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Parses an RFC 3339 timestamp (e.g. `2024-05-01T10:00:00Z`).
    pub fn parse_rfc3339(raw: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(raw.trim())
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }

    /// Returns the calendar date, dropping time-of-day.
    pub fn date(self) -> NaiveDate {
        self.0.date_naive()
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

/// The inclusive calendar-date window `[end - days, end]` used to select
/// recently created repositories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl CreationWindow {
    /// The window covering the `days` calendar days before `today`, plus `today`.
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        Self {
            start: today - Duration::days(i64::from(days)),
            end: today,
        }
    }

    /// First day of the window.
    pub fn start(self) -> NaiveDate {
        self.start
    }

    /// Last day of the window.
    pub fn end(self) -> NaiveDate {
        self.end
    }

    /// Whether `created_at` falls on a date inside the window (both ends inclusive).
    pub fn contains(self, created_at: Timestamp) -> bool {
        let date = created_at.date();
        self.start <= date && date <= self.end
    }
}

// ---------------------------------------------------------------------------
// Repository record
// ---------------------------------------------------------------------------

/// Everything the collector learns about one repository.
///
/// One record becomes one row of the interchange report. `None` in the
/// best-effort string fields is written as `Unknown`.
#[derive(Debug, Clone, PartialEq)]
pub struct RepositoryRecord {
    /// Repository name (row identity).
    pub name: RepositoryName,
    /// Creation time reported by the forge.
    pub created_at: Timestamp,
    /// Login of the actor behind the repository's `CreateEvent`.
    pub creator: Option<String>,
    /// Author name of the most recent commit.
    pub last_updated_by: Option<String>,
    /// Whether `.pre-commit-config.yaml` exists.
    pub has_pre_commit_config: bool,
    /// Whether the Gitleaks workflow file exists.
    pub has_gitleaks_workflow: bool,
    /// `Repo_Type` custom property.
    pub repo_type: RepoType,
    /// Branch protection on the default branch.
    pub branch_protection_enabled: TriState,
    /// Whether any rule-set is active or evaluating.
    pub rulesets_enabled: TriState,
    /// Default branch as re-fetched from the branch endpoint.
    pub default_branch_name: Option<BranchName>,
}

impl RepositoryRecord {
    /// The subset of this record the remediator and enforcer act on.
    pub fn facts(&self) -> ComplianceFacts {
        ComplianceFacts {
            name: self.name.clone(),
            repo_type: self.repo_type.clone(),
            has_pre_commit_config: self.has_pre_commit_config.into(),
            has_gitleaks_workflow: self.has_gitleaks_workflow.into(),
            branch_protection: self.branch_protection_enabled,
            rulesets: self.rulesets_enabled,
            default_branch: self.default_branch_name.clone(),
        }
    }
}

/// Compliance facts as read back from a report row by the later stages.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplianceFacts {
    /// Repository name (row identity).
    pub name: RepositoryName,
    /// `Repo_Type` custom property.
    pub repo_type: RepoType,
    /// Presence of `.pre-commit-config.yaml`.
    pub has_pre_commit_config: TriState,
    /// Presence of the Gitleaks workflow file.
    pub has_gitleaks_workflow: TriState,
    /// Branch protection on the default branch.
    pub branch_protection: TriState,
    /// Rule-set enforcement.
    pub rulesets: TriState,
    /// Default branch, if one was resolved.
    pub default_branch: Option<BranchName>,
}

impl ComplianceFacts {
    /// Presence of `file` according to the report.
    pub fn presence(&self, file: ConfigFile) -> TriState {
        match file {
            ConfigFile::PreCommitConfig => self.has_pre_commit_config,
            ConfigFile::GitleaksWorkflow => self.has_gitleaks_workflow,
        }
    }
}

// ---------------------------------------------------------------------------
// Remediation outcomes
// ---------------------------------------------------------------------------

/// What happened to one required file during remediation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileOutcome {
    /// The file was committed.
    Added,
    /// The file already existed; nothing was attempted.
    AlreadyPresent,
    /// Not attempted, or attempted and failed.
    NotAdded,
}

impl FileOutcome {
    /// The textual form written to the report.
    pub fn as_str(self) -> &'static str {
        match self {
            FileOutcome::Added => "TRUE",
            FileOutcome::AlreadyPresent => "FALSE (already exists)",
            FileOutcome::NotAdded => "",
        }
    }
}

/// Overall remediation result for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemediationStatus {
    /// Not eligible, or nothing could be delivered.
    Skipped,
    /// At least one file was committed straight to the default branch.
    DirectCommit,
    /// A pull request was opened.
    PullRequest,
    /// Remediation aborted with an error.
    Error,
}

impl RemediationStatus {
    /// The textual form written to the report.
    pub fn as_str(self) -> &'static str {
        match self {
            RemediationStatus::Skipped => "skipped",
            RemediationStatus::DirectCommit => "direct commit",
            RemediationStatus::PullRequest => "pull request",
            RemediationStatus::Error => "error",
        }
    }
}

impl std::fmt::Display for RemediationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four columns the remediator appends to a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemediationOutcome {
    /// Outcome for `.pre-commit-config.yaml`.
    pub pre_commit: FileOutcome,
    /// Outcome for the Gitleaks workflow.
    pub gitleaks: FileOutcome,
    /// URL of the opened pull request, if any.
    pub pull_request_url: Option<String>,
    /// Overall status.
    pub status: RemediationStatus,
}

impl RemediationOutcome {
    /// The starting outcome for `facts`: status `skipped`, files that are known
    /// to exist marked [`FileOutcome::AlreadyPresent`], everything else blank.
    pub fn initial(facts: &ComplianceFacts) -> Self {
        let mark = |presence: TriState| {
            if presence.is_true() {
                FileOutcome::AlreadyPresent
            } else {
                FileOutcome::NotAdded
            }
        };
        Self {
            pre_commit: mark(facts.has_pre_commit_config),
            gitleaks: mark(facts.has_gitleaks_workflow),
            pull_request_url: None,
            status: RemediationStatus::Skipped,
        }
    }

    /// The outcome slot for `file`.
    pub fn file_mut(&mut self, file: ConfigFile) -> &mut FileOutcome {
        match file {
            ConfigFile::PreCommitConfig => &mut self.pre_commit,
            ConfigFile::GitleaksWorkflow => &mut self.gitleaks,
        }
    }
}

// ---------------------------------------------------------------------------
// Enforcement outcome
// ---------------------------------------------------------------------------

/// Result of the branch-protection enforcer for one repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProtectionResult {
    /// Protection was applied.
    Applied,
    /// The repository did not meet the eligibility condition.
    NotEligible,
    /// Eligible, but the protection could not be applied.
    Failed,
}

impl ProtectionResult {
    /// The textual form written to the report.
    pub fn as_str(self) -> &'static str {
        match self {
            ProtectionResult::Applied => "Yes",
            ProtectionResult::NotEligible => "No",
            ProtectionResult::Failed => "Failed",
        }
    }
}
