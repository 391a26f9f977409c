//! Mapping between report rows and [`policy`] types.

use policy::{
    BranchName, ComplianceFacts, ProtectionResult, RemediationOutcome, RepoType,
    RepositoryName, RepositoryRecord, TriState,
};

use crate::columns;
use crate::table::ReportTable;

#[cfg(test)]
#[path = "records_tests.rs"]
mod tests;

const UNKNOWN: &str = "Unknown";

/// The collector row for `record`, in [`columns::COLLECTOR`] order.
pub fn record_to_row(record: &RepositoryRecord) -> Vec<String> {
    vec![
        record.name.to_string(),
        record.created_at.to_string(),
        record.creator.clone().unwrap_or_else(|| UNKNOWN.to_string()),
        record
            .last_updated_by
            .clone()
            .unwrap_or_else(|| UNKNOWN.to_string()),
        TriState::from(record.has_pre_commit_config).to_string(),
        TriState::from(record.has_gitleaks_workflow).to_string(),
        record.repo_type.as_str().to_string(),
        record.branch_protection_enabled.to_string(),
        record.rulesets_enabled.to_string(),
        record
            .default_branch_name
            .as_ref()
            .map(BranchName::to_string)
            .unwrap_or_default(),
    ]
}

/// A fresh report holding one row per record.
pub fn collector_table(records: &[RepositoryRecord]) -> ReportTable {
    let mut table = ReportTable::new(columns::COLLECTOR);
    for record in records {
        table.push_row(record_to_row(record));
    }
    table
}

/// Reads the compliance facts of `row`.
///
/// Missing columns read as empty cells. Returns `None` when the row has no
/// repository name.
pub fn facts_from_row(table: &ReportTable, row: usize) -> Option<ComplianceFacts> {
    let name = RepositoryName::new(table.cell(row, columns::REPO_NAME).trim())?;
    Some(ComplianceFacts {
        name,
        repo_type: RepoType::parse_cell(table.cell(row, columns::REPO_TYPE)),
        has_pre_commit_config: TriState::parse_cell(
            table.cell(row, columns::HAS_PRE_COMMIT_CONFIG),
        ),
        has_gitleaks_workflow: TriState::parse_cell(
            table.cell(row, columns::HAS_GITLEAKS_WORKFLOW),
        ),
        branch_protection: TriState::parse_cell(
            table.cell(row, columns::BRANCH_PROTECTION_ENABLED),
        ),
        rulesets: TriState::parse_cell(table.cell(row, columns::RULESETS_ENABLED)),
        default_branch: BranchName::new(table.cell(row, columns::DEFAULT_BRANCH_NAME).trim()),
    })
}

/// Fills the remediation columns of `row`.
pub fn write_remediation_outcome(
    table: &mut ReportTable,
    row: usize,
    outcome: &RemediationOutcome,
) {
    table.set_cell(row, columns::PRE_COMMIT_ADDED, outcome.pre_commit.as_str());
    table.set_cell(row, columns::GITLEAKS_ADDED, outcome.gitleaks.as_str());
    table.set_cell(
        row,
        columns::PULL_REQUEST_URL,
        outcome.pull_request_url.clone().unwrap_or_default(),
    );
    table.set_cell(row, columns::STATUS, outcome.status.as_str());
}

/// Fills the enforcement column of `row`.
pub fn write_protection_result(table: &mut ReportTable, row: usize, result: ProtectionResult) {
    table.set_cell(row, columns::PROTECTION_NEWLY_ADDED, result.as_str());
}
