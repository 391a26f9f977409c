//! Branch-protection enforcer.

use tracing::{error, info, info_span, warn, Instrument};

use policy::{
    is_protection_eligible, protection_conditions_met, BranchProtectionSettings, ComplianceFacts,
    Forge, OrgName, ProtectionResult, RepoType, RepositoryId, TriState,
};
use report::{columns, facts_from_row, write_protection_result, ReportTable};

#[cfg(test)]
#[path = "enforcer_tests.rs"]
mod tests;

/// Per-result counts for one enforcement run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnforcementSummary {
    pub applied: usize,
    pub not_eligible: usize,
    pub failed: usize,
}

/// Enforces `settings` on every eligible row of `table` and fills the result column.
pub async fn enforce_report<F>(
    forge: &F,
    org: &OrgName,
    table: &mut ReportTable,
    settings: &BranchProtectionSettings,
) -> EnforcementSummary
where
    F: Forge + ?Sized,
{
    table.ensure_column(columns::PROTECTION_NEWLY_ADDED);

    let mut summary = EnforcementSummary::default();
    for row in 0..table.len() {
        let result = match facts_from_row(table, row) {
            Some(facts) => {
                let span = info_span!("enforce", repo = %facts.name);
                enforce_repository(forge, org, &facts, settings)
                    .instrument(span)
                    .await
            }
            None => nameless_row_result(table, row),
        };
        match result {
            ProtectionResult::Applied => summary.applied += 1,
            ProtectionResult::NotEligible => summary.not_eligible += 1,
            ProtectionResult::Failed => summary.failed += 1,
        }
        write_protection_result(table, row, result);
    }
    summary
}

/// A row without a repository name is only a failure if it would otherwise
/// have been eligible.
fn nameless_row_result(table: &ReportTable, row: usize) -> ProtectionResult {
    let eligible = protection_conditions_met(
        &RepoType::parse_cell(table.cell(row, columns::REPO_TYPE)),
        TriState::parse_cell(table.cell(row, columns::BRANCH_PROTECTION_ENABLED)),
        TriState::parse_cell(table.cell(row, columns::RULESETS_ENABLED)),
    );
    if eligible {
        warn!(row, "Row has no repository name");
        ProtectionResult::Failed
    } else {
        ProtectionResult::NotEligible
    }
}

/// Applies `settings` to the default branch of one repository if it is eligible.
pub async fn enforce_repository<F>(
    forge: &F,
    org: &OrgName,
    facts: &ComplianceFacts,
    settings: &BranchProtectionSettings,
) -> ProtectionResult
where
    F: Forge + ?Sized,
{
    if !is_protection_eligible(facts) {
        info!(
            repo_type = %facts.repo_type.as_str(),
            branch_protection = %facts.branch_protection,
            rulesets = %facts.rulesets,
            "Skipping: conditions not met"
        );
        return ProtectionResult::NotEligible;
    }

    let Some(branch) = &facts.default_branch else {
        warn!("Skipping: missing default branch");
        return ProtectionResult::Failed;
    };

    let repo = RepositoryId::from_parts(org, &facts.name);
    info!(branch = %branch, "Applying protection");
    match forge.apply_branch_protection(&repo, branch, settings).await {
        Ok(()) => {
            info!(branch = %branch, "Protection applied");
            ProtectionResult::Applied
        }
        Err(err) => {
            error!(branch = %branch, error = %err, "Failed to apply protection");
            ProtectionResult::Failed
        }
    }
}
