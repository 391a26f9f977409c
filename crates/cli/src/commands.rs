//! One entry point per binary: build the forge, run the workflow, write the report.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use tracing::info;

use policy::{BranchProtectionSettings, CreationWindow};
use report::{collector_table, ReportTable};
use workflows::{collect_recent_repositories, enforce_report, remediate_report};

use crate::{AddConfigsArgs, ApplyBranchProtectionArgs, FetchMetadataArgs};

#[cfg(test)]
#[path = "commands_tests.rs"]
mod tests;

/// Collects metadata for repositories created in the last `args.days` days.
///
/// Writes nothing when no repository falls inside the window.
pub async fn fetch_metadata(args: &FetchMetadataArgs) -> anyhow::Result<()> {
    let org = args.common.org()?;
    let forge = args.common.forge()?;
    let window = CreationWindow::trailing(Utc::now().date_naive(), args.days);

    let records = collect_recent_repositories(&forge, &org, window).await;
    if records.is_empty() {
        info!(
            org = %org,
            days = args.days,
            "No repositories were created in the last {} days in '{}'",
            args.days,
            org
        );
        return Ok(());
    }

    write_report(&collector_table(&records), &args.output)?;
    info!(
        path = %args.output.display(),
        repositories = records.len(),
        "Repository metadata saved"
    );
    Ok(())
}

/// Delivers missing config files to every eligible repository of the input report.
pub async fn add_configs(args: &AddConfigsArgs) -> anyhow::Result<()> {
    let org = args.common.org()?;
    let mut table = read_report(&args.input)?;
    table
        .require_columns(&report::columns::REMEDIATION_INPUT)
        .with_context(|| format!("Cannot remediate from {}", args.input.display()))?;
    let forge = args.common.forge()?;

    let summary = remediate_report(&forge, &org, &mut table).await?;

    write_report(&table, &args.output)?;
    info!(
        path = %args.output.display(),
        skipped = summary.skipped,
        direct_commits = summary.direct_commits,
        pull_requests = summary.pull_requests,
        errors = summary.errors,
        "Remediation report saved"
    );
    Ok(())
}

/// Applies the standard protection to every eligible repository of the input report.
pub async fn apply_branch_protection(args: &ApplyBranchProtectionArgs) -> anyhow::Result<()> {
    let org = args.common.org()?;
    let mut table = read_report(&args.input)?;
    let forge = args.common.forge()?;

    let settings = BranchProtectionSettings::standard();
    let summary = enforce_report(&forge, &org, &mut table, &settings).await;

    write_report(&table, &args.output)?;
    info!(
        path = %args.output.display(),
        applied = summary.applied,
        not_eligible = summary.not_eligible,
        failed = summary.failed,
        "Branch protection report saved"
    );
    Ok(())
}

fn read_report(path: &Path) -> anyhow::Result<ReportTable> {
    ReportTable::read_path(path).with_context(|| format!("Failed to read report {}", path.display()))
}

fn write_report(table: &ReportTable, path: &Path) -> anyhow::Result<()> {
    table
        .write_path(path)
        .with_context(|| format!("Failed to write report {}", path.display()))
}
