//! Config remediator: deliver missing Gitleaks configuration to production repositories.

use tracing::{error, info, info_span, warn, Instrument};

use policy::{
    pull_request_text, remediation_plan, BranchName, ComplianceFacts, ConfigFile, FileCommit,
    FileOutcome, Forge, ForgeError, OrgName, PullRequestRequest, RemediationOutcome, RemediationPlan,
    RemediationStatus, RepositoryId,
};
use report::{columns, facts_from_row, write_remediation_outcome, ReportTable};

use crate::WorkflowError;

#[cfg(test)]
#[path = "remediator_tests.rs"]
mod tests;

/// Per-status counts for one remediation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RemediationSummary {
    pub skipped: usize,
    pub direct_commits: usize,
    pub pull_requests: usize,
    pub errors: usize,
}

impl RemediationSummary {
    fn record(&mut self, status: RemediationStatus) {
        match status {
            RemediationStatus::Skipped => self.skipped += 1,
            RemediationStatus::DirectCommit => self.direct_commits += 1,
            RemediationStatus::PullRequest => self.pull_requests += 1,
            RemediationStatus::Error => self.errors += 1,
        }
    }
}

/// Remediates every row of `table` in order and fills the remediation columns.
///
/// Fails before touching the forge if a required input column is missing.
pub async fn remediate_report<F>(
    forge: &F,
    org: &OrgName,
    table: &mut ReportTable,
) -> report::Result<RemediationSummary>
where
    F: Forge + ?Sized,
{
    table.require_columns(&columns::REMEDIATION_INPUT)?;
    table.ensure_columns(&columns::REMEDIATION);

    let mut summary = RemediationSummary::default();
    for row in 0..table.len() {
        let outcome = match facts_from_row(table, row) {
            Some(facts) => {
                let span = info_span!("remediate", repo = %facts.name);
                remediate_repository(forge, org, &facts).instrument(span).await
            }
            None => {
                warn!(row, "Row has no repository name; skipping");
                RemediationOutcome {
                    pre_commit: FileOutcome::NotAdded,
                    gitleaks: FileOutcome::NotAdded,
                    pull_request_url: None,
                    status: RemediationStatus::Skipped,
                }
            }
        };
        summary.record(outcome.status);
        write_remediation_outcome(table, row, &outcome);
    }
    Ok(summary)
}

/// Remediates one repository.
///
/// Any error aborts the remaining steps for this repository only and is
/// reported as [`RemediationStatus::Error`]; file outcomes recorded before the
/// error are kept.
pub async fn remediate_repository<F>(
    forge: &F,
    org: &OrgName,
    facts: &ComplianceFacts,
) -> RemediationOutcome
where
    F: Forge + ?Sized,
{
    let mut outcome = RemediationOutcome::initial(facts);
    let repo = RepositoryId::from_parts(org, &facts.name);

    let result = match remediation_plan(facts) {
        RemediationPlan::Skip => {
            info!(repo_type = %facts.repo_type.as_str(), "Nothing to remediate");
            return outcome;
        }
        RemediationPlan::DirectCommit(files) => {
            info!(files = files.len(), "Direct committing");
            commit_directly(forge, &repo, facts, &files, &mut outcome).await
        }
        RemediationPlan::PullRequest(files) => {
            info!(files = files.len(), "Default branch protected; delivering through a pull request");
            deliver_via_pull_request(forge, &repo, facts, &files, &mut outcome).await
        }
    };

    if let Err(err) = result {
        error!(error = %err, "Remediation failed");
        outcome.status = RemediationStatus::Error;
    }
    info!(status = %outcome.status, "Remediation finished");
    outcome
}

async fn commit_directly<F>(
    forge: &F,
    repo: &RepositoryId,
    facts: &ComplianceFacts,
    files: &[ConfigFile],
    outcome: &mut RemediationOutcome,
) -> Result<(), WorkflowError>
where
    F: Forge + ?Sized,
{
    let branch = facts
        .default_branch
        .as_ref()
        .ok_or(WorkflowError::MissingDefaultBranch)?;

    for file in files {
        if commit_file(forge, repo, *file, branch).await {
            *outcome.file_mut(*file) = FileOutcome::Added;
            outcome.status = RemediationStatus::DirectCommit;
        }
    }
    Ok(())
}

async fn deliver_via_pull_request<F>(
    forge: &F,
    repo: &RepositoryId,
    facts: &ComplianceFacts,
    files: &[ConfigFile],
    outcome: &mut RemediationOutcome,
) -> Result<(), WorkflowError>
where
    F: Forge + ?Sized,
{
    let base = facts
        .default_branch
        .as_ref()
        .ok_or(WorkflowError::MissingDefaultBranch)?;
    let head = BranchName::remediation();

    ensure_branch(forge, repo, base, &head).await?;

    let mut added = Vec::with_capacity(files.len());
    for file in files {
        if commit_file(forge, repo, *file, &head).await {
            added.push(*file);
        }
    }
    if added.is_empty() {
        warn!("No file could be committed; not opening a pull request");
        return Ok(());
    }

    let text = pull_request_text(&added);
    let request = PullRequestRequest {
        title: text.title,
        body: text.body,
        head,
        base: base.clone(),
    };
    match forge.open_pull_request(repo, &request).await? {
        Some(url) => {
            info!(url = %url, "Opened pull request");
            for file in &added {
                *outcome.file_mut(*file) = FileOutcome::Added;
            }
            outcome.pull_request_url = Some(url);
            outcome.status = RemediationStatus::PullRequest;
        }
        None => warn!("Pull request was not created"),
    }
    Ok(())
}

// Reuses the side branch if an earlier run already created it.
async fn ensure_branch<F>(
    forge: &F,
    repo: &RepositoryId,
    base: &BranchName,
    head: &BranchName,
) -> Result<(), WorkflowError>
where
    F: Forge + ?Sized,
{
    if forge.resolve_branch(repo, head).await?.is_some() {
        info!(branch = %head, "Reusing existing branch");
        return Ok(());
    }
    let sha = forge.branch_head(repo, base).await?;
    forge.create_branch(repo, head, &sha).await?;
    info!(branch = %head, from = %sha, "Created branch");
    Ok(())
}

/// Creates or overwrites `file` on `branch`. Failures are logged, not raised.
async fn commit_file<F>(forge: &F, repo: &RepositoryId, file: ConfigFile, branch: &BranchName) -> bool
where
    F: Forge + ?Sized,
{
    let commit = FileCommit {
        path: file.path().to_string(),
        content: file.content().to_string(),
        message: file.commit_message(),
        branch: branch.clone(),
    };

    let result: Result<(), ForgeError> = async {
        let sha = forge.file_sha(repo, file.path(), branch).await?;
        forge.put_file(repo, &commit, sha.as_ref()).await
    }
    .await;

    match result {
        Ok(()) => {
            info!(path = file.path(), branch = %branch, "Committed file");
            true
        }
        Err(err) => {
            warn!(path = file.path(), branch = %branch, error = %err, "Failed to commit file");
            false
        }
    }
}
