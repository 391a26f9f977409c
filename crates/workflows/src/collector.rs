//! Metadata collector: which recent repositories exist, and how compliant are they?
//!
//! Every probe is independent. A failing probe degrades only its own field
//! (`Unknown`, `false`, or an empty branch name) and never stops the others.

use tracing::{error, info, info_span, warn, Instrument};

use policy::{
    ConfigFile, CreationWindow, Forge, ForgeError, OrgName, RepoType, RepositoryId,
    RepositoryRecord, RepositorySummary, Timestamp, TriState,
};

#[cfg(test)]
#[path = "collector_tests.rs"]
mod tests;

/// Repositories requested per listing page.
pub const PAGE_SIZE: u32 = 100;

/// Custom property holding the repository classification.
pub const REPO_TYPE_PROPERTY: &str = "Repo_Type";

/// Enumerates the organization's repositories and probes every one created
/// inside `window`.
///
/// Paging stops at the first empty page. A failed listing request is logged
/// and also ends paging; the records gathered so far are returned.
pub async fn collect_recent_repositories<F>(
    forge: &F,
    org: &OrgName,
    window: CreationWindow,
) -> Vec<RepositoryRecord>
where
    F: Forge + ?Sized,
{
    let mut records = Vec::new();
    let mut page = 1;

    loop {
        let summaries = match forge.list_repositories(org, page, PAGE_SIZE).await {
            Ok(summaries) => summaries,
            Err(err) => {
                error!(org = %org, page, error = %err, "Failed to fetch repositories");
                break;
            }
        };
        if summaries.is_empty() {
            break;
        }

        for summary in &summaries {
            let Some(created_at) = Timestamp::parse_rfc3339(&summary.created_at) else {
                warn!(
                    repo = %summary.name,
                    created_at = %summary.created_at,
                    "Skipping repository with unparseable creation time"
                );
                continue;
            };
            if !window.contains(created_at) {
                continue;
            }

            let span = info_span!("probe", repo = %summary.name);
            let record = probe_repository(forge, org, summary, created_at)
                .instrument(span)
                .await;
            records.push(record);
        }

        page += 1;
    }

    info!(
        org = %org,
        from = %window.start(),
        to = %window.end(),
        repositories = records.len(),
        "Collected repository metadata"
    );
    records
}

/// Runs every compliance probe against one repository.
pub async fn probe_repository<F>(
    forge: &F,
    org: &OrgName,
    summary: &RepositorySummary,
    created_at: Timestamp,
) -> RepositoryRecord
where
    F: Forge + ?Sized,
{
    let repo = RepositoryId::from_parts(org, &summary.name);

    let creator = or_fallback(forge.repository_creator(&repo).await, None, "creator");
    let last_updated_by = or_fallback(forge.last_committer(&repo).await, None, "last_committer");

    let has_pre_commit_config = or_fallback(
        forge
            .file_exists(&repo, ConfigFile::PreCommitConfig.path())
            .await,
        false,
        "pre_commit_config",
    );
    let has_gitleaks_workflow = or_fallback(
        forge
            .file_exists(&repo, ConfigFile::GitleaksWorkflow.path())
            .await,
        false,
        "gitleaks_workflow",
    );

    let repo_type = match forge.custom_property(&repo, REPO_TYPE_PROPERTY).await {
        Ok(Some(value)) => RepoType::Value(value),
        Ok(None) => RepoType::NotFound,
        Err(err) => {
            warn!(probe = "repo_type", error = %err, "Probe failed");
            RepoType::Unknown
        }
    };

    let branch_protection_enabled = match &summary.default_branch {
        Some(branch) => tri_state(
            forge.branch_protection_enabled(&repo, branch).await,
            "branch_protection",
        ),
        None => {
            warn!("Listing has no default branch; branch protection unknown");
            TriState::Unknown
        }
    };
    let rulesets_enabled = tri_state(forge.rulesets_enforced(&repo).await, "rulesets");

    let default_branch_name = match &summary.default_branch {
        Some(branch) => or_fallback(
            forge.resolve_branch(&repo, branch).await,
            None,
            "default_branch",
        ),
        None => None,
    };

    RepositoryRecord {
        name: summary.name.clone(),
        created_at,
        creator,
        last_updated_by,
        has_pre_commit_config,
        has_gitleaks_workflow,
        repo_type,
        branch_protection_enabled,
        rulesets_enabled,
        default_branch_name,
    }
}

fn or_fallback<T>(result: Result<T, ForgeError>, fallback: T, probe: &'static str) -> T {
    result.unwrap_or_else(|err| {
        warn!(probe, error = %err, "Probe failed");
        fallback
    })
}

fn tri_state(result: Result<bool, ForgeError>, probe: &'static str) -> TriState {
    match result {
        Ok(value) => value.into(),
        Err(err) => {
            warn!(probe, error = %err, "Probe failed");
            TriState::Unknown
        }
    }
}
