//! [`policy::Forge`] implementation over the GitHub REST API.
//!
//! Status semantics: 200/201/204 are success; 404 is a meaningful "absent"
//! answer for protection, rule-set and file probes; any other 4xx is a
//! terminal failure for that call; 5xx is retried by [`RetryingClient`].

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Url;
use serde_json::json;
use tracing::{debug, warn};

use policy::{
    AccessToken, BranchName, BranchProtectionSettings, CommitSha, FileCommit, Forge, ForgeError,
    OrgName, PullRequestRequest, RepositoryId, RepositoryName, RepositorySummary,
};

use crate::models;
use crate::retry::{RetryingClient, RetrySettings};
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;

/// Public GitHub API root.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// GitHub-backed [`Forge`].
#[derive(Debug, Clone)]
pub struct GithubForge<T = ReqwestTransport> {
    client: RetryingClient<T>,
    base_url: String,
}

impl GithubForge<ReqwestTransport> {
    /// Connects to `base_url` (e.g. [`DEFAULT_API_URL`]) with the default retry settings.
    pub fn new(base_url: &str, token: &AccessToken) -> Result<Self, ForgeError> {
        let transport = ReqwestTransport::new(token)?;
        Ok(Self::with_transport(base_url, transport, RetrySettings::default()))
    }
}

impl<T: HttpTransport> GithubForge<T> {
    pub fn with_transport(base_url: &str, transport: T, settings: RetrySettings) -> Self {
        Self {
            client: RetryingClient::new(transport, settings),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// `base_url` extended by `path`, one percent-encoded segment per entry,
    /// plus form-encoded `query` pairs.
    fn endpoint(&self, path: &[&str], query: &[(&str, &str)]) -> Result<String, ForgeError> {
        let mut url = Url::parse(&self.base_url).map_err(|e| {
            ForgeError::InvalidRequest(format!("invalid API URL {}: {e}", self.base_url))
        })?;
        url.path_segments_mut()
            .map_err(|_| ForgeError::InvalidRequest(format!("invalid API URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(path);
        if !query.is_empty() {
            url.query_pairs_mut().extend_pairs(query);
        }
        Ok(url.into())
    }

    /// `repos/{owner}/{repo}/` followed by `tail`.
    fn repo_url(
        &self,
        repo: &RepositoryId,
        tail: &[&str],
        query: &[(&str, &str)],
    ) -> Result<String, ForgeError> {
        let path: Vec<&str> = ["repos"]
            .into_iter()
            .chain(repo.as_str().split('/'))
            .chain(tail.iter().copied())
            .collect();
        self.endpoint(&path, query)
    }
}

#[async_trait]
impl<T: HttpTransport> Forge for GithubForge<T> {
    async fn list_repositories(
        &self,
        org: &OrgName,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, ForgeError> {
        let per_page = per_page.to_string();
        let page = page.to_string();
        let url = self.endpoint(
            &["orgs", org.as_str(), "repos"],
            &[("per_page", per_page.as_str()), ("page", page.as_str())],
        )?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        if response.status != 200 {
            return Err(response.into_unexpected());
        }

        let listing: Vec<models::RepositoryListing> = response.json()?;
        let mut summaries = Vec::with_capacity(listing.len());
        for entry in listing {
            let Some(name) = RepositoryName::new(entry.name) else {
                warn!(url = %response.url, "Skipping repository entry without a name");
                continue;
            };
            summaries.push(RepositorySummary {
                name,
                created_at: entry.created_at,
                default_branch: entry.default_branch.and_then(BranchName::new),
            });
        }
        Ok(summaries)
    }

    async fn repository_creator(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError> {
        let response = self
            .client
            .send(&ApiRequest::get(self.repo_url(repo, &["events"], &[])?))
            .await?;
        if response.status != 200 {
            return Err(response.into_unexpected());
        }

        let events: Vec<models::Event> = response.json()?;
        Ok(events
            .into_iter()
            .find(|event| event.kind == "CreateEvent")
            .and_then(|event| event.actor)
            .map(|actor| actor.login))
    }

    async fn last_committer(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError> {
        let response = self
            .client
            .send(&ApiRequest::get(self.repo_url(repo, &["commits"], &[("per_page", "1")])?))
            .await?;
        if response.status != 200 {
            return Err(response.into_unexpected());
        }

        let commits: Vec<models::CommitListing> = response.json()?;
        Ok(commits
            .into_iter()
            .next()
            .and_then(|c| c.commit.author)
            .and_then(|author| author.name))
    }

    async fn file_exists(&self, repo: &RepositoryId, path: &str) -> Result<bool, ForgeError> {
        let url = self.repo_url(repo, &contents_path(path), &[])?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        Ok(response.status == 200)
    }

    async fn custom_property(
        &self,
        repo: &RepositoryId,
        name: &str,
    ) -> Result<Option<String>, ForgeError> {
        let response = self
            .client
            .send(&ApiRequest::get(self.repo_url(repo, &["properties", "values"], &[])?))
            .await?;
        if response.status != 200 {
            return Err(response.into_unexpected());
        }

        let properties: Vec<models::PropertyValue> = response.json()?;
        Ok(properties
            .iter()
            .find(|p| p.property_name == name)
            .map(models::PropertyValue::value_text))
    }

    async fn branch_protection_enabled(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<bool, ForgeError> {
        let url = self.repo_url(repo, &["branches", branch.as_str(), "protection"], &[])?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        match response.status {
            200 => Ok(true),
            404 => Ok(false),
            _ => Err(response.into_unexpected()),
        }
    }

    async fn rulesets_enforced(&self, repo: &RepositoryId) -> Result<bool, ForgeError> {
        let response = self
            .client
            .send(&ApiRequest::get(self.repo_url(repo, &["rulesets"], &[])?))
            .await?;
        match response.status {
            200 => {
                let rulesets: Vec<models::Ruleset> = response.json()?;
                Ok(rulesets.iter().any(|r| {
                    matches!(r.enforcement.as_deref(), Some("active") | Some("evaluate"))
                }))
            }
            404 => Ok(false),
            _ => Err(response.into_unexpected()),
        }
    }

    async fn resolve_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<Option<BranchName>, ForgeError> {
        let url = self.repo_url(repo, &["branches", branch.as_str()], &[])?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        if response.status != 200 {
            debug!(url = %response.url, status = response.status, "Branch not resolved");
            return Ok(None);
        }
        let found: models::Branch = response.json()?;
        Ok(BranchName::new(found.name))
    }

    async fn file_sha(
        &self,
        repo: &RepositoryId,
        path: &str,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, ForgeError> {
        let url = self.repo_url(repo, &contents_path(path), &[("ref", branch.as_str())])?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        if response.status != 200 {
            return Ok(None);
        }
        let entry: models::ContentEntry = response.json()?;
        Ok(CommitSha::new(entry.sha))
    }

    async fn put_file(
        &self,
        repo: &RepositoryId,
        commit: &FileCommit,
        sha: Option<&CommitSha>,
    ) -> Result<(), ForgeError> {
        let mut payload = json!({
            "message": commit.message,
            "content": BASE64.encode(commit.content.as_bytes()),
            "branch": commit.branch.as_str(),
        });
        if let Some(sha) = sha {
            payload["sha"] = json!(sha.as_str());
        }

        let url = self.repo_url(repo, &contents_path(&commit.path), &[])?;
        let response = self.client.send(&ApiRequest::put(url, payload)).await?;
        match response.status {
            200 | 201 => Ok(()),
            _ => Err(response.into_unexpected()),
        }
    }

    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, ForgeError> {
        let url = self.repo_url(repo, &["git", "ref", "heads", branch.as_str()], &[])?;
        let response = self.client.send(&ApiRequest::get(url)).await?;
        if response.status != 200 {
            return Err(response.into_unexpected());
        }
        let reference: models::GitRef = response.json()?;
        CommitSha::new(reference.object.sha).ok_or_else(|| ForgeError::MalformedResponse {
            url: response.url.clone(),
            message: "empty object sha".into(),
        })
    }

    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        from: &CommitSha,
    ) -> Result<(), ForgeError> {
        let payload = json!({
            "ref": format!("refs/heads/{branch}"),
            "sha": from.as_str(),
        });
        let response = self
            .client
            .send_once(&ApiRequest::post(self.repo_url(repo, &["git", "refs"], &[])?, payload))
            .await?;
        match response.status {
            201 => Ok(()),
            _ => Err(response.into_unexpected()),
        }
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<Option<String>, ForgeError> {
        let payload = json!({
            "title": request.title,
            "body": request.body,
            "head": request.head.as_str(),
            "base": request.base.as_str(),
        });
        let response = self
            .client
            .send_once(&ApiRequest::post(self.repo_url(repo, &["pulls"], &[])?, payload))
            .await?;
        if response.status != 201 {
            warn!(
                url = %response.url,
                status = response.status,
                body = %response.body,
                "Pull request was not created"
            );
            return Ok(None);
        }
        let created: models::PullRequest = response.json()?;
        Ok(Some(created.html_url))
    }

    async fn apply_branch_protection(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        settings: &BranchProtectionSettings,
    ) -> Result<(), ForgeError> {
        let payload = serde_json::to_value(settings).map_err(|e| {
            ForgeError::InvalidRequest(format!("unserialisable protection settings: {e}"))
        })?;
        let url = self.repo_url(repo, &["branches", branch.as_str(), "protection"], &[])?;
        let response = self.client.send(&ApiRequest::put(url, payload)).await?;
        match response.status {
            200 | 201 | 204 => Ok(()),
            _ => Err(response.into_unexpected()),
        }
    }
}

/// `contents` followed by the segments of a repository-relative file path.
fn contents_path(path: &str) -> Vec<&str> {
    ["contents"].into_iter().chain(path.split('/')).collect()
}
