//! The [`Forge`] port: every call the workflows make against the Git forge.
//!
//! Implementations handle transport, authentication, retries and response
//! decoding. They report *facts* (`Ok(false)` for a confirmed 404) and leave
//! fallback decisions (`Unknown`, `false`, `status = error`) to the caller.

use async_trait::async_trait;

use crate::{
    BranchName, BranchProtectionSettings, CommitSha, ForgeError, OrgName, RepositoryId,
    RepositoryName,
};

/// One entry of an organization's repository listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositorySummary {
    /// Short repository name.
    pub name: RepositoryName,
    /// Creation time exactly as returned by the forge.
    pub created_at: String,
    /// Default branch named in the listing, if any.
    pub default_branch: Option<BranchName>,
}

/// A create-or-update of a single file on a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCommit {
    pub path: String,
    /// Plain-text file body; implementations handle any wire encoding.
    pub content: String,
    pub message: String,
    pub branch: BranchName,
}

/// Parameters of a new pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRequest {
    pub title: String,
    pub body: String,
    pub head: BranchName,
    pub base: BranchName,
}

/// Read and write operations against a Git forge.
#[async_trait]
pub trait Forge: Send + Sync {
    /// One page (1-based) of the organization's repositories. An empty page
    /// marks the end of the listing.
    async fn list_repositories(
        &self,
        org: &OrgName,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, ForgeError>;

    /// Login of the actor behind the repository's creation event, if one is
    /// still in the event history.
    async fn repository_creator(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError>;

    /// Author name of the most recent commit on the default branch.
    async fn last_committer(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError>;

    /// Whether `path` exists on the default branch.
    async fn file_exists(&self, repo: &RepositoryId, path: &str) -> Result<bool, ForgeError>;

    /// Value of the custom property `name`; `None` if the property is not set.
    async fn custom_property(
        &self,
        repo: &RepositoryId,
        name: &str,
    ) -> Result<Option<String>, ForgeError>;

    /// `Ok(true)` when `branch` is protected, `Ok(false)` on a 404.
    async fn branch_protection_enabled(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<bool, ForgeError>;

    /// `Ok(true)` when any rule-set is `active` or `evaluate`, `Ok(false)`
    /// when none is or on a 404.
    async fn rulesets_enforced(&self, repo: &RepositoryId) -> Result<bool, ForgeError>;

    /// Canonical name of `branch` if it exists.
    async fn resolve_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<Option<BranchName>, ForgeError>;

    /// Blob SHA of `path` on `branch`, if the file exists.
    async fn file_sha(
        &self,
        repo: &RepositoryId,
        path: &str,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, ForgeError>;

    /// Creates (`sha = None`) or overwrites (`sha = Some`) a file.
    async fn put_file(
        &self,
        repo: &RepositoryId,
        commit: &FileCommit,
        sha: Option<&CommitSha>,
    ) -> Result<(), ForgeError>;

    /// Commit SHA at the tip of `branch`.
    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, ForgeError>;

    /// Creates `branch` pointing at `from`.
    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        from: &CommitSha,
    ) -> Result<(), ForgeError>;

    /// Opens a pull request and returns its URL, or `None` if the forge
    /// answered without creating one.
    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<Option<String>, ForgeError>;

    /// Replaces the protection rules of `branch` with `settings`.
    async fn apply_branch_protection(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        settings: &BranchProtectionSettings,
    ) -> Result<(), ForgeError>;
}
