//! In-memory [`Forge`] used by the workflow tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use policy::{
    BranchName, BranchProtectionSettings, CommitSha, FileCommit, Forge, ForgeError, OrgName,
    PullRequestRequest, RepositoryId, RepositorySummary,
};

pub fn transport_error(url: &str) -> ForgeError {
    ForgeError::Transport {
        url: url.to_string(),
        message: "connection reset".to_string(),
    }
}

pub fn status_error(url: &str, status: u16) -> ForgeError {
    ForgeError::UnexpectedStatus {
        url: url.to_string(),
        status,
        body: String::new(),
    }
}

/// Server-side state of one repository.
#[derive(Debug, Clone)]
pub struct FakeRepo {
    pub default_branch: String,
    pub creator: Result<Option<String>, ForgeError>,
    pub last_committer: Result<Option<String>, ForgeError>,
    /// `(branch, path) -> blob sha`
    pub files: HashMap<(String, String), String>,
    pub file_probe_error: Option<ForgeError>,
    pub repo_type: Result<Option<String>, ForgeError>,
    pub protection: Result<bool, ForgeError>,
    pub rulesets: Result<bool, ForgeError>,
    /// `branch -> head sha`
    pub branches: HashMap<String, String>,
    pub resolve_error: Option<ForgeError>,
    pub branch_head_error: Option<ForgeError>,
    pub failing_puts: HashSet<String>,
    pub pull_request: Result<Option<String>, ForgeError>,
    pub apply_protection: Result<(), ForgeError>,
}

impl FakeRepo {
    pub fn new() -> Self {
        let mut branches = HashMap::new();
        branches.insert("main".to_string(), "head-main".to_string());
        Self {
            default_branch: "main".to_string(),
            creator: Ok(Some("octocat".to_string())),
            last_committer: Ok(Some("Mona Lisa".to_string())),
            files: HashMap::new(),
            file_probe_error: None,
            repo_type: Ok(Some("prod".to_string())),
            protection: Ok(false),
            rulesets: Ok(false),
            branches,
            resolve_error: None,
            branch_head_error: None,
            failing_puts: HashSet::new(),
            pull_request: Ok(Some("https://github.test/pr/1".to_string())),
            apply_protection: Ok(()),
        }
    }

    pub fn with_file(mut self, branch: &str, path: &str) -> Self {
        self.files
            .insert((branch.to_string(), path.to_string()), format!("blob-{path}"));
        self
    }

    pub fn with_branch(mut self, branch: &str) -> Self {
        self.branches
            .insert(branch.to_string(), format!("head-{branch}"));
        self
    }
}

#[derive(Default)]
struct State {
    pages: Vec<Result<Vec<RepositorySummary>, ForgeError>>,
    repos: HashMap<String, FakeRepo>,
    calls: Vec<String>,
    pull_requests: Vec<PullRequestRequest>,
    next_blob: u32,
}

/// A scripted forge. Repositories are keyed by `"org/name"`.
#[derive(Default)]
pub struct FakeForge {
    state: Mutex<State>,
}

impl FakeForge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a listing page. Pages past the last one are empty.
    pub fn page(self, page: Result<Vec<RepositorySummary>, ForgeError>) -> Self {
        self.state.lock().unwrap().pages.push(page);
        self
    }

    pub fn repo(self, full_name: &str, repo: FakeRepo) -> Self {
        self.state
            .lock()
            .unwrap()
            .repos
            .insert(full_name.to_string(), repo);
        self
    }

    /// Every mutating call and listing request, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn pull_requests(&self) -> Vec<PullRequestRequest> {
        self.state.lock().unwrap().pull_requests.clone()
    }

    pub fn has_file(&self, full_name: &str, branch: &str, path: &str) -> bool {
        self.state
            .lock()
            .unwrap()
            .repos
            .get(full_name)
            .map(|r| r.files.contains_key(&(branch.to_string(), path.to_string())))
            .unwrap_or(false)
    }

    fn with_repo<T>(
        &self,
        repo: &RepositoryId,
        f: impl FnOnce(&mut FakeRepo) -> Result<T, ForgeError>,
    ) -> Result<T, ForgeError> {
        let mut state = self.state.lock().unwrap();
        match state.repos.get_mut(repo.as_str()) {
            Some(entry) => f(entry),
            None => Err(status_error(repo.as_str(), 404)),
        }
    }

    fn log(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }
}

#[async_trait]
impl Forge for FakeForge {
    async fn list_repositories(
        &self,
        org: &OrgName,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<RepositorySummary>, ForgeError> {
        self.log(format!("list {org} page={page} per_page={per_page}"));
        let state = self.state.lock().unwrap();
        match (page as usize).checked_sub(1).and_then(|i| state.pages.get(i)) {
            Some(result) => result.clone(),
            None => Ok(Vec::new()),
        }
    }

    async fn repository_creator(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError> {
        self.with_repo(repo, |r| r.creator.clone())
    }

    async fn last_committer(&self, repo: &RepositoryId) -> Result<Option<String>, ForgeError> {
        self.with_repo(repo, |r| r.last_committer.clone())
    }

    async fn file_exists(&self, repo: &RepositoryId, path: &str) -> Result<bool, ForgeError> {
        self.with_repo(repo, |r| match &r.file_probe_error {
            Some(err) => Err(err.clone()),
            None => Ok(r
                .files
                .contains_key(&(r.default_branch.clone(), path.to_string()))),
        })
    }

    async fn custom_property(
        &self,
        repo: &RepositoryId,
        _name: &str,
    ) -> Result<Option<String>, ForgeError> {
        self.with_repo(repo, |r| r.repo_type.clone())
    }

    async fn branch_protection_enabled(
        &self,
        repo: &RepositoryId,
        _branch: &BranchName,
    ) -> Result<bool, ForgeError> {
        self.with_repo(repo, |r| r.protection.clone())
    }

    async fn rulesets_enforced(&self, repo: &RepositoryId) -> Result<bool, ForgeError> {
        self.with_repo(repo, |r| r.rulesets.clone())
    }

    async fn resolve_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<Option<BranchName>, ForgeError> {
        self.with_repo(repo, |r| match &r.resolve_error {
            Some(err) => Err(err.clone()),
            None => Ok(r
                .branches
                .contains_key(branch.as_str())
                .then(|| branch.clone())),
        })
    }

    async fn file_sha(
        &self,
        repo: &RepositoryId,
        path: &str,
        branch: &BranchName,
    ) -> Result<Option<CommitSha>, ForgeError> {
        self.with_repo(repo, |r| {
            Ok(r.files
                .get(&(branch.to_string(), path.to_string()))
                .and_then(|sha| CommitSha::new(sha.clone())))
        })
    }

    async fn put_file(
        &self,
        repo: &RepositoryId,
        commit: &FileCommit,
        sha: Option<&CommitSha>,
    ) -> Result<(), ForgeError> {
        self.log(format!(
            "put {repo} {} {} sha={}",
            commit.branch,
            commit.path,
            sha.map(CommitSha::to_string).unwrap_or_else(|| "none".to_string())
        ));
        let blob = {
            let mut state = self.state.lock().unwrap();
            state.next_blob += 1;
            format!("blob-{}", state.next_blob)
        };
        self.with_repo(repo, |r| {
            if r.failing_puts.contains(&commit.path) {
                return Err(status_error(&commit.path, 422));
            }
            r.files
                .insert((commit.branch.to_string(), commit.path.clone()), blob);
            Ok(())
        })
    }

    async fn branch_head(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
    ) -> Result<CommitSha, ForgeError> {
        self.with_repo(repo, |r| {
            if let Some(err) = &r.branch_head_error {
                return Err(err.clone());
            }
            r.branches
                .get(branch.as_str())
                .and_then(|sha| CommitSha::new(sha.clone()))
                .ok_or_else(|| status_error(branch.as_str(), 404))
        })
    }

    async fn create_branch(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        from: &CommitSha,
    ) -> Result<(), ForgeError> {
        self.log(format!("create_branch {repo} {branch} from={from}"));
        self.with_repo(repo, |r| {
            r.branches.insert(branch.to_string(), from.to_string());
            Ok(())
        })
    }

    async fn open_pull_request(
        &self,
        repo: &RepositoryId,
        request: &PullRequestRequest,
    ) -> Result<Option<String>, ForgeError> {
        self.log(format!(
            "open_pull_request {repo} {}->{}",
            request.head, request.base
        ));
        self.state
            .lock()
            .unwrap()
            .pull_requests
            .push(request.clone());
        self.with_repo(repo, |r| r.pull_request.clone())
    }

    async fn apply_branch_protection(
        &self,
        repo: &RepositoryId,
        branch: &BranchName,
        _settings: &BranchProtectionSettings,
    ) -> Result<(), ForgeError> {
        self.log(format!("protect {repo} {branch}"));
        self.with_repo(repo, |r| r.apply_protection.clone())
    }
}
