use std::time::Duration;

use serde_json::json;

use super::*;
use crate::testing::ScriptedTransport;
use crate::transport::HttpMethod;

fn forge(transport: ScriptedTransport) -> GithubForge<ScriptedTransport> {
    GithubForge::with_transport(
        "https://api.example.test/",
        transport,
        RetrySettings {
            max_attempts: 3,
            delay: Duration::ZERO,
        },
    )
}

fn repo() -> RepositoryId {
    RepositoryId::new("acme/svc-a").unwrap()
}

fn main_branch() -> BranchName {
    BranchName::new("main").unwrap()
}

#[tokio::test]
async fn list_repositories_builds_paged_url_and_decodes() {
    let transport = ScriptedTransport::new().respond_json(
        200,
        json!([
            {"name": "svc-a", "created_at": "2024-05-01T10:00:00Z", "default_branch": "main"},
            {"name": "svc-b", "created_at": "2024-05-02T10:00:00Z", "default_branch": null}
        ]),
    );
    let forge = forge(transport.clone());

    let repos = forge
        .list_repositories(&OrgName::new("acme").unwrap(), 2, 100)
        .await
        .unwrap();

    assert_eq!(repos.len(), 2);
    assert_eq!(repos[0].name.as_str(), "svc-a");
    assert_eq!(repos[0].default_branch, BranchName::new("main"));
    assert_eq!(repos[1].default_branch, None);
    assert_eq!(
        transport.requests()[0].url,
        "https://api.example.test/orgs/acme/repos?per_page=100&page=2"
    );
}

#[tokio::test]
async fn list_repositories_fails_on_non_200() {
    let transport = ScriptedTransport::new().respond(403, "forbidden");

    let err = forge(transport)
        .list_repositories(&OrgName::new("acme").unwrap(), 1, 100)
        .await
        .unwrap_err();

    assert!(matches!(err, ForgeError::UnexpectedStatus { status: 403, .. }));
}

#[tokio::test]
async fn creator_is_first_create_event_actor() {
    let transport = ScriptedTransport::new().respond_json(
        200,
        json!([
            {"type": "PushEvent", "actor": {"login": "pusher"}},
            {"type": "CreateEvent", "actor": {"login": "founder"}},
            {"type": "CreateEvent", "actor": {"login": "later"}}
        ]),
    );

    let creator = forge(transport).repository_creator(&repo()).await.unwrap();

    assert_eq!(creator.as_deref(), Some("founder"));
}

#[tokio::test]
async fn last_committer_reads_latest_commit_author() {
    let transport = ScriptedTransport::new().respond_json(
        200,
        json!([{"commit": {"author": {"name": "Jo Dev"}}}]),
    );
    let forge = forge(transport.clone());

    let name = forge.last_committer(&repo()).await.unwrap();

    assert_eq!(name.as_deref(), Some("Jo Dev"));
    assert!(transport.requests()[0].url.ends_with("/commits?per_page=1"));
}

#[tokio::test]
async fn file_exists_only_on_200() {
    let transport = ScriptedTransport::new()
        .respond(200, "{}")
        .respond(404, "")
        .respond(403, "");
    let forge = forge(transport);

    assert!(forge.file_exists(&repo(), ".pre-commit-config.yaml").await.unwrap());
    assert!(!forge.file_exists(&repo(), ".pre-commit-config.yaml").await.unwrap());
    assert!(!forge.file_exists(&repo(), ".pre-commit-config.yaml").await.unwrap());
}

#[tokio::test]
async fn custom_property_matches_by_exact_name() {
    let body = json!([
        {"property_name": "repo_type", "value": "dev"},
        {"property_name": "Repo_Type", "value": "prod"},
        {"property_name": "Teams", "value": ["a", "b"]}
    ]);
    let transport = ScriptedTransport::new()
        .respond_json(200, body.clone())
        .respond_json(200, body)
        .respond_json(200, json!([]));
    let forge = forge(transport);

    assert_eq!(
        forge.custom_property(&repo(), "Repo_Type").await.unwrap().as_deref(),
        Some("prod")
    );
    assert_eq!(
        forge.custom_property(&repo(), "Teams").await.unwrap().as_deref(),
        Some("a,b")
    );
    assert_eq!(forge.custom_property(&repo(), "Repo_Type").await.unwrap(), None);
}

#[tokio::test]
async fn branch_protection_is_tri_state() {
    let transport = ScriptedTransport::new()
        .respond(200, "{}")
        .respond(404, "")
        .respond(403, "");
    let forge = forge(transport);

    assert!(forge.branch_protection_enabled(&repo(), &main_branch()).await.unwrap());
    assert!(!forge.branch_protection_enabled(&repo(), &main_branch()).await.unwrap());
    assert!(forge
        .branch_protection_enabled(&repo(), &main_branch())
        .await
        .is_err());
}

#[tokio::test]
async fn rulesets_enforced_when_active_or_evaluate() {
    let transport = ScriptedTransport::new()
        .respond_json(200, json!([{"enforcement": "disabled"}, {"enforcement": "evaluate"}]))
        .respond_json(200, json!([{"enforcement": "disabled"}]))
        .respond(404, "")
        .respond(500, "")
        .respond(500, "")
        .respond(500, "");
    let forge = forge(transport);

    assert!(forge.rulesets_enforced(&repo()).await.unwrap());
    assert!(!forge.rulesets_enforced(&repo()).await.unwrap());
    assert!(!forge.rulesets_enforced(&repo()).await.unwrap());
    assert!(matches!(
        forge.rulesets_enforced(&repo()).await,
        Err(ForgeError::RetriesExhausted { attempts: 3, .. })
    ));
}

#[tokio::test]
async fn put_file_encodes_content_and_passes_sha() {
    let transport = ScriptedTransport::new().respond(201, "{}");
    let forge = forge(transport.clone());
    let commit = FileCommit {
        path: ".pre-commit-config.yaml".into(),
        content: "repos: []\n".into(),
        message: "Add .pre-commit-config.yaml".into(),
        branch: main_branch(),
    };

    forge
        .put_file(&repo(), &commit, CommitSha::new("abc123").as_ref())
        .await
        .unwrap();

    let sent = &transport.requests()[0];
    assert_eq!(sent.method, HttpMethod::Put);
    assert_eq!(
        sent.url,
        "https://api.example.test/repos/acme/svc-a/contents/.pre-commit-config.yaml"
    );
    let body = sent.body.as_ref().unwrap();
    assert_eq!(body["content"], "cmVwb3M6IFtdCg==");
    assert_eq!(body["branch"], "main");
    assert_eq!(body["sha"], "abc123");
}

#[tokio::test]
async fn put_file_omits_sha_for_new_files_and_rejects_4xx() {
    let transport = ScriptedTransport::new().respond(422, "invalid");
    let forge = forge(transport.clone());
    let commit = FileCommit {
        path: "a.txt".into(),
        content: "x".into(),
        message: "Add a.txt".into(),
        branch: main_branch(),
    };

    let err = forge.put_file(&repo(), &commit, None).await.unwrap_err();

    assert!(matches!(err, ForgeError::UnexpectedStatus { status: 422, .. }));
    assert!(transport.requests()[0].body.as_ref().unwrap().get("sha").is_none());
}

#[tokio::test]
async fn create_branch_posts_ref_once() {
    let transport = ScriptedTransport::new().respond(500, "").respond(201, "{}");
    let forge = forge(transport.clone());

    let result = forge
        .create_branch(
            &repo(),
            &BranchName::new("add-gitleaks-config").unwrap(),
            &CommitSha::new("deadbeef").unwrap(),
        )
        .await;

    assert!(result.is_err());
    let requests = transport.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].body,
        Some(json!({"ref": "refs/heads/add-gitleaks-config", "sha": "deadbeef"}))
    );
}

#[tokio::test]
async fn open_pull_request_returns_html_url_on_201() {
    let transport = ScriptedTransport::new()
        .respond_json(201, json!({"html_url": "https://github.com/acme/svc-a/pull/7"}))
        .respond(422, "exists");
    let forge = forge(transport);
    let request = PullRequestRequest {
        title: "Add gitleaks workflow.".into(),
        body: "b".into(),
        head: BranchName::new("add-gitleaks-config").unwrap(),
        base: main_branch(),
    };

    assert_eq!(
        forge.open_pull_request(&repo(), &request).await.unwrap().as_deref(),
        Some("https://github.com/acme/svc-a/pull/7")
    );
    assert_eq!(forge.open_pull_request(&repo(), &request).await.unwrap(), None);
}

#[tokio::test]
async fn apply_branch_protection_accepts_2xx() {
    let transport = ScriptedTransport::new().respond(204, "").respond(403, "denied");
    let forge = forge(transport.clone());
    let settings = BranchProtectionSettings::standard();

    assert!(forge
        .apply_branch_protection(&repo(), &main_branch(), &settings)
        .await
        .is_ok());
    assert!(forge
        .apply_branch_protection(&repo(), &main_branch(), &settings)
        .await
        .is_err());
    assert!(transport.requests()[0]
        .url
        .ends_with("/repos/acme/svc-a/branches/main/protection"));
}

#[tokio::test]
async fn branch_head_and_resolve_branch() {
    let transport = ScriptedTransport::new()
        .respond_json(200, json!({"object": {"sha": "cafe"}}))
        .respond_json(200, json!({"name": "main"}))
        .respond(404, "");
    let forge = forge(transport);

    assert_eq!(
        forge.branch_head(&repo(), &main_branch()).await.unwrap().as_str(),
        "cafe"
    );
    assert_eq!(
        forge.resolve_branch(&repo(), &main_branch()).await.unwrap(),
        Some(main_branch())
    );
    assert_eq!(forge.resolve_branch(&repo(), &main_branch()).await.unwrap(), None);
}

fn sent_url(transport: &ScriptedTransport, index: usize) -> Url {
    Url::parse(&transport.requests()[index].url).unwrap()
}

#[tokio::test]
async fn branch_names_with_reserved_characters_survive_the_query() {
    let transport = ScriptedTransport::new();
    let forge = forge(transport.clone());

    for branch in ["deps+update", "fix#12", "a&b", "feature/x y"] {
        let branch = BranchName::new(branch).unwrap();
        forge
            .file_sha(&repo(), ".github/workflows/gitleaks_secret_scan.yml", &branch)
            .await
            .unwrap();
    }

    let refs: Vec<String> = (0..4)
        .map(|i| {
            let url = sent_url(&transport, i);
            assert_eq!(url.fragment(), None);
            assert_eq!(
                url.path(),
                "/repos/acme/svc-a/contents/.github/workflows/gitleaks_secret_scan.yml"
            );
            let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
            assert_eq!(pairs.len(), 1);
            assert_eq!(pairs[0].0, "ref");
            pairs[0].1.clone()
        })
        .collect();
    assert_eq!(refs, vec!["deps+update", "fix#12", "a&b", "feature/x y"]);
}

#[tokio::test]
async fn branch_names_with_reserved_characters_stay_one_path_segment() {
    let transport = ScriptedTransport::new()
        .respond(404, "")
        .respond(204, "");
    let forge = forge(transport.clone());
    let branch = BranchName::new("fix#12").unwrap();

    assert!(!forge
        .branch_protection_enabled(&repo(), &branch)
        .await
        .unwrap());
    forge
        .apply_branch_protection(&repo(), &branch, &BranchProtectionSettings::standard())
        .await
        .unwrap();

    for i in 0..2 {
        let url = sent_url(&transport, i);
        assert_eq!(url.fragment(), None);
        assert_eq!(url.path(), "/repos/acme/svc-a/branches/fix%2312/protection");
        let segments: Vec<&str> = url.path_segments().unwrap().collect();
        assert_eq!(segments, ["repos", "acme", "svc-a", "branches", "fix%2312", "protection"]);
    }
}

#[tokio::test]
async fn api_url_with_path_prefix_is_kept() {
    let transport = ScriptedTransport::new();
    let forge = GithubForge::with_transport(
        "https://ghe.example.test/api/v3/",
        transport.clone(),
        RetrySettings {
            max_attempts: 1,
            delay: Duration::ZERO,
        },
    );

    forge.rulesets_enforced(&repo()).await.unwrap();

    assert_eq!(
        transport.requests()[0].url,
        "https://ghe.example.test/api/v3/repos/acme/svc-a/rulesets"
    );
}

#[test]
fn unparseable_api_url_is_an_invalid_request() {
    let forge = forge_at("not a url");

    let err = forge.repo_url(&repo(), &["rulesets"], &[]).unwrap_err();

    assert!(matches!(err, ForgeError::InvalidRequest(_)));
}

fn forge_at(base_url: &str) -> GithubForge<ScriptedTransport> {
    GithubForge::with_transport(base_url, ScriptedTransport::new(), RetrySettings::default())
}
