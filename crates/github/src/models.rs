// Wire shapes of the GitHub responses this adapter reads. Only the fields the
// workflows need are declared; serde ignores the rest.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct RepositoryListing {
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub default_branch: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Actor {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Event {
    #[serde(rename = "type")]
    pub kind: String,
    pub actor: Option<Actor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitAuthor {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitDetail {
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CommitListing {
    pub commit: CommitDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PropertyValue {
    pub property_name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

impl PropertyValue {
    /// String properties verbatim, multi-select joined with `,`, null as empty.
    pub fn value_text(&self) -> String {
        match &self.value {
            serde_json::Value::Null => String::new(),
            serde_json::Value::String(s) => s.clone(),
            serde_json::Value::Array(items) => items
                .iter()
                .map(|item| match item {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(","),
            other => other.to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Ruleset {
    #[serde(default)]
    pub enforcement: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Branch {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ContentEntry {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitObject {
    pub sha: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct GitRef {
    pub object: GitObject,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PullRequest {
    pub html_url: String,
}
