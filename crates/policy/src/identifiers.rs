//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a primitive. This prevents accidentally interchanging, for example,
//! a [`RepositoryName`] with a [`BranchName`] even though both are strings
//! under the hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[cfg(test)]
#[path = "identifiers_tests.rs"]
mod tests;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (GitHub / Git names)
// ---------------------------------------------------------------------------

string_id! {
    /// A GitHub organization login (e.g. `"acme"`).
    OrgName
}

string_id! {
    /// A repository name, unique within its organization (e.g. `"svc-a"`).
    ///
    /// This is the identity of a row in the interchange report and never
    /// changes between pipeline stages.
    RepositoryName
}

string_id! {
    /// A Git branch name (e.g. `"main"`, `"add-gitleaks-config"`).
    BranchName
}

string_id! {
    /// A Git object SHA (commit or blob, 40-character lowercase hex string).
    CommitSha
}

string_id! {
    /// Identifies a GitHub repository in `"owner/repo"` format.
    RepositoryId
}

impl BranchName {
    /// The side branch that carries remediation commits
    /// ([`crate::REMEDIATION_BRANCH`]).
    pub fn remediation() -> Self {
        Self(crate::REMEDIATION_BRANCH.to_string())
    }
}

impl RepositoryId {
    /// Builds the `"owner/repo"` identifier for `name` inside `org`.
    pub fn from_parts(org: &OrgName, name: &RepositoryName) -> Self {
        Self(format!("{}/{}", org.as_str(), name.as_str()))
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// A GitHub access token.
///
/// `Debug` and `Display` never print the secret, so the token can travel
/// through structured log fields and error contexts safely.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    /// Wraps a token, returning `None` if it is empty or only whitespace.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let v = value.into();
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Exposes the raw secret. Only the HTTP transport should call this.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

impl std::fmt::Display for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("***")
    }
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single invocation of one of the workflows.
///
/// Generated fresh for every CLI invocation and attached to the root tracing
/// span so all activity from a single run can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
