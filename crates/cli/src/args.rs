//! Command-line arguments shared by the three binaries.

use std::ffi::OsString;
use std::path::PathBuf;

use anyhow::{anyhow, Context};
use clap::{Args, Parser, ValueEnum};

use github::{GithubForge, DEFAULT_API_URL};
use policy::{AccessToken, OrgName};

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;

/// Report file shared by the collector and the remediator.
pub const DEFAULT_REPORT: &str = "repos_last_30_days.csv";

/// Report file written by the enforcer.
pub const DEFAULT_PROTECTION_REPORT: &str = "branch_protection_results.csv";

/// Single-dash spellings of `--pat` and `--org` accepted by older job definitions.
const LEGACY_FLAGS: [(&str, &str); 2] = [("-pat", "--pat"), ("-org", "--org")];

/// Rewrites `-pat` and `-org` (also in `-pat=VALUE` form) to their double-dash
/// equivalents so clap can parse them. Everything else passes through untouched.
pub fn normalize_legacy_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let Some(text) = arg.to_str() else {
                return arg;
            };
            for (legacy, modern) in LEGACY_FLAGS {
                if text == legacy {
                    return OsString::from(modern);
                }
                if let Some(value) = text.strip_prefix(legacy).and_then(|r| r.strip_prefix('=')) {
                    return OsString::from(format!("{modern}={value}"));
                }
            }
            arg
        })
        .collect()
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Connection and logging options accepted by every binary.
///
/// Not `Debug`: holds the raw access token.
#[derive(Args, Clone)]
pub struct CommonArgs {
    /// GitHub access token
    #[arg(
        long = "github-token",
        visible_alias = "pat",
        alias = "github_token",
        env = "GITHUB_TOKEN",
        hide_env_values = true,
        value_name = "TOKEN"
    )]
    pub github_token: String,

    /// Organization to operate on
    #[arg(long = "org-name", visible_alias = "org", alias = "org_name", value_name = "ORG")]
    pub org_name: String,

    /// Base URL of the GitHub REST API
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl CommonArgs {
    pub fn token(&self) -> anyhow::Result<AccessToken> {
        AccessToken::new(self.github_token.as_str())
            .ok_or_else(|| anyhow!("GitHub token must not be empty"))
    }

    pub fn org(&self) -> anyhow::Result<OrgName> {
        OrgName::new(self.org_name.trim())
            .ok_or_else(|| anyhow!("Organization name must not be empty"))
    }

    /// Builds the GitHub client for these options.
    pub fn forge(&self) -> anyhow::Result<GithubForge> {
        let token = self.token()?;
        GithubForge::new(&self.api_url, &token)
            .with_context(|| format!("Failed to create GitHub client for {}", self.api_url))
    }
}

/// Lists the organization's recently created repositories and their compliance state.
#[derive(Parser, Clone)]
#[command(name = "fetch-metadata", version)]
pub struct FetchMetadataArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report file to create
    #[arg(long, default_value = DEFAULT_REPORT, value_name = "FILE")]
    pub output: PathBuf,

    /// Length of the creation window, in days before today
    #[arg(long, default_value_t = 30, value_name = "DAYS")]
    pub days: u32,
}

/// Commits missing Gitleaks configuration to production repositories.
#[derive(Parser, Clone)]
#[command(name = "add-configs", version)]
pub struct AddConfigsArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report produced by fetch-metadata
    #[arg(long, default_value = DEFAULT_REPORT, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the annotated report
    #[arg(long, default_value = DEFAULT_REPORT, value_name = "FILE")]
    pub output: PathBuf,
}

/// Applies the standard branch protection to unprotected production repositories.
#[derive(Parser, Clone)]
#[command(name = "apply-branch-protection", version)]
pub struct ApplyBranchProtectionArgs {
    #[command(flatten)]
    pub common: CommonArgs,

    /// Report produced by fetch-metadata
    #[arg(long, default_value = DEFAULT_REPORT, value_name = "FILE")]
    pub input: PathBuf,

    /// Where to write the results report
    #[arg(long, default_value = DEFAULT_PROTECTION_REPORT, value_name = "FILE")]
    pub output: PathBuf,
}
