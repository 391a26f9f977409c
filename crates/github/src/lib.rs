//! GitHub infrastructure adapter.
//!
//! Implements the [`policy::Forge`] trait against the GitHub REST API.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** This crate must not contain domain rules.
//! Authentication, URL construction, retries, status-code interpretation and
//! JSON decoding are handled here; the [`policy`] crate never sees them.
//!
//! ## Layers inside the crate
//!
//! | Module | Responsibility |
//! |--------|----------------|
//! | [`transport`] | One HTTP exchange ([`HttpTransport`], backed by `reqwest`) |
//! | [`retry`] | Bounded fixed-delay retry on transient failures ([`RetryingClient`]) |
//! | [`client`] | Endpoint mapping and status semantics ([`GithubForge`]) |

pub mod client;
pub mod retry;
pub mod transport;

mod models;

#[cfg(test)]
mod testing;

pub use client::{GithubForge, DEFAULT_API_URL};
pub use retry::{RetryingClient, RetrySettings};
pub use transport::{ApiRequest, ApiResponse, HttpMethod, HttpTransport, ReqwestTransport};
