//! Scripted in-memory transport for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use policy::ForgeError;

use crate::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Replays queued outcomes in order and records every request it receives.
///
/// When the queue runs dry every further request gets a 404.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedTransport {
    outcomes: Arc<Mutex<VecDeque<Result<(u16, String), ForgeError>>>>,
    requests: Arc<Mutex<Vec<ApiRequest>>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn respond(self, status: u16, body: impl Into<String>) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Ok((status, body.into())));
        self
    }

    pub(crate) fn respond_json(self, status: u16, body: serde_json::Value) -> Self {
        self.respond(status, body.to_string())
    }

    pub(crate) fn fail(self, message: &str) -> Self {
        self.outcomes
            .lock()
            .unwrap()
            .push_back(Err(ForgeError::Transport {
                url: String::new(),
                message: message.to_string(),
            }));
        self
    }

    pub(crate) fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn execute(&self, request: &ApiRequest) -> Result<ApiResponse, ForgeError> {
        self.requests.lock().unwrap().push(request.clone());
        let next = self.outcomes.lock().unwrap().pop_front();
        match next {
            Some(Ok((status, body))) => Ok(ApiResponse {
                url: request.url.clone(),
                status,
                body,
            }),
            Some(Err(ForgeError::Transport { message, .. })) => Err(ForgeError::Transport {
                url: request.url.clone(),
                message,
            }),
            Some(Err(other)) => Err(other),
            None => Ok(ApiResponse {
                url: request.url.clone(),
                status: 404,
                body: r#"{"message":"Not Found"}"#.to_string(),
            }),
        }
    }
}
