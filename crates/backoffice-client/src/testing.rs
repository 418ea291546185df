//! Scripted [`HttpBoundary`] for unit tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::boundary::{BoundaryFailure, BoundaryRequest, BoundaryResult, HttpBoundary};

/// One scripted answer for a path.
pub(crate) enum Reply {
    Ready(BoundaryResult<Value>),
    /// Resolves when the test sends on the paired sender.
    Deferred(oneshot::Receiver<BoundaryResult<Value>>),
}

impl Reply {
    pub(crate) fn ok(body: Value) -> Self {
        Reply::Ready(Ok(body))
    }

    pub(crate) fn api(status: u16, body: Value) -> Self {
        Reply::Ready(Err(BoundaryFailure::api(status, Some(body))))
    }

    pub(crate) fn network(message: &str) -> Self {
        Reply::Ready(Err(BoundaryFailure::network(message)))
    }

    pub(crate) fn deferred() -> (Self, oneshot::Sender<BoundaryResult<Value>>) {
        let (tx, rx) = oneshot::channel();
        (Reply::Deferred(rx), tx)
    }
}

#[derive(Default)]
pub(crate) struct FakeBoundary {
    replies: Mutex<HashMap<String, VecDeque<Reply>>>,
    requests: Mutex<Vec<BoundaryRequest>>,
    token: Mutex<Option<String>>,
}

impl FakeBoundary {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Queues a reply for `path`; replies for the same path are used in order.
    pub(crate) fn reply(&self, path: &str, reply: Reply) {
        self.replies
            .lock()
            .unwrap()
            .entry(path.to_string())
            .or_default()
            .push_back(reply);
    }

    pub(crate) fn requests(&self) -> Vec<BoundaryRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub(crate) fn requests_to(&self, method: Method, path: &str) -> Vec<BoundaryRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method && r.path == path)
            .collect()
    }

    pub(crate) fn token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpBoundary for FakeBoundary {
    async fn send(&self, request: BoundaryRequest) -> BoundaryResult<Value> {
        self.requests.lock().unwrap().push(request.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&request.path)
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Ready(result)) => result,
            Some(Reply::Deferred(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(BoundaryFailure::network("reply dropped"))),
            None => Err(BoundaryFailure::api(404, None)),
        }
    }

    fn set_auth_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}
