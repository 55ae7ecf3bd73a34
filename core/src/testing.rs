//! Scripted in-memory transport for exercising clients without a network.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::oneshot;

use crate::error::{ApiError, TransportErrorKind};
use crate::transport::{ApiRequest, Method, Transport};

type Reply = Result<Value, ApiError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

/// Replies are queued per `(method, endpoint)` and consumed in order. Gated
/// replies stay in flight until the test releases them.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<HashMap<(Method, String), VecDeque<Scripted>>>,
    calls: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn reply(&self, method: Method, endpoint: &str, reply: Reply) {
        self.queue(method, endpoint, Scripted::Ready(reply));
    }

    pub(crate) fn reply_gated(&self, method: Method, endpoint: &str) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.queue(method, endpoint, Scripted::Gated(rx));
        tx
    }

    fn queue(&self, method: Method, endpoint: &str, scripted: Scripted) {
        self.replies
            .lock()
            .unwrap()
            .entry((method, endpoint.to_string()))
            .or_default()
            .push_back(scripted);
    }

    pub(crate) fn calls(&self) -> Vec<ApiRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn count(&self, method: Method, endpoint: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|req| req.method == method && req.endpoint == endpoint)
            .count()
    }

    /// Yields until at least `n` requests have been dispatched.
    pub(crate) async fn wait_for_calls(&self, n: usize) {
        while self.calls.lock().unwrap().len() < n {
            tokio::task::yield_now().await;
        }
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let key = (request.method, request.endpoint.clone());
        self.calls.lock().unwrap().push(request);
        let next = self
            .replies
            .lock()
            .unwrap()
            .get_mut(&key)
            .and_then(VecDeque::pop_front);
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx.await.unwrap_or_else(|_| {
                Err(ApiError::transport(
                    TransportErrorKind::Unknown,
                    key.1,
                    "gate dropped",
                ))
            }),
            None => Err(ApiError::transport(
                TransportErrorKind::Connect,
                key.1,
                "no scripted reply",
            )),
        }
    }
}
