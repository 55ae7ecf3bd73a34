use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;

use super::state::ApiState;
use crate::error::ApiError;
use crate::transport::{ApiRequest, Method, RequestOptions, Transport};

/// Turns a raw JSON body into the client's data type.
pub type Decoder<T> = Arc<dyn Fn(Value) -> Result<T, ApiError> + Send + Sync>;

struct Subscription {
    endpoint: String,
    options: RequestOptions,
    generation: u64,
    closed: bool,
}

struct Inner<T> {
    transport: Arc<dyn Transport>,
    decoder: Decoder<T>,
    subscription: Mutex<Subscription>,
    state: watch::Sender<ApiState<T>>,
}

/// Read-side client for one remote resource.
///
/// Every request is tagged with a generation. Issuing a newer request,
/// reconfiguring, or unsubscribing moves the generation on, and a response
/// that settles under an old generation is dropped on arrival, so a slow
/// stale response can never overwrite newer state. In-flight calls are not
/// aborted, only ignored.
///
/// Cloning yields another handle to the same subscription.
pub struct RemoteStateClient<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for RemoteStateClient<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> RemoteStateClient<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(
        transport: Arc<dyn Transport>,
        endpoint: impl Into<String>,
        options: RequestOptions,
        decoder: Decoder<T>,
    ) -> Self {
        let (state, _) = watch::channel(ApiState::default());
        Self {
            inner: Arc::new(Inner {
                transport,
                decoder,
                subscription: Mutex::new(Subscription {
                    endpoint: endpoint.into(),
                    options,
                    generation: 0,
                    closed: false,
                }),
                state,
            }),
        }
    }

    pub fn snapshot(&self) -> ApiState<T> {
        self.inner.state.borrow().clone()
    }

    /// Receiver that observes every wholesale replacement of the snapshot.
    pub fn watch(&self) -> watch::Receiver<ApiState<T>> {
        self.inner.state.subscribe()
    }

    pub fn endpoint(&self) -> String {
        self.lock().endpoint.clone()
    }

    pub fn generation(&self) -> u64 {
        self.lock().generation
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Issues a fresh request for the current target and waits for it.
    ///
    /// Returns `true` if this request's outcome became the visible state,
    /// `false` if it was superseded (or the client was already closed).
    pub async fn refresh(&self) -> bool {
        let Some((generation, request)) = self.begin(None) else {
            return false;
        };
        self.run(generation, request).await
    }

    /// Points the client at a new endpoint/options and fetches it.
    ///
    /// Anything still in flight for the previous target is discarded.
    pub async fn reconfigure(&self, endpoint: impl Into<String>, options: RequestOptions) -> bool {
        let Some((generation, request)) = self.begin(Some((endpoint.into(), options))) else {
            return false;
        };
        self.run(generation, request).await
    }

    /// Ends the subscription. Pending responses are discarded and the snapshot
    /// is reset; later refreshes are no-ops.
    pub fn unsubscribe(&self) {
        let mut sub = self.lock();
        if sub.closed {
            return;
        }
        sub.closed = true;
        sub.generation += 1;
        self.inner.state.send_replace(ApiState::default());
        tracing::debug!(
            target: "capsule.remote",
            stage = "remote.unsubscribe",
            endpoint = %sub.endpoint,
            generation = sub.generation
        );
    }

    /// Replaces the current data with a locally derived value.
    ///
    /// `merge` sees the current data and returns the replacement, or `None` to
    /// leave the snapshot alone. The generation is untouched, so a request
    /// already in flight still lands afterwards.
    pub fn replace_data<F>(&self, merge: F) -> bool
    where
        F: FnOnce(&T) -> Option<T>,
    {
        let sub = self.lock();
        if sub.closed {
            return false;
        }
        self.inner.state.send_if_modified(|state| {
            let Some(next) = state.data.as_ref().and_then(merge) else {
                return false;
            };
            *state = ApiState {
                data: Some(next),
                loading: state.loading,
                error: None,
                updated_at: Some(Utc::now()),
            };
            true
        })
    }

    fn begin(&self, target: Option<(String, RequestOptions)>) -> Option<(u64, ApiRequest)> {
        let mut sub = self.lock();
        if sub.closed {
            return None;
        }
        if let Some((endpoint, options)) = target {
            sub.endpoint = endpoint;
            sub.options = options;
        }
        sub.generation += 1;
        let request = ApiRequest::build(&sub.endpoint, &sub.options, Method::Get);
        self.inner.state.send_modify(|state| {
            state.loading = true;
            state.error = None;
        });
        tracing::debug!(
            target: "capsule.remote",
            stage = "remote.request.in",
            endpoint = %sub.endpoint,
            generation = sub.generation
        );
        Some((sub.generation, request))
    }

    async fn run(&self, generation: u64, request: ApiRequest) -> bool {
        let result = self
            .inner
            .transport
            .execute(request)
            .await
            .and_then(|body| (self.inner.decoder)(body));
        self.settle(generation, result)
    }

    fn settle(&self, generation: u64, result: Result<T, ApiError>) -> bool {
        let sub = self.lock();
        if sub.closed || sub.generation != generation {
            tracing::debug!(
                target: "capsule.remote",
                stage = "remote.request.stale",
                endpoint = %sub.endpoint,
                generation,
                current = sub.generation,
                ok = result.is_ok()
            );
            return false;
        }
        if let Err(err) = &result {
            tracing::warn!(
                target: "capsule.remote",
                stage = "remote.request.failed",
                endpoint = %sub.endpoint,
                error = %err
            );
        } else {
            tracing::debug!(
                target: "capsule.remote",
                stage = "remote.request.out",
                endpoint = %sub.endpoint,
                generation
            );
        }
        self.inner
            .state
            .send_replace(ApiState::settled(result, Utc::now()));
        true
    }

    fn lock(&self) -> MutexGuard<'_, Subscription> {
        self.inner
            .subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
