//! One-shot write calls against the remote service.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;

use crate::api::{CAPSULES_ENDPOINT, MINE_ENDPOINT};
use crate::draft::{CapsuleDraft, ValidatedDraft};
use crate::error::{ApiError, ClientError};
use crate::model::{Capsule, MiningResult};
use crate::remote::decode_json;
use crate::transport::{ApiRequest, Method, RequestOptions, Transport};
use crate::wire::{WireCapsule, WireMiningResult};

/// Issues commands. Each call is independent: no retry, no caching, and the
/// outcome is returned straight to the caller.
#[derive(Clone)]
pub struct CommandClient {
    transport: Arc<dyn Transport>,
}

impl CommandClient {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    pub fn transport_name(&self) -> &str {
        self.transport.name()
    }

    /// Sends one request (POST unless `options` says otherwise) and decodes the
    /// JSON response as `R`.
    pub async fn execute<R: DeserializeOwned>(
        &self,
        endpoint: &str,
        options: RequestOptions,
    ) -> Result<R, ApiError> {
        let request = ApiRequest::build(endpoint, &options, Method::Post);
        tracing::debug!(
            target: "capsule.command",
            stage = "command.in",
            method = %request.method,
            endpoint = %endpoint
        );
        let body = self.transport.execute(request).await.map_err(|err| {
            tracing::warn!(
                target: "capsule.command",
                stage = "command.failed",
                endpoint = %endpoint,
                error = %err
            );
            err
        })?;
        tracing::debug!(target: "capsule.command", stage = "command.out", endpoint = %endpoint);
        decode_json(endpoint, body)
    }

    /// `POST /api/capsules` with an already validated draft.
    pub async fn create_capsule(&self, draft: &ValidatedDraft) -> Result<Capsule, ApiError> {
        let options = RequestOptions::default().body(draft.payload());
        let wire: WireCapsule = self.execute(CAPSULES_ENDPOINT, options).await?;
        wire.into_canonical(0, Utc::now())
            .map_err(|err| ApiError::decode(CAPSULES_ENDPOINT, err.to_string()))
    }

    /// Validates `draft` against `now` and submits it. Invalid drafts never
    /// reach the transport.
    pub async fn submit_capsule(
        &self,
        draft: &CapsuleDraft,
        now: DateTime<Utc>,
    ) -> Result<Capsule, ClientError> {
        let valid = draft.validate(now)?;
        Ok(self.create_capsule(&valid).await?)
    }

    /// `POST /api/mine`.
    pub async fn mine(&self) -> Result<MiningResult, ApiError> {
        let wire: WireMiningResult = self.execute(MINE_ENDPOINT, RequestOptions::default()).await?;
        wire.into_canonical(Utc::now())
            .map_err(|err| ApiError::decode(MINE_ENDPOINT, err.to_string()))
    }
}
