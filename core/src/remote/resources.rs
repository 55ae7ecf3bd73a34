use std::sync::Arc;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::client::{Decoder, RemoteStateClient};
use crate::api::{CAPSULES_ENDPOINT, CHAIN_ENDPOINT};
use crate::error::ApiError;
use crate::model::{Capsule, Ledger};
use crate::transport::{RequestOptions, Transport};
use crate::wire::{normalize_capsules, WireCapsule, WireLedger};

/// Deserializes a JSON body, attributing failures to `endpoint`.
pub fn decode_json<W: DeserializeOwned>(endpoint: &str, body: Value) -> Result<W, ApiError> {
    serde_json::from_value(body).map_err(|err| ApiError::decode(endpoint, err.to_string()))
}

/// `GET /api/capsules`, normalized to canonical capsules.
pub fn capsules_resource(transport: Arc<dyn Transport>) -> RemoteStateClient<Vec<Capsule>> {
    let decoder: Decoder<Vec<Capsule>> = Arc::new(|body: Value| {
        let wire: Vec<WireCapsule> = decode_json(CAPSULES_ENDPOINT, body)?;
        normalize_capsules(wire, Utc::now())
            .map_err(|err| ApiError::decode(CAPSULES_ENDPOINT, err.to_string()))
    });
    RemoteStateClient::new(transport, CAPSULES_ENDPOINT, RequestOptions::default(), decoder)
}

/// `GET /chain`, normalized to a canonical ledger.
pub fn ledger_resource(transport: Arc<dyn Transport>) -> RemoteStateClient<Ledger> {
    let decoder: Decoder<Ledger> = Arc::new(|body: Value| {
        let wire: WireLedger = decode_json(CHAIN_ENDPOINT, body)?;
        wire.into_canonical(Utc::now())
            .map_err(|err| ApiError::decode(CHAIN_ENDPOINT, err.to_string()))
    });
    RemoteStateClient::new(transport, CHAIN_ENDPOINT, RequestOptions::default(), decoder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ScriptedTransport;
    use crate::transport::Method;
    use serde_json::json;

    #[tokio::test]
    async fn test_capsules_resource_accepts_mixed_dialects() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(
            Method::Get,
            CAPSULES_ENDPOINT,
            Ok(json!([
                {"id": "1", "name": "ada", "message": "m1", "unlockDate": "2020-01-01T00:00:00Z",
                 "isPublic": true, "isUnlocked": true, "createdAt": "2019-01-01T00:00:00Z"},
                {"sender_name": "bob", "message": "m2", "is_public": true,
                 "lock_until": 4102444800i64, "created_at": 1577836800}
            ])),
        );
        let client = capsules_resource(transport.clone());
        client.refresh().await;

        let capsules = client.snapshot().data.unwrap();
        assert_eq!(capsules.len(), 2);
        assert_eq!(capsules[0].id, "1");
        assert!(capsules[0].unlocked);
        assert_eq!(capsules[1].sender, "bob");
        assert!(!capsules[1].unlocked);
        assert_eq!(transport.calls()[0].method, Method::Get);
    }

    #[tokio::test]
    async fn test_ledger_resource_reports_shape_errors_as_decode() {
        let transport = Arc::new(ScriptedTransport::default());
        transport.reply(Method::Get, CHAIN_ENDPOINT, Ok(json!({"blocks": []})));
        let client = ledger_resource(transport);
        client.refresh().await;

        let snap = client.snapshot();
        assert!(snap.data.is_none());
        match snap.error {
            Some(ApiError::Decode { url, .. }) => assert_eq!(url, CHAIN_ENDPOINT),
            other => panic!("expected decode error, got {other:?}"),
        }
    }
}
