use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;

use capsule_core::config::ApiConfig;
use capsule_core::error::api::preview_body;
use capsule_core::error::{ApiError, TransportErrorKind};
use capsule_core::transport::{ApiRequest, Method, Transport};

fn classify(err: &reqwest::Error) -> TransportErrorKind {
    if err.is_timeout() {
        TransportErrorKind::Timeout
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if err.is_request() || err.is_builder() {
        TransportErrorKind::Request
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Unknown
    }
}

fn transport_error(err: reqwest::Error, url: &str) -> ApiError {
    ApiError::transport(classify(&err), url, err.to_string())
}

fn header_map<'a, I>(headers: I, url: &str) -> Result<HeaderMap, ApiError>
where
    I: IntoIterator<Item = (&'a String, &'a String)>,
{
    let mut map = HeaderMap::new();
    for (name, value) in headers {
        let name = HeaderName::from_bytes(name.as_bytes()).map_err(|e| {
            ApiError::transport(TransportErrorKind::Request, url, format!("header {name:?}: {e}"))
        })?;
        let value = HeaderValue::from_str(value).map_err(|e| {
            ApiError::transport(TransportErrorKind::Request, url, format!("header {name:?}: {e}"))
        })?;
        map.insert(name, value);
    }
    Ok(map)
}

async fn parse_json_response(resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    let url = resp.url().to_string();
    let body = resp.text().await.map_err(|err| transport_error(err, &url))?;

    if !status.is_success() {
        return Err(ApiError::response(status.as_u16(), url, &body));
    }

    if body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str::<Value>(&body).map_err(|err| {
        ApiError::decode(url, format!("{} | body={}", err, preview_body(&body)))
    })
}

/// [`Transport`] over HTTP(S) with reqwest.
#[derive(Clone)]
pub struct HttpTransport {
    http: reqwest::Client,
    config: ApiConfig,
}

impl HttpTransport {
    pub fn new(config: &ApiConfig) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(ms) = config.timeout_ms {
            builder = builder.timeout(Duration::from_millis(ms));
        }
        let http = builder.build()?;
        Ok(Self {
            http,
            config: config.clone(),
        })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    fn name(&self) -> &str {
        "http"
    }

    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError> {
        let url = self.config.url_for(&request.endpoint);
        tracing::debug!(
            target: "capsule.http",
            stage = "http.request.in",
            method = %request.method,
            url = %url,
            has_body = request.body.is_some()
        );

        // Per-request headers win over configured defaults.
        let mut headers = header_map(&self.config.headers, &url)?;
        headers.extend(header_map(&request.headers, &url)?);

        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
        };
        let mut req = self.http.request(method, &url).headers(headers);
        if let Some(body) = &request.body {
            let bytes = serde_json::to_vec(body).map_err(|e| {
                ApiError::transport(TransportErrorKind::Request, url.as_str(), e.to_string())
            })?;
            req = req.body(bytes);
        }

        let resp = req.send().await.map_err(|err| transport_error(err, &url))?;
        let status = resp.status();
        let value = parse_json_response(resp).await;
        tracing::debug!(
            target: "capsule.http",
            stage = "http.request.out",
            url = %url,
            status = %status,
            ok = value.is_ok()
        );
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use capsule_core::api::{CAPSULES_ENDPOINT, CHAIN_ENDPOINT, MINE_ENDPOINT};
    use capsule_core::remote::capsules_resource;
    use capsule_core::transport::RequestOptions;
    use mockito::{Matcher, Server};
    use serde_json::json;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn transport_for(url: String) -> HttpTransport {
        HttpTransport::new(&ApiConfig {
            base_url: url,
            timeout_ms: Some(2_000),
            headers: BTreeMap::new(),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_returns_json() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/chain")
            .match_header("content-type", "application/json")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"chain":[],"pendingTransactions":[]}"#)
            .create_async()
            .await;

        let transport = transport_for(server.url());
        let req = ApiRequest::build(CHAIN_ENDPOINT, &RequestOptions::default(), Method::Get);
        let value = transport.execute(req).await.unwrap();
        assert_eq!(value["chain"], json!([]));
    }

    #[tokio::test]
    async fn test_post_sends_json_body_and_headers() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/capsules")
            .match_header("content-type", "application/json")
            .match_header("x-client", "cli")
            .match_body(Matcher::Json(json!({"name": "ada"})))
            .with_status(201)
            .with_body(r#"{"ok":true}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new(&ApiConfig {
            base_url: format!("{}/", server.url()),
            timeout_ms: None,
            headers: BTreeMap::from([("X-Client".to_string(), "cli".to_string())]),
        })
        .unwrap();
        let options = RequestOptions::default().body(json!({"name": "ada"}));
        let req = ApiRequest::build(CAPSULES_ENDPOINT, &options, Method::Post);
        let value = transport.execute(req).await.unwrap();
        assert_eq!(value, json!({"ok": true}));
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_success_status_is_response_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/mine")
            .with_status(502)
            .with_body("bad gateway")
            .create_async()
            .await;

        let transport = transport_for(server.url());
        let req = ApiRequest::build(MINE_ENDPOINT, &RequestOptions::default(), Method::Post);
        let err = transport.execute(req).await.unwrap_err();
        assert_eq!(err.status(), Some(502));
        assert!(err.to_string().contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_empty_body_is_null() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("POST", "/api/mine")
            .with_status(204)
            .create_async()
            .await;

        let transport = transport_for(server.url());
        let req = ApiRequest::build(MINE_ENDPOINT, &RequestOptions::default(), Method::Post);
        assert_eq!(transport.execute(req).await.unwrap(), Value::Null);
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/chain")
            .with_status(200)
            .with_body("<html>oops</html>")
            .create_async()
            .await;

        let transport = transport_for(server.url());
        let req = ApiRequest::build(CHAIN_ENDPOINT, &RequestOptions::default(), Method::Get);
        match transport.execute(req).await {
            Err(ApiError::Decode { message, .. }) => assert!(message.contains("<html>oops</html>")),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let transport = transport_for("http://127.0.0.1:1".to_string());
        let req = ApiRequest::build(CHAIN_ENDPOINT, &RequestOptions::default(), Method::Get);
        let err = transport.execute(req).await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_capsules_resource_over_http() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/capsules")
            .with_status(200)
            .with_body(
                json!([{
                    "sender_name": "ada", "message": "hi", "is_public": true,
                    "lock_until": 1_600_000_000, "created_at": 1_500_000_000
                }])
                .to_string(),
            )
            .create_async()
            .await;

        let client = capsules_resource(Arc::new(transport_for(server.url())));
        assert!(client.refresh().await);
        let capsules = client.snapshot().data.unwrap();
        assert_eq!(capsules.len(), 1);
        assert!(capsules[0].unlocked);
        assert_eq!(
            capsules[0].unlock_at,
            chrono::DateTime::from_timestamp(1_600_000_000, 0).unwrap()
        );
    }
}
