//! The request/response boundary to the remote ledger service.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ApiError;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const JSON_MEDIA_TYPE: &str = "application/json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Caller-supplied knobs for a request. Anything left unset falls back to the
/// caller's default method and the JSON content type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: Option<Method>,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl RequestOptions {
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// A fully resolved request, ready for a [`Transport`].
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub endpoint: String,
    pub headers: BTreeMap<String, String>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn build(endpoint: &str, options: &RequestOptions, default_method: Method) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert(CONTENT_TYPE.to_string(), JSON_MEDIA_TYPE.to_string());
        for (name, value) in &options.headers {
            headers.retain(|existing: &String, _| !existing.eq_ignore_ascii_case(name));
            headers.insert(name.clone(), value.clone());
        }
        Self {
            method: options.method.unwrap_or(default_method),
            endpoint: endpoint.to_string(),
            headers,
            body: options.body.clone(),
        }
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Performs one request against the remote service and yields its decoded JSON
/// body (`Value::Null` for an empty body).
///
/// Implementations must report a non-2xx status as [`ApiError::Response`] and
/// a missing response as [`ApiError::Transport`]. They must not retry.
#[async_trait]
pub trait Transport: Send + Sync {
    fn name(&self) -> &str;
    async fn execute(&self, request: ApiRequest) -> Result<Value, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults_to_json_and_caller_method() {
        let req = ApiRequest::build("/chain", &RequestOptions::default(), Method::Get);
        assert_eq!(req.method, Method::Get);
        assert_eq!(req.header("content-type"), Some(JSON_MEDIA_TYPE));
        assert_eq!(req.body, None);
    }

    #[test]
    fn test_caller_headers_override_case_insensitively() {
        let options = RequestOptions::default()
            .method(Method::Post)
            .header("content-type", "text/plain")
            .header("X-Trace", "1")
            .body(json!({"a": 1}));
        let req = ApiRequest::build("/api/mine", &options, Method::Get);
        assert_eq!(req.method, Method::Post);
        assert_eq!(req.headers.len(), 2);
        assert_eq!(req.header("Content-Type"), Some("text/plain"));
        assert_eq!(req.header("x-trace"), Some("1"));
        assert_eq!(req.body, Some(json!({"a": 1})));
    }
}
