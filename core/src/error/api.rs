use std::fmt;

use thiserror::Error;

const BODY_PREVIEW_LIMIT: usize = 512;

/// Why a request never produced a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    Timeout,
    Connect,
    Request,
    Body,
    Unknown,
}

impl TransportErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Connect => "connect",
            Self::Request => "request",
            Self::Body => "body",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors crossing the request/response boundary.
///
/// `Transport` means no response arrived at all; `Response` means the service
/// answered with a non-success status; `Decode` means a success response whose
/// body did not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("transport error kind={kind} url={url}: {message}")]
    Transport {
        kind: TransportErrorKind,
        url: String,
        message: String,
    },
    #[error("HTTP error status={status} url={url}: {body}")]
    Response {
        status: u16,
        url: String,
        body: String,
    },
    #[error("failed to decode response url={url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    pub fn transport(
        kind: TransportErrorKind,
        url: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ApiError::Transport {
            kind,
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn response(status: u16, url: impl Into<String>, body: &str) -> Self {
        ApiError::Response {
            status,
            url: url.into(),
            body: preview_body(body),
        }
    }

    pub fn decode(url: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::Decode {
            url: url.into(),
            message: message.into(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Response { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Transport { .. })
    }
}

/// Shortens a response body for inclusion in error messages.
pub fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }

    let mut out = String::new();
    let mut truncated = false;
    for (idx, ch) in trimmed.chars().enumerate() {
        if idx >= BODY_PREVIEW_LIMIT {
            truncated = true;
            break;
        }
        out.push(ch);
    }

    if truncated {
        out.push_str("...");
    }

    out
}
