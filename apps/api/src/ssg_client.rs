//! SSG API client. The single point of entry for every outbound call.
//!
//! Authenticates with the session's client certificate (mutual TLS), applies the
//! configured timeout and performs exactly one attempt per call. Nothing here
//! retries; failures go straight back to the caller.

use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, Identity, Method};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::errors::ValidationError;
use crate::session::Session;

/// Keys whose values are personal identifiers and never shown in previews.
const REDACTED_KEYS: &[&str] = &["id", "name", "fullName", "email", "mobile", "corppassId"];
const REDACTED: &str = "********";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Remote API error (status {status}): {message}")]
    RemoteApi { status: u16, message: String },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Client certificate could not be loaded: {0}")]
    Credentials(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Response body is not valid JSON: {0}")]
    Decode(String),
}

impl ApiError {
    /// Stable name of the error kind, for display next to the message.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::RemoteApi { .. } => "RemoteAPIError",
            ApiError::Transport(_) => "TransportError",
            ApiError::Credentials(_) => "CredentialsError",
            ApiError::Validation(_) => "ValidationError",
            ApiError::Decode(_) => "DecodeError",
        }
    }

    pub fn remote_status(&self) -> Option<u16> {
        match self {
            ApiError::RemoteApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ApiError::Transport(format!("request timed out: {e}"))
        } else {
            ApiError::Transport(e.to_string())
        }
    }
}

/// The SSG API environments a session may target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Production,
    Uat,
    Mock,
}

impl Endpoint {
    pub fn base_url(self) -> &'static str {
        match self {
            Endpoint::Production => "https://api.ssg-wsg.sg",
            Endpoint::Uat => "https://uat-api.ssg-wsg.sg",
            Endpoint::Mock => "https://mock-api.ssg-wsg.sg",
        }
    }
}

impl FromStr for Endpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Endpoint::Production),
            "uat" => Ok(Endpoint::Uat),
            "mock" => Ok(Endpoint::Mock),
            other => Err(format!("unknown SSG endpoint '{other}' (expected production, uat or mock)")),
        }
    }
}

/// A request that has been assembled but not sent.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedRequest {
    pub method: Method,
    pub url: String,
    pub body: Option<Value>,
}

impl PreparedRequest {
    /// The body with personal identifiers masked.
    pub fn redacted_body(&self) -> Option<Value> {
        self.body.as_ref().map(redact)
    }
}

impl fmt::Display for PreparedRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.method, self.url)?;
        writeln!(f, "Accept: application/json")?;
        if let Some(body) = self.redacted_body() {
            writeln!(f, "Content-Type: application/json")?;
            writeln!(f)?;
            let pretty = serde_json::to_string_pretty(&body).map_err(|_| fmt::Error)?;
            write!(f, "{pretty}")?;
        }
        Ok(())
    }
}

fn redact(value: &Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| {
                    let v = if REDACTED_KEYS.contains(&k.as_str()) && !v.is_object() {
                        Value::String(REDACTED.to_string())
                    } else {
                        redact(v)
                    };
                    (k.clone(), v)
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.iter().map(redact).collect()),
        other => other.clone(),
    }
}

#[derive(Debug, Deserialize)]
struct RemoteErrorEnvelope {
    error: Option<RemoteErrorBody>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RemoteErrorBody {
    Detailed { message: Option<String> },
    Text(String),
}

/// Pulls a human-readable message out of an error response body.
fn remote_message(body: &str, status: reqwest::StatusCode) -> String {
    let parsed = serde_json::from_str::<RemoteErrorEnvelope>(body).ok();
    let message = parsed.and_then(|e| match e.error {
        Some(RemoteErrorBody::Detailed { message: Some(m) }) | Some(RemoteErrorBody::Text(m)) => {
            Some(m)
        }
        _ => e.message,
    });

    match message {
        Some(m) if !m.is_empty() => m,
        _ if !body.trim().is_empty() => body.trim().to_string(),
        _ => status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string(),
    }
}

/// Reads a PEM certificate and private key into a TLS client identity.
pub fn load_identity(cert_path: &Path, key_path: &Path) -> Result<Identity, ApiError> {
    let mut pem = std::fs::read(key_path)
        .map_err(|e| ApiError::Credentials(format!("{}: {e}", key_path.display())))?;
    pem.push(b'\n');
    pem.extend(
        std::fs::read(cert_path)
            .map_err(|e| ApiError::Credentials(format!("{}: {e}", cert_path.display())))?,
    );
    Identity::from_pem(&pem).map_err(|e| ApiError::Credentials(e.to_string()))
}

#[derive(Clone)]
pub struct SsgClient {
    client: Client,
    base_url: String,
}

impl SsgClient {
    /// `identity` is optional only so local stubs can be reached without TLS.
    pub fn new(
        base_url: impl Into<String>,
        timeout: Duration,
        identity: Option<Identity>,
    ) -> Result<Self, ApiError> {
        let mut builder = Client::builder().timeout(timeout);
        if let Some(identity) = identity {
            builder = builder.identity(identity);
        }
        let client = builder
            .build()
            .map_err(|e| ApiError::Credentials(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// Builds a client authenticated with the session's certificate and key.
    pub fn for_session(
        session: &Session,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let credentials = session.credentials();
        let identity = load_identity(credentials.cert_path(), credentials.key_path())?;
        Self::new(base_url, timeout, Some(identity))
    }

    /// Assembles a request against this client's base URL. No I/O.
    pub fn prepare(&self, method: Method, path: &str, body: Option<Value>) -> PreparedRequest {
        PreparedRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            body,
        }
    }

    /// Sends one request and returns the parsed body of a 2xx response.
    pub async fn send(&self, request: &PreparedRequest) -> Result<Value, ApiError> {
        info!(method = %request.method, url = %request.url, "Sending SSG API request");

        let mut builder = self
            .client
            .request(request.method.clone(), &request.url)
            .header(ACCEPT, "application/json");
        if let Some(body) = &request.body {
            builder = builder.header(CONTENT_TYPE, "application/json").json(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!("SSG API request to {} failed: {e}", request.url);
            ApiError::from(e)
        })?;

        let status = response.status();
        debug!(status = status.as_u16(), "SSG API responded");
        let text = response.text().await?;

        if !status.is_success() {
            let message = remote_message(&text, status);
            warn!("SSG API returned {}: {}", status, message);
            return Err(ApiError::RemoteApi {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
    }
}
