// Appliance REST client
//
// Wraps `reqwest::Client` with basic auth, segment-safe URL construction
// under the `/api` root, and response classification. The appliance reports
// some errors as `{"fault": {"message": ...}}` inside 2xx responses, so every
// body is inspected for a fault before the status is trusted.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// HTTP basic-auth credentials for the appliance.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// Raw HTTP client for the appliance's management API.
///
/// One instance is shared by every row of a batch and by every explorer
/// task; responses are fully read and dropped inside each call.
#[derive(Debug, Clone)]
pub struct ApplianceClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    timeout: Duration,
}

impl ApplianceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the API root, e.g. `https://192.168.56.150:215/api`.
    pub fn new(
        base_url: Url,
        credentials: Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            timeout: transport.timeout,
        })
    }

    /// Create a client around a pre-built `reqwest::Client`.
    ///
    /// `timeout` is only used to label timeout errors; the client's own
    /// configuration decides when a request actually times out.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: Credentials,
        timeout: Duration,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            timeout,
        }
    }

    /// The API root URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Host part of the base URL (used to name explorer runs).
    pub fn host(&self) -> &str {
        self.base_url.host_str().unwrap_or("appliance")
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments to the API root, percent-encoding each one.
    ///
    /// `["storage", "v1", "pools", "p0"]` becomes `{base}/storage/v1/pools/p0`.
    pub fn endpoint(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(format!("{} cannot be a base", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// GET a resource and return its JSON body.
    pub async fn get_json(&self, url: Url) -> Result<Value, Error> {
        debug!("GET {}", url);
        let request = self.http.get(url);
        self.send(request).await
    }

    /// POST a JSON body and return the response JSON.
    pub async fn post_json(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        debug!("POST {}", url);
        let request = self.http.post(url).json(body);
        self.send(request).await
    }

    /// PUT a JSON body and return the response JSON.
    pub async fn put_json(&self, url: Url, body: &(impl Serialize + Sync)) -> Result<Value, Error> {
        debug!("PUT {}", url);
        let request = self.http.put(url).json(body);
        self.send(request).await
    }

    /// DELETE a resource. The appliance answers 204 with an empty body.
    pub async fn delete(&self, url: Url) -> Result<(), Error> {
        debug!("DELETE {}", url);
        let request = self.http.delete(url);
        self.send(request).await.map(|_| ())
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Value, Error> {
        let resp = request
            .basic_auth(
                &self.credentials.username,
                Some(self.credentials.password.expose_secret()),
            )
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| self.transport_error(e))?;
        trace!(%status, len = body.len(), "response received");

        classify(status, &body)
    }

    fn transport_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                timeout_secs: self.timeout.as_secs(),
            }
        } else {
            Error::Transport(err)
        }
    }
}

/// Turn a status + body into the call result.
///
/// Order matters: an embedded fault wins over the status code, then 401,
/// then any other non-success status. Empty success bodies become `null`.
fn classify(status: reqwest::StatusCode, body: &str) -> Result<Value, Error> {
    let json = if body.trim().is_empty() {
        None
    } else {
        serde_json::from_str::<Value>(body).ok()
    };

    if let Some(message) = json.as_ref().and_then(fault_message) {
        return Err(Error::Fault {
            status: status.as_u16(),
            message,
        });
    }

    if status == reqwest::StatusCode::UNAUTHORIZED {
        return Err(Error::Authentication {
            message: preview(body, "invalid credentials"),
        });
    }

    if !status.is_success() {
        let reason = status.canonical_reason().unwrap_or("error");
        return Err(Error::Status {
            status: status.as_u16(),
            message: preview(body, reason),
        });
    }

    match json {
        Some(value) => Ok(value),
        None if body.trim().is_empty() => Ok(Value::Null),
        None => Err(Error::Deserialization {
            message: format!("response is not JSON (body preview: {:?})", preview(body, "")),
            body: body.to_owned(),
        }),
    }
}

/// Extract `fault.message` from an appliance error body.
pub fn fault_message(body: &Value) -> Option<String> {
    let fault = body.get("fault")?;
    match fault.get("message")? {
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn preview(body: &str, fallback: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return fallback.to_owned();
    }
    trimmed.chars().take(200).collect()
}
