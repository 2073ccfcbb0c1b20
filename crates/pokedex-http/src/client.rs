//! HTTP client for the Pokédex backend.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, instrument, trace};

use pokedex_core::error::{Error, InvalidInputError, RequestFailure, TransportError};
use pokedex_core::tokens::AccessToken;
use pokedex_core::{ApiUrl, Result};

use crate::endpoints::HEALTH;

/// Header that tells an ngrok tunnel to skip its interstitial page.
const NGROK_SKIP_WARNING: &str = "ngrok-skip-browser-warning";

/// How long the health probe waits before giving up.
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// A request body for authenticated execution.
///
/// Bodies are kept in a rebuildable form so the one-shot 401 retry can
/// resend the same request with a fresh token.
pub enum RequestBody {
    /// No body. Sent with the common JSON headers.
    Empty,
    /// A JSON body.
    Json(serde_json::Value),
    /// A multipart/form-data body.
    Multipart(MultipartForm),
}

/// A rebuildable multipart form.
///
/// `reqwest`'s form type is single-use, so the parts are kept here and a
/// fresh form is built for every send.
#[derive(Default)]
pub struct MultipartForm {
    parts: Vec<FormPart>,
}

enum FormPart {
    Text {
        name: String,
        value: String,
    },
    Bytes {
        name: String,
        file_name: String,
        mime: String,
        data: Vec<u8>,
    },
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(FormPart::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Add a file field from in-memory bytes.
    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        data: Vec<u8>,
    ) -> Self {
        self.parts.push(FormPart::Bytes {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            data,
        });
        self
    }

    pub(crate) fn to_form(&self) -> Result<reqwest::multipart::Form> {
        let mut form = reqwest::multipart::Form::new();
        for part in &self.parts {
            form = match part {
                FormPart::Text { name, value } => form.text(name.clone(), value.clone()),
                FormPart::Bytes {
                    name,
                    file_name,
                    mime,
                    data,
                } => {
                    let part = reqwest::multipart::Part::bytes(data.clone())
                        .file_name(file_name.clone())
                        .mime_str(mime)
                        .map_err(|e| InvalidInputError::Other {
                            message: format!("invalid mime type '{}': {}", mime, e),
                        })?;
                    form.part(name.clone(), part)
                }
            };
        }
        Ok(form)
    }
}

/// HTTP client for Pokédex API requests.
#[derive(Debug, Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    api: ApiUrl,
}

impl HttpClient {
    /// Create a new client for the given API.
    pub(crate) fn new(api: ApiUrl) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("pokedex/", env!("CARGO_PKG_VERSION")))
            .build()
            .expect("failed to build HTTP client");

        Self { client, api }
    }

    /// Returns the API URL this client is configured for.
    pub(crate) fn api(&self) -> &ApiUrl {
        &self.api
    }

    /// Make an unauthenticated POST with a JSON body.
    #[instrument(skip(self, body), fields(api = %self.api))]
    pub(crate) async fn post_json<B, R>(&self, path: &str, body: &B) -> Result<R>
    where
        B: Serialize,
        R: DeserializeOwned,
    {
        let url = self.api.join(path);
        debug!(path, "POST");

        let response = self
            .client
            .post(&url)
            .headers(self.common_headers())
            .json(body)
            .send()
            .await
            .map_err(transport_error)?;

        Self::json_or_failure(response).await
    }

    /// Make an authenticated GET, expecting a JSON body.
    #[instrument(skip(self, token), fields(api = %self.api))]
    pub(crate) async fn get_json_authed<R>(&self, path: &str, token: &AccessToken) -> Result<R>
    where
        R: DeserializeOwned,
    {
        let url = self.api.join(path);
        debug!(path, "GET (authed)");

        let mut headers = self.common_headers();
        headers.insert(AUTHORIZATION, Self::bearer(token));

        let response = self
            .client
            .get(&url)
            .headers(headers)
            .send()
            .await
            .map_err(transport_error)?;

        Self::json_or_failure(response).await
    }

    /// Send an authenticated request, returning the raw response.
    ///
    /// Status handling belongs to the caller; only transport errors are
    /// mapped here.
    #[instrument(skip(self, body, token), fields(api = %self.api, %method))]
    pub(crate) async fn send_authed(
        &self,
        method: Method,
        path: &str,
        body: &RequestBody,
        token: &AccessToken,
    ) -> Result<reqwest::Response> {
        let url = self.api.join(path);
        debug!(path, "Sending authenticated request");

        let request = match body {
            RequestBody::Empty => {
                let mut headers = self.common_headers();
                headers.insert(AUTHORIZATION, Self::bearer(token));
                self.client.request(method, &url).headers(headers)
            }
            RequestBody::Json(value) => {
                let mut headers = self.common_headers();
                headers.insert(AUTHORIZATION, Self::bearer(token));
                self.client.request(method, &url).headers(headers).json(value)
            }
            RequestBody::Multipart(form) => {
                // No explicit content type: reqwest sets the multipart
                // boundary itself.
                let mut headers = HeaderMap::new();
                headers.insert(AUTHORIZATION, Self::bearer(token));
                headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
                self.client
                    .request(method, &url)
                    .headers(headers)
                    .multipart(form.to_form()?)
            }
        };

        let response = request.send().await.map_err(transport_error)?;
        trace!(status = %response.status(), "API response");
        Ok(response)
    }

    /// Probe the backend health endpoint.
    #[instrument(skip(self), fields(api = %self.api))]
    pub(crate) async fn health(&self) -> Result<()> {
        let url = self.api.join(HEALTH);
        debug!("Health probe");

        let response = self
            .client
            .get(&url)
            .headers(self.common_headers())
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
            .map_err(health_error)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(Self::failure(response, false).await)
        }
    }

    /// Decode a success response per its content type.
    ///
    /// JSON bodies parse to a value, with an empty body treated as an empty
    /// object. Anything else comes back as the raw text.
    pub(crate) async fn parse_success(response: reqwest::Response) -> Result<serde_json::Value> {
        let is_json = is_json_content(&response);
        let text = response.text().await.map_err(transport_error)?;

        if is_json {
            if text.trim().is_empty() {
                Ok(serde_json::Value::Object(serde_json::Map::new()))
            } else {
                Ok(serde_json::from_str(&text)?)
            }
        } else {
            Ok(serde_json::Value::String(text))
        }
    }

    /// Turn a non-2xx response into a request failure, decoding the body
    /// best-effort for inspection.
    pub(crate) async fn failure(response: reqwest::Response, retried: bool) -> Error {
        let status = response.status().as_u16();
        let is_json = is_json_content(&response);
        let text = response.text().await.unwrap_or_default();

        let body = if is_json {
            match serde_json::from_str(&text) {
                Ok(value) => value,
                Err(_) => serde_json::Value::String(text),
            }
        } else {
            serde_json::Value::String(text)
        };

        RequestFailure::new(status, body, retried).into()
    }

    async fn json_or_failure<R: DeserializeOwned>(response: reqwest::Response) -> Result<R> {
        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            let body = response.json::<R>().await.map_err(transport_error)?;
            Ok(body)
        } else {
            Err(Self::failure(response, false).await)
        }
    }

    /// Headers sent with every non-multipart request.
    fn common_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(NGROK_SKIP_WARNING, HeaderValue::from_static("true"));
        headers
    }

    fn bearer(token: &AccessToken) -> HeaderValue {
        let value = format!("Bearer {}", token.as_str());
        HeaderValue::from_str(&value).expect("invalid token characters")
    }
}

fn is_json_content(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.contains("application/json"))
}

/// Classify a transport-level failure from the HTTP layer.
fn transport_error(err: reqwest::Error) -> Error {
    let transport = if err.is_timeout() {
        TransportError::Timeout { duration_ms: 0 }
    } else if err.is_connect() {
        TransportError::Connection {
            message: err.to_string(),
        }
    } else {
        TransportError::Http {
            message: err.to_string(),
        }
    };
    Error::Transport(transport)
}

/// Like [`transport_error`], but attributes timeouts to the health probe's
/// deadline.
fn health_error(err: reqwest::Error) -> Error {
    if err.is_timeout() {
        Error::Transport(TransportError::Timeout {
            duration_ms: HEALTH_TIMEOUT.as_millis() as u64,
        })
    } else {
        transport_error(err)
    }
}
