//! HTTP transport to the chat/PDF backend.
//!
//! The backend is inconsistent about bodies: success replies may be JSON or
//! plain text and errors may be `{error}`, `{message}` or raw text. The
//! shape is decided once here, in [`ApiResponse::from_parts`], so the
//! orchestrators only ever see a tagged payload.

use async_trait::async_trait;
use reqwest::{
    Client,
    multipart::{Form, Part},
};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::errors::{WidgetError, WidgetResult};
use crate::models::ErrorBody;

const PDF_MIME: &str = "application/pdf";
const FILES_FIELD: &str = "files";

/// A file selected for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }
}

/// What goes in the request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Empty,
    Json(Value),
    Files(Vec<UploadFile>),
}

/// A backend call. Every endpoint the widget uses is a `POST`.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub path: String,
    pub body: RequestBody,
    pub bearer_token: Option<String>,
}

impl ApiRequest {
    /// A `POST` with no body.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: RequestBody::Empty,
            bearer_token: None,
        }
    }

    /// A `POST` with a JSON body.
    ///
    /// # Errors
    /// Returns [`WidgetError::Decode`] if `payload` cannot be serialized.
    pub fn json<T: Serialize>(path: impl Into<String>, payload: &T) -> WidgetResult<Self> {
        let value = serde_json::to_value(payload).map_err(WidgetError::decode)?;
        Ok(Self {
            body: RequestBody::Json(value),
            ..Self::post(path)
        })
    }

    /// A multipart `POST` carrying `files`.
    pub fn files(path: impl Into<String>, files: Vec<UploadFile>) -> Self {
        Self {
            body: RequestBody::Files(files),
            ..Self::post(path)
        }
    }

    #[must_use]
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }
}

/// Response body, classified once at the transport boundary.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(Value),
    Text(String),
    Empty,
}

/// Tagged backend result: a status plus a classified payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub payload: Payload,
}

impl ApiResponse {
    /// Classifies a raw body: JSON when it parses, text otherwise.
    #[must_use]
    pub fn from_parts(status: u16, body: &str) -> Self {
        let trimmed = body.trim();
        let payload = if trimmed.is_empty() {
            Payload::Empty
        } else {
            serde_json::from_str::<Value>(trimmed)
                .map_or_else(|_| Payload::Text(body.to_string()), Payload::Json)
        };
        Self { status, payload }
    }

    pub fn json(status: u16, value: Value) -> Self {
        Self {
            status,
            payload: Payload::Json(value),
        }
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Human readable description of a failed response.
    #[must_use]
    pub fn error_message(&self) -> String {
        match &self.payload {
            Payload::Json(value) => serde_json::from_value::<ErrorBody>(value.clone())
                .ok()
                .and_then(|body| body.description().map(str::to_string))
                .unwrap_or_else(|| value.to_string()),
            Payload::Text(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => "Server error".to_string(),
        }
    }

    /// Fails with [`WidgetError::Backend`] unless the status is 2xx.
    ///
    /// # Errors
    /// Returns the backend error carrying status and extracted message.
    pub fn ensure_ok(self) -> WidgetResult<Self> {
        if self.is_ok() {
            Ok(self)
        } else {
            Err(WidgetError::Backend {
                status: self.status,
                message: self.error_message(),
            })
        }
    }

    /// Decodes a 2xx JSON payload into `T`.
    ///
    /// # Errors
    /// Returns [`WidgetError::Backend`] for a non-success status and
    /// [`WidgetError::Decode`] when the payload is not the expected JSON.
    pub fn decode<T: DeserializeOwned>(self) -> WidgetResult<T> {
        match self.ensure_ok()?.payload {
            Payload::Json(value) => serde_json::from_value(value).map_err(WidgetError::decode),
            Payload::Text(_) => Err(WidgetError::decode("expected JSON, got text")),
            Payload::Empty => Err(WidgetError::decode("empty response body")),
        }
    }
}

/// Sends requests to the backend.
///
/// Single-threaded by design: futures are not `Send`, matching the browser
/// event loop the widget runs on.
#[async_trait(?Send)]
pub trait Transport {
    /// Issues one request. Only transport failures are errors; any HTTP
    /// status comes back as an [`ApiResponse`].
    async fn send(&self, request: ApiRequest) -> WidgetResult<ApiResponse>;
}

/// reqwest-backed transport.
#[derive(Clone, Debug)]
pub struct HttpTransport {
    base_url: String,
    client: Client,
}

impl HttpTransport {
    /// Creates a transport rooted at an absolute `base_url`.
    pub fn new(base_url: &str) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: &str, client: Client) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn multipart(files: Vec<UploadFile>) -> WidgetResult<Form> {
        files.into_iter().try_fold(Form::new(), |form, file| {
            let part = Part::bytes(file.bytes)
                .file_name(file.name)
                .mime_str(PDF_MIME)
                .map_err(WidgetError::network)?;
            Ok(form.part(FILES_FIELD, part))
        })
    }
}

#[async_trait(?Send)]
impl Transport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> WidgetResult<ApiResponse> {
        let url = self.api_url(&request.path);
        debug!(path = %request.path, authorized = request.bearer_token.is_some(), "sending request");

        let mut builder = self.client.post(url);
        if let Some(token) = &request.bearer_token {
            builder = builder.bearer_auth(token);
        }
        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Files(files) => builder.multipart(Self::multipart(files)?),
        };

        let response = builder.send().await.map_err(WidgetError::network)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(WidgetError::network)?;
        debug!(path = %request.path, status, "received response");
        Ok(ApiResponse::from_parts(status, &body))
    }
}
