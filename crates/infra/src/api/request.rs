//! Request description handed to the executor
//!
//! Requests are plain data so the executor can rebuild them for the single
//! retry after a token refresh (multipart forms in particular cannot be
//! cloned once built).

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use urlencoding::encode;

use super::errors::ApiError;

/// Encode a caller-supplied id as a single path segment
///
/// # Errors
/// Returns `ApiError::Validation` for a blank id or a dot segment.
pub(crate) fn path_id(kind: &str, id: &str) -> Result<String, ApiError> {
    let id = id.trim();
    if id.is_empty() {
        return Err(ApiError::Validation(format!("{kind} id is required")));
    }
    if id == "." || id == ".." {
        return Err(ApiError::Validation(format!("Invalid {kind} id: {id}")));
    }
    Ok(encode(id).into_owned())
}

#[derive(Debug, Clone, PartialEq)]
pub enum MultipartField {
    Text { name: String, value: String },
    File { name: String, file_name: String, content_type: String, bytes: Vec<u8> },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    #[default]
    Empty,
    Json(Value),
    Multipart(Vec<MultipartField>),
}

impl RequestBody {
    pub fn is_multipart(&self) -> bool {
        matches!(self, Self::Multipart(_))
    }

    /// Build a fresh form for one attempt
    pub(crate) fn to_form(fields: &[MultipartField]) -> Result<Form, ApiError> {
        fields.iter().try_fold(Form::new(), |form, field| match field {
            MultipartField::Text { name, value } => Ok(form.text(name.clone(), value.clone())),
            MultipartField::File { name, file_name, content_type, bytes } => {
                let part = Part::bytes(bytes.clone())
                    .file_name(file_name.clone())
                    .mime_str(content_type)
                    .map_err(|e| ApiError::Validation(format!("Invalid content type: {e}")))?;
                Ok(form.part(name.clone(), part))
            }
        })
    }
}

/// One backend call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the configured base URL, starting with `/`
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: RequestBody,
    /// Caller headers; these override the executor's defaults
    pub headers: HeaderMap,
    /// Attach the bearer token when one is held
    pub authenticated: bool,
    pub timeout: Option<Duration>,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            headers: HeaderMap::new(),
            authenticated: true,
            timeout: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Serialize `body` as the JSON payload
    ///
    /// # Errors
    /// Returns `ApiError::Validation` if the body cannot be represented as JSON.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::Validation(format!("Failed to serialize body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    pub fn json_value(mut self, body: Value) -> Self {
        self.body = RequestBody::Json(body);
        self
    }

    pub fn multipart(mut self, fields: Vec<MultipartField>) -> Self {
        self.body = RequestBody::Multipart(fields);
        self
    }

    pub fn query<K, V>(mut self, pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.query.extend(pairs.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    /// Never attach a bearer token (login, registration, refresh, health)
    pub fn unauthenticated(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
