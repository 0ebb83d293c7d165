//! Executes core `HttpRequest`s over the network.
//!
//! # Design
//! `Transport` is the seam between the sans-IO core and real I/O. A transport
//! returns `Err` only when no response was obtained; every status code,
//! including 4xx/5xx, comes back as an `HttpResponse` for the core parsers to
//! interpret.

use std::fmt;

use abitus_core::{ApiError, FileUpload, HttpMethod, HttpRequest, HttpResponse, MultipartForm, PartValue};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::multipart::{Form, Part};
use tracing::debug;

#[async_trait]
pub trait Transport: Send + Sync + fmt::Debug {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// reqwest-backed transport with the API's default headers.
///
/// Requests carrying a form are sent as `multipart/form-data`; reqwest sets
/// that `content-type` (with its boundary) over the JSON default.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        // TODO: insert `Authorization: Bearer <token>` here once the Abitus
        // API starts requiring a logged-in user.
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { http })
    }

    /// Wrap an already configured client.
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = request.method.as_str(), url = %request.url, "sending request");

        let mut builder = match request.method {
            HttpMethod::Get => self.http.get(&request.url),
            HttpMethod::Post => self.http.post(&request.url),
        };
        if let Some(form) = request.form {
            builder = builder.multipart(to_multipart(form)?);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        debug!(status, url = %request.url, bytes = body.len(), "received response");
        Ok(HttpResponse { status, body })
    }
}

fn to_multipart(form: MultipartForm) -> Result<Form, ApiError> {
    let mut multipart = Form::new();
    for part in form.into_parts() {
        multipart = match part.value {
            PartValue::Text(text) => multipart.text(part.name, text),
            PartValue::File(FileUpload {
                file_name,
                mime_type,
                bytes,
            }) => {
                let file = Part::bytes(bytes)
                    .file_name(file_name.clone())
                    .mime_str(&mime_type)
                    .map_err(|e| {
                        ApiError::Transport(format!("invalid mime type for {file_name}: {e}"))
                    })?;
                multipart.part(part.name, file)
            }
        };
    }
    Ok(multipart)
}
