//! Stateless HTTP request builder and response parser for the Abitus API.
//!
//! # Design
//! `AbitusClient` holds only a `base_url`. Each remote operation is split into
//! a `build_*` method that produces an `HttpRequest` and a `parse_*` method
//! that consumes an `HttpResponse`. The caller executes the round-trip.
//!
//! Parsers accept any 2xx status and reject everything else as
//! `ApiError::HttpError` without interpreting the code. Each endpoint
//! declares the minimum envelope it needs; a 2xx body missing it is
//! `ApiError::InvalidShape`.

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::query::PeopleFilter;
use crate::types::{FileUpload, PeoplePage, Person, ReportInfo, Statistics};

/// Default production endpoint of the Abitus API.
pub const DEFAULT_BASE_URL: &str = "https://abitus-api.geia.vip/v1/";

/// Synchronous, stateless client for the Abitus API.
#[derive(Debug, Clone)]
pub struct AbitusClient {
    base_url: String,
}

impl AbitusClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    pub fn build_list_people(&self, filter: &PeopleFilter) -> HttpRequest {
        HttpRequest::get(self.url(&format!(
            "pessoas/aberto/filtro{}",
            filter.to_query_string()
        )))
    }

    pub fn build_get_person(&self, id: i64) -> HttpRequest {
        HttpRequest::get(self.url(&format!("pessoas/{id}")))
    }

    pub fn build_get_statistics(&self) -> HttpRequest {
        HttpRequest::get(self.url("pessoas/aberto/estatistico"))
    }

    pub fn build_submit_report(&self, form: &MultipartForm) -> HttpRequest {
        HttpRequest::post_form(self.url("ocorrencias/informacoes-desaparecido"), form.clone())
    }

    /// The occurrence id travels as a query parameter here, unlike
    /// `pessoas/{id}`; the remote only accepts it that way.
    pub fn build_get_report_info(&self, occurrence_id: i64) -> HttpRequest {
        HttpRequest::get(self.url(&format!(
            "ocorrencias/informacoes-desaparecido?ocorrenciaId={occurrence_id}"
        )))
    }

    pub fn parse_list_people(&self, response: HttpResponse) -> Result<PeoplePage, ApiError> {
        let body = check_status(&response)?;
        match &body {
            Value::Object(map) if map.get("content").is_some_and(Value::is_array) => {}
            _ => return Err(ApiError::invalid_shape()),
        }
        decode(body)
    }

    pub fn parse_get_person(&self, response: HttpResponse) -> Result<Person, ApiError> {
        decode(require_body(check_status(&response)?)?)
    }

    pub fn parse_get_statistics(&self, response: HttpResponse) -> Result<Statistics, ApiError> {
        decode(require_body(check_status(&response)?)?)
    }

    /// The submission result is passed through untouched.
    pub fn parse_submit_report(&self, response: HttpResponse) -> Result<Value, ApiError> {
        check_status(&response)
    }

    /// The remote answers with a list, or with a single object when only one
    /// entry exists.
    pub fn parse_get_report_info(&self, response: HttpResponse) -> Result<Vec<ReportInfo>, ApiError> {
        match require_body(check_status(&response)?)? {
            Value::Array(items) => decode(Value::Array(items)),
            single @ Value::Object(_) => Ok(vec![decode(single)?]),
            _ => Err(ApiError::invalid_shape()),
        }
    }
}

/// A citizen's report about a missing person, as sent by the report form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingPersonReport {
    pub oco_id: i64,
    pub informacao: String,
    pub descricao: Option<String>,
    pub data: NaiveDate,
    pub files: Vec<FileUpload>,
}

impl MissingPersonReport {
    pub fn to_form(&self) -> MultipartForm {
        let mut form = MultipartForm::new()
            .text("ocoId", self.oco_id.to_string())
            .text("informacao", self.informacao.clone());
        if let Some(descricao) = self.descricao.as_deref().filter(|d| !d.is_empty()) {
            form = form.text("descricao", descricao);
        }
        form = form.text("data", self.data.format("%Y-%m-%d").to_string());
        for file in &self.files {
            form = form.file("files", file.clone());
        }
        form
    }
}

/// Reject non-2xx responses and decode the body as JSON. An empty 2xx body is
/// treated as `null`.
fn check_status(response: &HttpResponse) -> Result<Value, ApiError> {
    if !response.is_success() {
        return Err(ApiError::HttpError {
            status: response.status,
            body: response.body.clone(),
            message: server_message(&response.body),
        });
    }
    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

fn require_body(body: Value) -> Result<Value, ApiError> {
    if body.is_null() {
        Err(ApiError::invalid_shape())
    } else {
        Ok(body)
    }
}

fn decode<T: DeserializeOwned>(body: Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Extract the `message` field of an error body, if it is JSON and has one.
fn server_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
