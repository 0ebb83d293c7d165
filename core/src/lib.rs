//! Synchronous API client core for the Abitus missing-persons service.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The async host lives in the
//! `abitus-client` crate; tests drive the same requests with a blocking agent.
//!
//! # Design
//! - `AbitusClient` and `ImgbbClient` are stateless: a base URL (and API key).
//! - Every remote operation is split into `build_*` and `parse_*`.
//! - Parsers validate only the envelope each endpoint promises; records are
//!   lenient DTOs.
//! - Query and date formatting are pure functions shared with UI code.

pub mod client;
pub mod date;
pub mod error;
pub mod http;
pub mod imgbb;
pub mod multipart;
pub mod query;
pub mod types;

pub use client::{AbitusClient, MissingPersonReport, DEFAULT_BASE_URL};
pub use date::{format_date, DateInput, FormattedDate, INVALID_DATE};
pub use error::{ApiError, UploadError, INVALID_DATA_STRUCTURE, UPLOAD_FAILED};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use imgbb::{ImgbbClient, DEFAULT_UPLOAD_URL};
pub use multipart::{FormPart, MultipartForm, PartValue};
pub use query::{format_query_params, PeopleFilter};
pub use types::{FileUpload, Occurrence, PeoplePage, Person, PersonStatus, ReportInfo, Sex, Statistics};
