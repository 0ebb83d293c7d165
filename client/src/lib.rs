//! Async host for the Abitus client core.
//!
//! # Overview
//! Executes the requests built by `abitus-core` through a [`Transport`]
//! (reqwest by default) and exposes:
//! - [`AbitusService`]: one async method per Abitus endpoint;
//! - [`ImageUploader`]: single and all-or-nothing batch uploads to imgBB;
//! - [`AbitusStore`]: the session's state store, with loading/error/success
//!   flags per action group;
//! - [`AbitusConfig`]: layered configuration for base URLs and the imgBB key.
//!
//! Logging goes through `tracing`; installing a subscriber is left to the
//! application.

pub mod config;
pub mod service;
pub mod store;
pub mod transport;
pub mod upload;

pub use config::{AbitusConfig, ApiSettings, ImgbbSettings};
pub use service::AbitusService;
pub use store::{AbitusStore, RequestState, StoreState, SubmissionState};
pub use transport::{ReqwestTransport, Transport};
pub use upload::ImageUploader;
