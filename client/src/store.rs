//! Application state store.
//!
//! # Design
//! `AbitusStore` is the session's context object: UI handlers call its async
//! actions and read (or subscribe to) `StoreState`. State lives in a
//! `watch` channel, so every transition is one atomic `send_modify` and
//! subscribers observe each of them.
//!
//! Every action runs the same three steps:
//! 1. entry: its group's `loading = true`, previous outcome cleared;
//! 2. the facade call;
//! 3. exit: `loading = false`, then either the payload or an error message.
//!
//! The general fetch group and the report-submission group are independent.
//! Overlapping calls in one group are last-write-wins on its flags.

use std::sync::Arc;

use abitus_core::{
    ApiError, MissingPersonReport, MultipartForm, PeopleFilter, Person, ReportInfo, Statistics,
};
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::config::ApiSettings;
use crate::service::AbitusService;
use crate::transport::{ReqwestTransport, Transport};

pub const FETCH_FAILED: &str = "Erro ao carregar dados";
pub const REPORT_SENT: &str = "Informação enviada com sucesso!";
pub const REPORT_FAILED: &str = "Erro ao enviar informação";

/// Flags of the general fetch group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestState {
    pub loading: bool,
    pub error: Option<String>,
}

/// Flags of the report-submission group.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubmissionState {
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StoreState {
    pub people: Vec<Person>,
    pub person: Option<Person>,
    pub report_details: Vec<ReportInfo>,
    pub statistics: Statistics,
    pub total_people: u64,
    pub total_pages: u32,
    pub fetch: RequestState,
    pub report: SubmissionState,
}

#[derive(Debug)]
pub struct AbitusStore<T> {
    service: AbitusService<T>,
    state: watch::Sender<StoreState>,
}

impl AbitusStore<ReqwestTransport> {
    /// Store backed by a fresh reqwest transport pointed at `settings`.
    pub fn from_settings(settings: &ApiSettings) -> Result<Self, ApiError> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(AbitusService::from_settings(settings, transport)))
    }
}

impl<T: Transport> AbitusStore<T> {
    pub fn new(service: AbitusService<T>) -> Self {
        let (state, _) = watch::channel(StoreState::default());
        Self { service, state }
    }

    pub fn service(&self) -> &AbitusService<T> {
        &self.service
    }

    /// A copy of the current state.
    pub fn snapshot(&self) -> StoreState {
        self.state.borrow().clone()
    }

    /// A receiver notified after every state transition.
    pub fn subscribe(&self) -> watch::Receiver<StoreState> {
        self.state.subscribe()
    }

    pub async fn fetch_people(&self, filter: &PeopleFilter) {
        self.begin_fetch();
        let result = self.service.list_people(filter).await;
        if let Ok(page) = &result {
            debug!(
                count = page.content.len(),
                total = page.total_elements,
                pages = page.total_pages,
                "people fetched"
            );
        }
        self.finish_fetch("fetch_people", result, |state, page| {
            state.total_people = page.total_elements;
            state.total_pages = page.total_pages;
            state.people = page.content;
        });
    }

    pub async fn fetch_person(&self, id: i64) {
        self.begin_fetch();
        let result = self.service.get_person(id).await;
        self.finish_fetch("fetch_person", result, |state, person| {
            state.person = Some(person);
        });
    }

    pub async fn fetch_statistics(&self) {
        self.begin_fetch();
        let result = self.service.get_statistics().await;
        self.finish_fetch("fetch_statistics", result, |state, statistics| {
            state.statistics = statistics;
        });
    }

    pub async fn fetch_report_detail(&self, occurrence_id: i64) {
        self.begin_fetch();
        let result = self.service.get_report_info(occurrence_id).await;
        self.finish_fetch("fetch_report_detail", result, |state, details| {
            state.report_details = details;
        });
    }

    /// Submit a report form. The outcome is recorded in `report` and also
    /// returned, so callers can react to failures directly.
    pub async fn submit_missing_person_report(&self, form: &MultipartForm) -> Result<Value, ApiError> {
        self.state.send_modify(|state| {
            state.report.loading = true;
            state.report.error = None;
            state.report.success = None;
        });

        let result = self.service.submit_missing_person_report(form).await;
        match &result {
            Ok(_) => debug!("missing person report submitted"),
            Err(err) => warn!(error = %err, "missing person report failed"),
        }

        self.state.send_modify(|state| {
            state.report.loading = false;
            match &result {
                Ok(_) => state.report.success = Some(REPORT_SENT.to_string()),
                Err(err) => state.report.error = Some(err.user_message_or(REPORT_FAILED)),
            }
        });
        result
    }

    pub async fn submit_report(&self, report: &MissingPersonReport) -> Result<Value, ApiError> {
        self.submit_missing_person_report(&report.to_form()).await
    }

    fn begin_fetch(&self) {
        self.state.send_modify(|state| {
            state.fetch.loading = true;
            state.fetch.error = None;
        });
    }

    fn finish_fetch<P>(
        &self,
        action: &'static str,
        result: Result<P, ApiError>,
        apply: impl FnOnce(&mut StoreState, P),
    ) {
        match &result {
            Ok(_) => debug!(action, "store action succeeded"),
            Err(err) => warn!(action, error = %err, "store action failed"),
        }
        self.state.send_modify(|state| {
            state.fetch.loading = false;
            match result {
                Ok(payload) => apply(state, payload),
                Err(err) => state.fetch.error = Some(err.user_message_or(FETCH_FAILED)),
            }
        });
    }
}
