//! Async facade over the Abitus API: one method per remote operation, each a
//! build → execute → parse round-trip.

use std::sync::Arc;

use abitus_core::{
    AbitusClient, ApiError, MissingPersonReport, MultipartForm, PeopleFilter, PeoplePage, Person,
    ReportInfo, Statistics,
};
use serde_json::Value;

use crate::config::ApiSettings;
use crate::transport::Transport;

#[derive(Debug)]
pub struct AbitusService<T> {
    client: AbitusClient,
    transport: Arc<T>,
}

impl<T> Clone for AbitusService<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            transport: Arc::clone(&self.transport),
        }
    }
}

impl<T: Transport> AbitusService<T> {
    pub fn new(client: AbitusClient, transport: Arc<T>) -> Self {
        Self { client, transport }
    }

    pub fn from_settings(settings: &ApiSettings, transport: Arc<T>) -> Self {
        Self::new(AbitusClient::new(&settings.base_url), transport)
    }

    pub fn client(&self) -> &AbitusClient {
        &self.client
    }

    pub async fn list_people(&self, filter: &PeopleFilter) -> Result<PeoplePage, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_list_people(filter))
            .await?;
        self.client.parse_list_people(response)
    }

    pub async fn get_person(&self, id: i64) -> Result<Person, ApiError> {
        let response = self.transport.execute(self.client.build_get_person(id)).await?;
        self.client.parse_get_person(response)
    }

    pub async fn get_statistics(&self) -> Result<Statistics, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_get_statistics())
            .await?;
        self.client.parse_get_statistics(response)
    }

    pub async fn submit_missing_person_report(&self, form: &MultipartForm) -> Result<Value, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_submit_report(form))
            .await?;
        self.client.parse_submit_report(response)
    }

    pub async fn submit_report(&self, report: &MissingPersonReport) -> Result<Value, ApiError> {
        self.submit_missing_person_report(&report.to_form()).await
    }

    pub async fn get_report_info(&self, occurrence_id: i64) -> Result<Vec<ReportInfo>, ApiError> {
        let response = self
            .transport
            .execute(self.client.build_get_report_info(occurrence_id))
            .await?;
        self.client.parse_get_report_info(response)
    }
}
