//! Lending service: loans, populated listings and overdue notifications

use reqwest::Method;

use crate::{
    client::{ApiClient, ApiResult},
    models::{DataEnvelope, LendingPopulated, LendingRecord, NewLending},
    session::Session,
};

#[derive(Clone)]
pub struct LendingsService {
    client: ApiClient,
}

impl LendingsService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, session: &Session) -> ApiResult<Vec<LendingRecord>> {
        self.client.get(session, "/api/lendings").await
    }

    /// Lendings with book and reader expanded
    pub async fn get_all_populated(&self, session: &Session) -> ApiResult<Vec<LendingPopulated>> {
        self.client.get(session, "/api/lendings/with-names").await
    }

    pub async fn get_by_id(&self, session: &Session, id: &str) -> ApiResult<LendingRecord> {
        self.client
            .get::<DataEnvelope<LendingRecord>>(session, &format!("/api/lendings/{}", id))
            .await
            .map(|envelope| envelope.data)
            .inspect_err(|e| tracing::warn!("Error fetching lending {}: {}", id, e))
    }

    pub async fn create(&self, session: &Session, lending: &NewLending) -> ApiResult<LendingRecord> {
        self.client.post(session, "/api/lendings", lending).await
    }

    pub async fn update(
        &self,
        session: &Session,
        id: &str,
        lending: &NewLending,
    ) -> ApiResult<LendingRecord> {
        self.client
            .put(session, &format!("/api/lendings/update/{}", id), lending)
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> ApiResult<()> {
        self.client
            .delete(session, &format!("/api/lendings/delete/{}", id))
            .await
    }

    /// Ask the server to e-mail one reader about their overdue books
    pub async fn notify_reader(&self, session: &Session, reader_id: &str) -> ApiResult<()> {
        self.client
            .send_empty(
                session,
                Method::POST,
                &format!("/api/lendings/notify-overdue-with-user/{}", reader_id),
                None,
            )
            .await
            .inspect_err(|e| tracing::error!("Error sending overdue notification to {}: {}", reader_id, e))
    }

    /// Ask the server to notify every reader with overdue books
    pub async fn notify_all(&self, session: &Session) -> ApiResult<()> {
        self.client
            .send_empty(session, Method::POST, "/api/lendings/notify-overdue", None)
            .await
            .inspect_err(|e| tracing::error!("Error notifying all overdue readers: {}", e))
    }
}
