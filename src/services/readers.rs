//! Reader (member) service

use crate::{
    client::{ApiClient, ApiResult},
    models::{DataEnvelope, NewReader, Reader},
    session::Session,
};

#[derive(Clone)]
pub struct ReadersService {
    client: ApiClient,
}

impl ReadersService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub async fn get_all(&self, session: &Session) -> ApiResult<Vec<Reader>> {
        self.client.get(session, "/api/readers").await
    }

    pub async fn get_by_id(&self, session: &Session, id: &str) -> ApiResult<Reader> {
        self.client
            .get::<DataEnvelope<Reader>>(session, &format!("/api/readers/{}", id))
            .await
            .map(|envelope| envelope.data)
            .inspect_err(|e| tracing::warn!("Error fetching reader {}: {}", id, e))
    }

    pub async fn create(&self, session: &Session, reader: &NewReader) -> ApiResult<Reader> {
        self.client.post(session, "/api/readers", reader).await
    }

    pub async fn update(&self, session: &Session, id: &str, reader: &NewReader) -> ApiResult<Reader> {
        self.client
            .put(session, &format!("/api/readers/update/{}", id), reader)
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> ApiResult<()> {
        self.client
            .delete(session, &format!("/api/readers/delete/{}", id))
            .await
    }
}
