//! Dashboard statistics service

use crate::{
    client::{ApiClient, ApiResult},
    models::DashboardData,
    session::Session,
};

#[derive(Clone)]
pub struct DashboardService {
    client: ApiClient,
}

impl DashboardService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Counters and recent lendings, recomputed by the server on every call
    pub async fn get_stats(&self, session: &Session) -> ApiResult<DashboardData> {
        self.client
            .get(session, "/api/dashboard/stats")
            .await
            .inspect_err(|e| tracing::error!("Error fetching dashboard data: {}", e))
    }
}
