//! Dashboard aggregate returned by `GET /api/dashboard/stats`

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::lending::LendingPopulated;

/// Counters recomputed by the server on every fetch
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardData {
    #[serde(default)]
    pub total_books: u64,
    #[serde(default)]
    pub total_readers: u64,
    #[serde(default)]
    pub total_lendings: u64,
    #[serde(default)]
    pub overdue_lendings: u64,
    #[serde(default)]
    pub recent_lendings: Vec<LendingPopulated>,
}
