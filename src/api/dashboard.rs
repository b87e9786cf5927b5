//! Dashboard home

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, overdue::AnnotatedLending, session::Session, AppState};

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPage {
    pub total_books: u64,
    pub total_readers: u64,
    pub total_lendings: u64,
    pub overdue_lendings: u64,
    pub recent_lendings: Vec<AnnotatedLending>,
}

/// Library counters and the most recent lendings
#[utoipa::path(
    get,
    path = "/dashboard",
    tag = "dashboard",
    responses(
        (status = 200, description = "Dashboard", body = DashboardPage),
        (status = 303, description = "No session, redirect to sign-in")
    )
)]
pub async fn dashboard_home(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<DashboardPage>> {
    let stats = state.services.dashboard.get_stats(&session).await?;

    let now = Utc::now();
    Ok(Json(DashboardPage {
        total_books: stats.total_books,
        total_readers: stats.total_readers,
        total_lendings: stats.total_lendings,
        overdue_lendings: stats.overdue_lendings,
        recent_lendings: stats
            .recent_lendings
            .into_iter()
            .map(|lending| AnnotatedLending::new(lending, now))
            .collect(),
    }))
}
