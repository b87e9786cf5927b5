//! Overdue page and reader notifications

use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    overdue::{AnnotatedLending, OverdueSummary},
    session::Session,
    AppState,
};

#[derive(Serialize, ToSchema)]
pub struct OverduePage {
    pub summary: OverdueSummary,
    /// Open lendings past their due date, most overdue first
    pub lendings: Vec<AnnotatedLending>,
}

#[derive(Serialize, ToSchema)]
pub struct NotificationResponse {
    pub message: String,
}

/// Overdue lendings grouped by reader
#[utoipa::path(
    get,
    path = "/dashboard/overdue",
    tag = "overdue",
    responses(
        (status = 200, description = "Overdue page", body = OverduePage),
        (status = 303, description = "No session, redirect to sign-in")
    )
)]
pub async fn overdue_page(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<OverduePage>> {
    let lendings = state.services.lendings.get_all_populated(&session).await?;

    let now = Utc::now();
    let mut lendings: Vec<AnnotatedLending> = lendings
        .into_iter()
        .map(|lending| AnnotatedLending::new(lending, now))
        .filter(AnnotatedLending::is_overdue)
        .collect();
    lendings.sort_by(|a, b| b.days_overdue.cmp(&a.days_overdue));

    let summary = OverdueSummary::from_lendings(&lendings);

    Ok(Json(OverduePage { summary, lendings }))
}

/// E-mail one reader about their overdue books
#[utoipa::path(
    post,
    path = "/dashboard/overdue/notify/{reader_id}",
    tag = "overdue",
    params(("reader_id" = String, Path, description = "Reader ID")),
    responses(
        (status = 200, description = "Notification sent", body = NotificationResponse),
        (status = 502, description = "Remote API failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn notify_reader(
    State(state): State<AppState>,
    session: Session,
    Path(reader_id): Path<String>,
) -> AppResult<Json<NotificationResponse>> {
    let _permit = state.in_flight.begin(&session, format!("overdue.notify.{}", reader_id))?;

    state.services.lendings.notify_reader(&session, &reader_id).await?;
    tracing::info!("Overdue notification sent to reader {}", reader_id);

    Ok(Json(NotificationResponse {
        message: "Notification sent successfully.".to_string(),
    }))
}

/// E-mail every reader with overdue books
#[utoipa::path(
    post,
    path = "/dashboard/overdue/notify-all",
    tag = "overdue",
    responses(
        (status = 200, description = "Notifications sent", body = NotificationResponse),
        (status = 502, description = "Remote API failure", body = crate::error::ErrorResponse)
    )
)]
pub async fn notify_all(
    State(state): State<AppState>,
    session: Session,
) -> AppResult<Json<NotificationResponse>> {
    let _permit = state.in_flight.begin(&session, "overdue.notify-all")?;

    state.services.lendings.notify_all(&session).await?;
    tracing::info!("Overdue notifications sent to all readers");

    Ok(Json(NotificationResponse {
        message: "Notifications sent to all overdue readers successfully.".to_string(),
    }))
}
