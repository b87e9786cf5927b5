//! Reader management page

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{NewReader, Reader},
    session::Session,
    AppState,
};

use super::{DeleteParams, SearchQuery};

#[derive(Serialize, ToSchema)]
pub struct ReadersPage {
    pub search: Option<String>,
    pub total: usize,
    pub readers: Vec<Reader>,
}

/// List readers, filtered by name or email
#[utoipa::path(
    get,
    path = "/dashboard/readers",
    tag = "readers",
    params(SearchQuery),
    responses(
        (status = 200, description = "Reader table", body = ReadersPage),
        (status = 303, description = "No session, redirect to sign-in")
    )
)]
pub async fn list_readers(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<ReadersPage>> {
    let readers = state.services.readers.get_all(&session).await?;
    let total = readers.len();

    let readers = match query.term() {
        Some(term) => readers.into_iter().filter(|r| r.matches(term)).collect(),
        None => readers,
    };

    Ok(Json(ReadersPage {
        search: query.search,
        total,
        readers,
    }))
}

#[utoipa::path(
    get,
    path = "/dashboard/readers/{id}",
    tag = "readers",
    params(("id" = String, Path, description = "Reader ID")),
    responses(
        (status = 200, description = "Reader", body = Reader),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_reader(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<Reader>> {
    let reader = state.services.readers.get_by_id(&session, &id).await?;
    Ok(Json(reader))
}

/// Register a reader
#[utoipa::path(
    post,
    path = "/dashboard/readers",
    tag = "readers",
    request_body = NewReader,
    responses(
        (status = 201, description = "Reader created", body = Reader),
        (status = 409, description = "Same form already submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_reader(
    State(state): State<AppState>,
    session: Session,
    Json(reader): Json<NewReader>,
) -> AppResult<(StatusCode, Json<Reader>)> {
    let _permit = state.in_flight.begin(&session, "readers.create")?;

    let created = state.services.readers.create(&session, &reader).await?;
    tracing::info!("Registered reader {} ({})", created.id, created.email);
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    put,
    path = "/dashboard/readers/{id}",
    tag = "readers",
    params(("id" = String, Path, description = "Reader ID")),
    request_body = NewReader,
    responses(
        (status = 200, description = "Reader updated", body = Reader),
        (status = 404, description = "Reader not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_reader(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(reader): Json<NewReader>,
) -> AppResult<Json<Reader>> {
    let _permit = state.in_flight.begin(&session, format!("readers.update.{}", id))?;

    let updated = state.services.readers.update(&session, &id, &reader).await?;
    Ok(Json(updated))
}

#[utoipa::path(
    delete,
    path = "/dashboard/readers/{id}",
    tag = "readers",
    params(
        ("id" = String, Path, description = "Reader ID"),
        DeleteParams
    ),
    responses(
        (status = 204, description = "Reader deleted"),
        (status = 400, description = "Deletion not confirmed", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_reader(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    params.require_confirmation("reader")?;
    let _permit = state.in_flight.begin(&session, format!("readers.delete.{}", id))?;

    state.services.readers.delete(&session, &id).await?;
    tracing::info!("Deleted reader {}", id);
    Ok(StatusCode::NO_CONTENT)
}
