//! Book management page

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::{multipart::MultipartError, Multipart};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::{Book, NewBook},
    session::Session,
    AppState,
};

use super::{DeleteParams, SearchQuery};

/// Book table with the active search
#[derive(Serialize, ToSchema)]
pub struct BooksPage {
    pub search: Option<String>,
    /// Number of books in the catalog before filtering
    pub total: usize,
    pub books: Vec<Book>,
}

#[derive(Serialize, ToSchema)]
pub struct CoverUploadResponse {
    pub url: String,
}

fn multipart_error(error: MultipartError) -> AppError {
    if error.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(error.body_text())
    } else {
        AppError::BadRequest(error.body_text())
    }
}

/// List books, filtered by title, author or ISBN
#[utoipa::path(
    get,
    path = "/dashboard/books",
    tag = "books",
    params(SearchQuery),
    responses(
        (status = 200, description = "Book table", body = BooksPage),
        (status = 303, description = "No session, redirect to sign-in")
    )
)]
pub async fn list_books(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> AppResult<Json<BooksPage>> {
    let books = state.services.books.get_all(&session).await?;
    let total = books.len();

    let books = match query.term() {
        Some(term) => books.into_iter().filter(|b| b.matches(term)).collect(),
        None => books,
    };

    Ok(Json(BooksPage {
        search: query.search,
        total,
        books,
    }))
}

/// Book details
#[utoipa::path(
    get,
    path = "/dashboard/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_book(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
) -> AppResult<Json<Book>> {
    let book = state.services.books.get_by_id(&session, &id).await?;
    Ok(Json(book))
}

/// Add a book. Fields are forwarded as entered.
#[utoipa::path(
    post,
    path = "/dashboard/books",
    tag = "books",
    request_body = NewBook,
    responses(
        (status = 201, description = "Book created", body = Book),
        (status = 409, description = "Same form already submitted", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_book(
    State(state): State<AppState>,
    session: Session,
    Json(book): Json<NewBook>,
) -> AppResult<(StatusCode, Json<Book>)> {
    let _permit = state.in_flight.begin(&session, "books.create")?;

    let created = state.services.books.create(&session, &book).await?;
    tracing::info!("Created book {} ({})", created.id, created.title);
    Ok((StatusCode::CREATED, Json(created)))
}

/// Update a book
#[utoipa::path(
    put,
    path = "/dashboard/books/{id}",
    tag = "books",
    params(("id" = String, Path, description = "Book ID")),
    request_body = NewBook,
    responses(
        (status = 200, description = "Book updated", body = Book),
        (status = 404, description = "Book not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_book(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Json(book): Json<NewBook>,
) -> AppResult<Json<Book>> {
    let _permit = state.in_flight.begin(&session, format!("books.update.{}", id))?;

    let updated = state.services.books.update(&session, &id, &book).await?;
    Ok(Json(updated))
}

/// Delete a book once confirmed
#[utoipa::path(
    delete,
    path = "/dashboard/books/{id}",
    tag = "books",
    params(
        ("id" = String, Path, description = "Book ID"),
        DeleteParams
    ),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 400, description = "Deletion not confirmed", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_book(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<String>,
    Query(params): Query<DeleteParams>,
) -> AppResult<StatusCode> {
    params.require_confirmation("book")?;
    let _permit = state.in_flight.begin(&session, format!("books.delete.{}", id))?;

    state.services.books.delete(&session, &id).await?;
    tracing::info!("Deleted book {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// Upload a cover image; the returned URL goes into the book's `coverImage`
#[utoipa::path(
    post,
    path = "/dashboard/books/cover",
    tag = "books",
    responses(
        (status = 200, description = "Image stored", body = CoverUploadResponse),
        (status = 400, description = "No file in the form", body = crate::error::ErrorResponse),
        (status = 413, description = "Image larger than the upload limit", body = crate::error::ErrorResponse),
        (status = 502, description = "Upload rejected upstream", body = crate::error::ErrorResponse)
    )
)]
pub async fn upload_cover(
    State(state): State<AppState>,
    session: Session,
    mut multipart: Multipart,
) -> AppResult<Json<CoverUploadResponse>> {
    let _permit = state.in_flight.begin(&session, "books.cover")?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(multipart_error)?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().unwrap_or("cover").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(multipart_error)?;

        let url = state
            .services
            .uploads
            .upload_cover(&file_name, bytes.to_vec(), content_type.as_deref())
            .await?;
        return Ok(Json(CoverUploadResponse { url }));
    }

    Err(AppError::BadRequest("No file provided".to_string()))
}
