//! Console endpoints: one module per page of the console

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod health;
pub mod inflight;
pub mod lending;
pub mod openapi;
pub mod overdue;
pub mod readers;
pub mod session;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use serde::Deserialize;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::IntoParams;

use crate::{error::AppError, AppState};

/// Free-text search shared by the list pages
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct SearchQuery {
    /// Filter applied to the list
    pub search: Option<String>,
}

impl SearchQuery {
    /// Trimmed search term, `None` when blank
    pub fn term(&self) -> Option<&str> {
        self.search.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Deletes must be confirmed explicitly
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct DeleteParams {
    /// Must be `true` for the delete to be sent
    pub confirm: Option<bool>,
}

impl DeleteParams {
    pub fn require_confirmation(&self, what: &str) -> Result<(), AppError> {
        if self.confirm.unwrap_or(false) {
            Ok(())
        } else {
            Err(AppError::BadRequest(format!(
                "Are you sure you want to delete this {}? Repeat with confirm=true",
                what
            )))
        }
    }
}

/// Create the console router with all routes
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = state.config.api.max_upload_bytes;

    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/", get(auth::index))
        .route("/signin", get(auth::sign_in_page).post(auth::sign_in))
        .route("/signup", post(auth::sign_up))
        .route("/signup/password-strength", post(auth::password_strength))
        .route("/signout", post(auth::sign_out));

    let protected = Router::new()
        .route("/dashboard", get(dashboard::dashboard_home))
        // Readers
        .route("/dashboard/readers", get(readers::list_readers).post(readers::create_reader))
        .route(
            "/dashboard/readers/:id",
            get(readers::get_reader)
                .put(readers::update_reader)
                .delete(readers::delete_reader),
        )
        // Books
        .route("/dashboard/books", get(books::list_books).post(books::create_book))
        .route(
            "/dashboard/books/cover",
            post(books::upload_cover).layer(DefaultBodyLimit::max(upload_limit)),
        )
        .route(
            "/dashboard/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        // Lending
        .route("/dashboard/lending", get(lending::lending_page).post(lending::lend_book))
        .route("/dashboard/lending/:id/status", put(lending::update_status))
        // Overdue
        .route("/dashboard/overdue", get(overdue::overdue_page))
        .route("/dashboard/overdue/notify/:reader_id", post(overdue::notify_reader))
        .route("/dashboard/overdue/notify-all", post(overdue::notify_all))
        .route_layer(middleware::from_fn(session::require_session));

    Router::new()
        .merge(public)
        .merge(protected)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
}
