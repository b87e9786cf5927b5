//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, books, dashboard, health, lending, overdue, readers};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Console",
        version = "0.3.0",
        description = "Administrative console for a library and book club, backed by the remote library API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    paths(
        // Health
        health::health_check,
        // Auth
        auth::sign_in_page,
        auth::sign_in,
        auth::sign_up,
        auth::password_strength,
        auth::sign_out,
        // Dashboard
        dashboard::dashboard_home,
        // Readers
        readers::list_readers,
        readers::get_reader,
        readers::create_reader,
        readers::update_reader,
        readers::delete_reader,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::upload_cover,
        // Lending
        lending::lending_page,
        lending::lend_book,
        lending::update_status,
        // Overdue
        overdue::overdue_page,
        overdue::notify_reader,
        overdue::notify_all,
    ),
    components(
        schemas(
            // Auth
            auth::SignInPage,
            auth::SignInRequest,
            auth::SignUpRequest,
            auth::PasswordStrengthRequest,
            auth::PasswordStrength,
            // Dashboard
            dashboard::DashboardPage,
            // Readers
            readers::ReadersPage,
            crate::models::Reader,
            crate::models::NewReader,
            // Books
            books::BooksPage,
            books::CoverUploadResponse,
            crate::models::Book,
            crate::models::NewBook,
            // Lending
            lending::LendingPage,
            lending::LendingRow,
            lending::LendingStats,
            lending::LendRequest,
            lending::UpdateStatusRequest,
            crate::models::LendingStatus,
            crate::models::LendingRecord,
            crate::models::LendingPopulated,
            crate::models::BookSummary,
            crate::models::ReaderSummary,
            crate::overdue::AnnotatedLending,
            crate::overdue::OverdueBand,
            // Overdue
            overdue::OverduePage,
            overdue::NotificationResponse,
            crate::overdue::OverdueSummary,
            crate::overdue::OverdueRecord,
            crate::overdue::OverdueBook,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Sign-in, sign-up and sign-out"),
        (name = "dashboard", description = "Library overview"),
        (name = "readers", description = "Reader management"),
        (name = "books", description = "Book catalog management"),
        (name = "lending", description = "Lending and returns"),
        (name = "overdue", description = "Overdue lendings and reader notifications")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
