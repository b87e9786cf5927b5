//! Resource services backed by the remote library API

pub mod auth;
pub mod books;
pub mod dashboard;
pub mod lendings;
pub mod readers;
pub mod uploads;

use crate::client::ApiClient;

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub books: books::BooksService,
    pub readers: readers::ReadersService,
    pub lendings: lendings::LendingsService,
    pub dashboard: dashboard::DashboardService,
    pub uploads: uploads::UploadsService,
}

impl Services {
    /// Create all services sharing one API client
    pub fn new(client: ApiClient) -> Self {
        Self {
            auth: auth::AuthService::new(client.clone()),
            books: books::BooksService::new(client.clone()),
            readers: readers::ReadersService::new(client.clone()),
            lendings: lendings::LendingsService::new(client.clone()),
            dashboard: dashboard::DashboardService::new(client.clone()),
            uploads: uploads::UploadsService::new(client),
        }
    }
}
