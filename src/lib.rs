//! Library Console
//!
//! Administrative console for a small library or book club. Every page is
//! backed by the remote library API: the console keeps the admin session in
//! cookies, forwards its bearer token and derives overdue figures locally.

use std::sync::Arc;

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod overdue;
pub mod services;
pub mod session;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
    /// Submissions currently waiting on the remote API
    pub in_flight: api::inflight::InFlight,
}

impl AppState {
    /// Build the state and its API client from configuration
    pub fn new(config: AppConfig) -> client::ApiResult<Self> {
        let client = client::ApiClient::new(&config.api)?;

        Ok(Self {
            config: Arc::new(config),
            services: Arc::new(services::Services::new(client)),
            in_flight: api::inflight::InFlight::new(),
        })
    }
}
