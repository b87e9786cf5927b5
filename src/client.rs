//! HTTP client for the remote library API
//!
//! Every call goes through [`ApiClient`], which injects the session's bearer
//! token, sets the JSON content type and turns non-2xx responses into
//! [`ApiError`]s. Error bodies are never parsed; only the status is reported.

use std::time::Duration;

use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Method, Request, Response, StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use thiserror::Error;

use crate::{config::ApiConfig, session::Session};

/// Failure talking to the remote API
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API error: {}", status_text(.0))]
    Unauthorized(StatusCode),

    #[error("API error: {}", status_text(&StatusCode::NOT_FOUND))]
    NotFound,

    #[error("API error: {}", status_text(.0))]
    Status(StatusCode),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Invalid response body: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Invalid request: {0}")]
    Request(String),

    #[error("Upload failed: {0}")]
    Upload(String),
}

impl ApiError {
    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => ApiError::Unauthorized(status),
            StatusCode::NOT_FOUND => ApiError::NotFound,
            _ => ApiError::Status(status),
        }
    }
}

fn status_text(status: &StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

/// Result type alias for remote API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(config: &ApiConfig) -> ApiResult<Self> {
        let mut builder = reqwest::Client::builder();
        if config.timeout_seconds > 0 {
            builder = builder.timeout(Duration::from_secs(config.timeout_seconds));
        }
        let http = builder.build().map_err(ApiError::Transport)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Absolute URL for an API path such as `/api/books`
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Build a request without sending it.
    ///
    /// Header precedence: the JSON content type first, then `headers`, then the
    /// session's `Authorization`, which callers cannot override.
    pub fn build_request(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        headers: HeaderMap,
        body: Option<Vec<u8>>,
    ) -> ApiResult<Request> {
        let mut merged = HeaderMap::new();
        merged.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        merged.extend(headers);

        if let Some(bearer) = session.bearer() {
            let value = HeaderValue::from_str(&bearer)
                .map_err(|e| ApiError::Request(format!("invalid access token: {}", e)))?;
            merged.insert(AUTHORIZATION, value);
        }

        let mut builder = self.http.request(method, self.url(path)).headers(merged);
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder
            .build()
            .map_err(|e| ApiError::Request(e.to_string()))
    }

    /// Send a built request; non-2xx statuses become errors
    pub async fn execute(&self, request: Request) -> ApiResult<Response> {
        let method = request.method().clone();
        let url = request.url().clone();

        let response = self
            .http
            .execute(request)
            .await
            .map_err(ApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!("{} {} -> {}", method, url.path(), status);
            return Err(ApiError::from_status(status));
        }

        Ok(response)
    }

    /// Issue a request and decode the JSON body
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<T> {
        let request = self.build_request(session, method, path, HeaderMap::new(), body)?;
        let response = self.execute(request).await?;
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    /// Issue a request whose body is ignored on success
    pub async fn send_empty(
        &self,
        session: &Session,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
    ) -> ApiResult<()> {
        let request = self.build_request(session, method, path, HeaderMap::new(), body)?;
        self.execute(request).await?;
        Ok(())
    }

    pub async fn get<T: DeserializeOwned>(&self, session: &Session, path: &str) -> ApiResult<T> {
        self.send_json(session, Method::GET, path, None).await
    }

    pub async fn post<B, T>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(session, Method::POST, path, Some(encode(body)?))
            .await
    }

    pub async fn put<B, T>(&self, session: &Session, path: &str, body: &B) -> ApiResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.send_json(session, Method::PUT, path, Some(encode(body)?))
            .await
    }

    pub async fn delete(&self, session: &Session, path: &str) -> ApiResult<()> {
        self.send_empty(session, Method::DELETE, path, None).await
    }

    /// Multipart upload; never authenticated and never JSON-typed
    pub async fn upload(&self, path: &str, form: reqwest::multipart::Form) -> ApiResult<Response> {
        self.http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .map_err(ApiError::Transport)
    }
}

fn encode<B: Serialize + ?Sized>(body: &B) -> ApiResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| ApiError::Request(e.to_string()))
}
