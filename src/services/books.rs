//! Book catalog service

use crate::{
    client::{ApiClient, ApiResult},
    models::{Book, DataEnvelope, NewBook},
    session::Session,
};

#[derive(Clone)]
pub struct BooksService {
    client: ApiClient,
}

impl BooksService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// List every book in the catalog
    pub async fn get_all(&self, session: &Session) -> ApiResult<Vec<Book>> {
        self.client.get(session, "/api/books").await
    }

    pub async fn get_by_id(&self, session: &Session, id: &str) -> ApiResult<Book> {
        self.client
            .get::<DataEnvelope<Book>>(session, &format!("/api/books/{}", id))
            .await
            .map(|envelope| envelope.data)
            .inspect_err(|e| tracing::warn!("Error fetching book {}: {}", id, e))
    }

    pub async fn create(&self, session: &Session, book: &NewBook) -> ApiResult<Book> {
        self.client.post(session, "/api/books", book).await
    }

    pub async fn update(&self, session: &Session, id: &str, book: &NewBook) -> ApiResult<Book> {
        self.client
            .put(session, &format!("/api/books/update/{}", id), book)
            .await
    }

    pub async fn delete(&self, session: &Session, id: &str) -> ApiResult<()> {
        self.client
            .delete(session, &format!("/api/books/delete/{}", id))
            .await
    }
}
