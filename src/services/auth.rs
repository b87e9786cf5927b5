//! Sign-in against the remote API

use serde::Serialize;

use crate::{
    client::{ApiClient, ApiResult},
    session::{Session, TokenPair},
};

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Exchange credentials for a token pair. Sent without any session.
    pub async fn login(&self, email: &str, password: &str) -> ApiResult<TokenPair> {
        self.client
            .post(
                &Session::anonymous(),
                "/api/users/login",
                &Credentials { email, password },
            )
            .await
    }
}
