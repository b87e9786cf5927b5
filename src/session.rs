//! Console session: the token pair issued by the remote API at sign-in

use serde::{Deserialize, Serialize};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Cookie holding the access token
pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
/// Cookie holding the refresh token
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

/// Tokens returned by `POST /api/users/login`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Session passed explicitly to every remote call.
///
/// Built per request from the session cookies. An empty session is used for
/// the calls that never carry credentials (login, cover upload).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    access_token: Option<String>,
    refresh_token: Option<String>,
}

impl Session {
    pub fn new(access_token: Option<String>, refresh_token: Option<String>) -> Self {
        Self {
            access_token: access_token.filter(|t| !t.is_empty()),
            refresh_token: refresh_token.filter(|t| !t.is_empty()),
        }
    }

    /// Session without any credentials
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn refresh_token(&self) -> Option<&str> {
        self.refresh_token.as_deref()
    }

    /// Either token is enough to enter the protected pages; expiry is not checked.
    pub fn is_authenticated(&self) -> bool {
        self.access_token.is_some() || self.refresh_token.is_some()
    }

    /// Value for the `Authorization` header, if an access token is held
    pub fn bearer(&self) -> Option<String> {
        self.access_token.as_ref().map(|t| format!("Bearer {}", t))
    }

    /// Replace both tokens with a freshly issued pair
    pub fn refresh(&mut self, tokens: TokenPair) {
        *self = Self::new(Some(tokens.access_token), Some(tokens.refresh_token));
    }

    pub fn clear(&mut self) {
        self.access_token = None;
        self.refresh_token = None;
    }

    /// Stable key identifying this session without keeping the token itself
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.access_token.hash(&mut hasher);
        self.refresh_token.hash(&mut hasher);
        hasher.finish()
    }
}

impl From<TokenPair> for Session {
    fn from(tokens: TokenPair) -> Self {
        let mut session = Session::anonymous();
        session.refresh(tokens);
        session
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_either_token_authenticates() {
        assert!(Session::new(Some("a".into()), None).is_authenticated());
        assert!(Session::new(None, Some("r".into())).is_authenticated());
        assert!(!Session::new(None, None).is_authenticated());
        assert!(!Session::new(Some(String::new()), Some(String::new())).is_authenticated());
    }

    #[test]
    fn test_bearer_uses_access_token_only() {
        let session = Session::new(None, Some("refresh".into()));
        assert_eq!(session.bearer(), None);

        let session = Session::new(Some("abc.def".into()), Some("refresh".into()));
        assert_eq!(session.bearer().as_deref(), Some("Bearer abc.def"));
    }

    #[test]
    fn test_refresh_and_clear() {
        let mut session = Session::anonymous();
        session.refresh(TokenPair {
            access_token: "new-access".into(),
            refresh_token: "new-refresh".into(),
        });
        assert_eq!(session.access_token(), Some("new-access"));
        assert_eq!(session.refresh_token(), Some("new-refresh"));

        session.clear();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_fingerprint_differs_per_token() {
        let a = Session::new(Some("one".into()), None);
        let b = Session::new(Some("two".into()), None);
        assert_eq!(a.fingerprint(), a.clone().fingerprint());
        assert_ne!(a.fingerprint(), b.fingerprint());
    }

    #[test]
    fn test_token_pair_wire_format() {
        let tokens: TokenPair =
            serde_json::from_str(r#"{"accessToken":"a","refreshToken":"r"}"#).unwrap();
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "r");
    }
}
