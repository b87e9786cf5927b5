//! Route guard and session cookies

use axum::{
    async_trait,
    extract::{FromRequestParts, Request},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::{
    config::SessionConfig,
    session::{Session, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE},
};

/// Where unauthenticated visitors are sent
pub const SIGN_IN_PATH: &str = "/signin";

/// Rejection for protected pages without a session
pub struct SignInRedirect;

impl IntoResponse for SignInRedirect {
    fn into_response(self) -> Response {
        Redirect::to(SIGN_IN_PATH).into_response()
    }
}

/// Read whatever session the cookies carry, possibly an empty one
pub fn session_from_jar(jar: &CookieJar) -> Session {
    Session::new(
        jar.get(ACCESS_TOKEN_COOKIE).map(|c| c.value().to_string()),
        jar.get(REFRESH_TOKEN_COOKIE).map(|c| c.value().to_string()),
    )
}

/// Mirror `session` into the cookie jar: held tokens are set, missing ones removed
pub fn write_session(jar: CookieJar, session: &Session, config: &SessionConfig) -> CookieJar {
    let jar = match session.access_token() {
        Some(token) => jar.add(token_cookie(
            ACCESS_TOKEN_COOKIE,
            token,
            config.access_token_days,
            config.secure_cookies,
        )),
        None => jar.remove(Cookie::build(ACCESS_TOKEN_COOKIE).path("/")),
    };

    match session.refresh_token() {
        Some(token) => jar.add(token_cookie(
            REFRESH_TOKEN_COOKIE,
            token,
            config.refresh_token_days,
            config.secure_cookies,
        )),
        None => jar.remove(Cookie::build(REFRESH_TOKEN_COOKIE).path("/")),
    }
}

fn token_cookie(name: &'static str, value: &str, days: i64, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value.to_string()))
        .path("/")
        .max_age(time::Duration::days(days))
        .same_site(SameSite::Lax)
        .http_only(true)
        .secure(secure)
        .build()
}

/// Protected handlers take a `Session`; without one they redirect to sign-in.
#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    S: Send + Sync,
{
    type Rejection = SignInRedirect;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = session_from_jar(&CookieJar::from_headers(&parts.headers));
        if session.is_authenticated() {
            Ok(session)
        } else {
            Err(SignInRedirect)
        }
    }
}

/// Middleware guarding the `/dashboard` subtree
pub async fn require_session(session: Option<Session>, request: Request, next: Next) -> Response {
    if session.is_none() {
        tracing::debug!("No session for {}, redirecting to sign-in", request.uri().path());
        return SignInRedirect.into_response();
    }
    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header, HeaderMap, HeaderValue};

    #[test]
    fn test_session_from_cookie_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::COOKIE,
            HeaderValue::from_static("accessToken=abc; theme=dark; refreshToken=def"),
        );

        let session = session_from_jar(&CookieJar::from_headers(&headers));
        assert_eq!(session.access_token(), Some("abc"));
        assert_eq!(session.refresh_token(), Some("def"));
    }

    #[test]
    fn test_write_session_sets_lifetimes() {
        let session = Session::new(Some("abc".into()), Some("def".into()));
        let jar = write_session(CookieJar::new(), &session, &SessionConfig::default());

        let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
        assert_eq!(access.value(), "abc");
        assert_eq!(access.max_age(), Some(time::Duration::days(1)));

        let refresh = jar.get(REFRESH_TOKEN_COOKIE).unwrap();
        assert_eq!(refresh.max_age(), Some(time::Duration::days(7)));
    }

    #[test]
    fn test_cleared_session_removes_cookies() {
        let mut session = Session::new(Some("abc".into()), Some("def".into()));
        let jar = write_session(CookieJar::new(), &session, &SessionConfig::default());

        session.clear();
        let jar = write_session(jar, &session, &SessionConfig::default());
        assert!(jar.get(ACCESS_TOKEN_COOKIE).is_none());
        assert!(jar.get(REFRESH_TOKEN_COOKIE).is_none());
    }
}
