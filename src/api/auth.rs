//! Sign-in, sign-up and sign-out pages

use axum::{extract::State, response::Redirect, Json};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::{
    error::{AppError, AppResult},
    AppState,
};

use super::session::{session_from_jar, write_session, SIGN_IN_PATH};

/// Landing page after a successful sign-in
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Serialize, ToSchema)]
pub struct SignInPage {
    /// A session cookie is already present
    pub signed_in: bool,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignInRequest {
    /// Forwarded as typed; the remote API decides what a valid login is
    #[validate(length(min = 1, message = "Please enter your email"))]
    pub email: String,
    #[validate(length(min = 1, message = "Please enter your password"))]
    pub password: String,
}

/// Admin account registration form
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "passwords_match", skip_on_field_errors = false))]
pub struct SignUpRequest {
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Please fill in all fields"))]
    pub last_name: String,
    #[validate(email(message = "Please enter a valid email address"))]
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default)]
    pub agree_to_terms: bool,
}

fn passwords_match(form: &SignUpRequest) -> Result<(), ValidationError> {
    if form.password == form.confirm_password {
        Ok(())
    } else {
        let mut error = ValidationError::new("password_mismatch");
        error.message = Some("Passwords don't match!".into());
        Err(error)
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct PasswordStrengthRequest {
    pub password: String,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct PasswordStrength {
    /// 0 to 4
    pub score: u8,
    pub label: String,
}

impl PasswordStrength {
    /// One point each for length >= 8, an uppercase letter, a digit and a symbol
    pub fn of(password: &str) -> Self {
        let checks = [
            password.chars().count() >= 8,
            password.chars().any(|c| c.is_ascii_uppercase()),
            password.chars().any(|c| c.is_ascii_digit()),
            password.chars().any(|c| !c.is_ascii_alphanumeric()),
        ];
        let score = checks.iter().filter(|ok| **ok).count() as u8;

        let label = match score {
            0 | 1 => "Weak",
            2 => "Fair",
            3 => "Good",
            _ => "Strong",
        };

        Self {
            score,
            label: label.to_string(),
        }
    }
}

/// Root of the console
pub async fn index() -> Redirect {
    Redirect::to(SIGN_IN_PATH)
}

/// Sign-in page
#[utoipa::path(
    get,
    path = "/signin",
    tag = "auth",
    responses(
        (status = 200, description = "Sign-in page", body = SignInPage)
    )
)]
pub async fn sign_in_page(jar: CookieJar) -> Json<SignInPage> {
    Json(SignInPage {
        signed_in: session_from_jar(&jar).is_authenticated(),
    })
}

/// Sign in with the remote API and store the issued tokens in cookies
#[utoipa::path(
    post,
    path = "/signin",
    tag = "auth",
    request_body = SignInRequest,
    responses(
        (status = 303, description = "Signed in, redirect to the dashboard"),
        (status = 400, description = "Missing or malformed credentials", body = crate::error::ErrorResponse),
        (status = 401, description = "Login failed", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_in(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(request): Json<SignInRequest>,
) -> AppResult<(CookieJar, Redirect)> {
    request.validate()?;

    let tokens = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await
        .map_err(|e| {
            tracing::error!("Login error: {}", e);
            AppError::Authentication("Login failed. Please check your credentials.".to_string())
        })?;

    let mut session = session_from_jar(&jar);
    session.refresh(tokens);
    tracing::info!("Signed in {}", request.email);

    let jar = write_session(jar, &session, &state.config.session);
    Ok((jar, Redirect::to(DASHBOARD_PATH)))
}

/// Register an admin account (checked locally, no remote call)
#[utoipa::path(
    post,
    path = "/signup",
    tag = "auth",
    request_body = SignUpRequest,
    responses(
        (status = 303, description = "Registered, redirect to sign-in"),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse)
    )
)]
pub async fn sign_up(Json(request): Json<SignUpRequest>) -> AppResult<Redirect> {
    request.validate()?;

    if !request.agree_to_terms {
        return Err(AppError::Validation(
            "Please agree to the terms and conditions".to_string(),
        ));
    }

    Ok(Redirect::to(SIGN_IN_PATH))
}

/// Password strength meter of the sign-up form
#[utoipa::path(
    post,
    path = "/signup/password-strength",
    tag = "auth",
    request_body = PasswordStrengthRequest,
    responses(
        (status = 200, description = "Strength score", body = PasswordStrength)
    )
)]
pub async fn password_strength(Json(request): Json<PasswordStrengthRequest>) -> Json<PasswordStrength> {
    Json(PasswordStrength::of(&request.password))
}

/// Drop the session cookies
#[utoipa::path(
    post,
    path = "/signout",
    tag = "auth",
    responses(
        (status = 303, description = "Signed out, redirect to sign-in")
    )
)]
pub async fn sign_out(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut session = session_from_jar(&jar);
    session.clear();

    let jar = write_session(jar, &session, &state.config.session);
    (jar, Redirect::to(SIGN_IN_PATH))
}
