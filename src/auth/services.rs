use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use super::dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};
use super::repo_types::User;
use crate::error::AppError;
use crate::state::AppState;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create an account and return a token for it.
pub async fn register(state: &AppState, req: RegisterRequest) -> Result<AuthResponse, AppError> {
    let name = req.name.trim().to_string();
    let email = normalize_email(&req.email);

    if name.is_empty() || email.is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "Name, email and password are required".into(),
        ));
    }
    if !is_valid_email(&email) {
        warn!(email = %email, "invalid email");
        return Err(AppError::Validation("Invalid email".into()));
    }

    if state.users.find_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::Validation("User already exists with this email".into()));
    }

    let hash = state.credentials.hash_password(&req.password)?;
    let user = User::new(name, email, hash);
    state.users.create(&user).await?;

    let token = state.credentials.issue_token(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok(AuthResponse {
        message: "User registered successfully",
        token,
        user: PublicUser::from(&user),
    })
}

/// Unknown email and wrong password produce the same error.
pub async fn login(state: &AppState, req: LoginRequest) -> Result<AuthResponse, AppError> {
    let email = normalize_email(&req.email);

    let Some(user) = state.users.find_by_email(&email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(AppError::invalid_credentials());
    };

    if !state.credentials.verify_password(&req.password, &user.password_hash)? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::invalid_credentials());
    }

    let token = state.credentials.issue_token(user.id)?;
    info!(user_id = %user.id, email = %user.email, "user logged in");
    Ok(AuthResponse {
        message: "Login successful",
        token,
        user: PublicUser::from(&user),
    })
}

/// Resolve an `Authorization` header value to a live user.
pub async fn authenticate(state: &AppState, header: Option<&str>) -> Result<User, AppError> {
    let token = header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(AppError::unauthenticated)?;

    let user_id = state.credentials.verify_token(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        AppError::unauthenticated()
    })?;

    match state.users.find_by_id(user_id).await {
        Ok(Some(user)) => Ok(user),
        Ok(None) => {
            warn!(user_id = %user_id, "token for unknown user");
            Err(AppError::unauthenticated())
        }
        Err(e) => {
            warn!(error = %e, user_id = %user_id, "user lookup failed during auth");
            Err(AppError::unauthenticated())
        }
    }
}
