use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use super::{repo_types::User, services::authenticate};
use crate::{config::Tenancy, error::AppError, state::AppState};

/// Extracts and validates the bearer token, returning the resolved user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        authenticate(state, header).await.map(AuthUser)
    }
}

/// Who is acting on CV routes, according to the configured tenancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requester {
    /// Global tenancy: no identity, no ownership filter.
    Anyone,
    Owner(Uuid),
}

impl Requester {
    /// Owner filter to hand to the CV store.
    pub fn owner(&self) -> Option<Uuid> {
        match self {
            Requester::Anyone => None,
            Requester::Owner(id) => Some(*id),
        }
    }
}

#[async_trait]
impl FromRequestParts<AppState> for Requester {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match state.config.tenancy {
            Tenancy::Global => Ok(Requester::Anyone),
            Tenancy::PerUser => {
                let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
                Ok(Requester::Owner(user.id))
            }
        }
    }
}
