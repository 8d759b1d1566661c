//! Bearer-token identity resolution
//!
//! Handlers that take a [`CurrentAccount`] argument only run for requests
//! carrying `Authorization: Bearer <token>` whose token verifies and whose
//! account still exists. Everything else is rejected with the same 401.

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crate::db::{Account, AccountRepository};
use crate::error::AppError;
use crate::state::AppState;

/// The account acting on this request. Resolved fresh for every request.
#[derive(Debug, Clone)]
pub struct CurrentAccount(pub Account);

#[async_trait]
impl FromRequestParts<AppState> for CurrentAccount {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts).ok_or(AppError::Unauthorized)?;
        let account = resolve(state, token).await?;
        Ok(CurrentAccount(account))
    }
}

/// Resolve a raw token to an existing account
pub async fn resolve(state: &AppState, token: &str) -> Result<Account, AppError> {
    let account_id = state.tokens().verify(token)?;

    // A valid token for a deleted account is no better than a forged one
    let account = AccountRepository::new(state.db())
        .get(account_id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    tracing::debug!(account_id = account.id, "Resolved bearer token");
    Ok(account)
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    fn parts_with(value: Option<&str>) -> Parts {
        let mut builder = Request::builder().uri("/notes/");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    #[test]
    fn test_bearer_token_parsing() {
        assert_eq!(bearer_token(&parts_with(Some("Bearer abc.def"))), Some("abc.def"));
        assert_eq!(bearer_token(&parts_with(Some("bearer abc"))), Some("abc"));
        assert_eq!(bearer_token(&parts_with(Some("Basic dXNlcg=="))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer "))), None);
        assert_eq!(bearer_token(&parts_with(Some("Bearer"))), None);
        assert_eq!(bearer_token(&parts_with(None)), None);
    }
}
