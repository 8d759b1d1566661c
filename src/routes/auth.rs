//! Registration and login routes

use axum::{extract::State, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};

use crate::accounts::AccountService;
use crate::error::Result;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

/// OAuth2 password-flow form; `username` carries the email
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
}

impl TokenResponse {
    fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer",
        }
    }
}

/// Create the auth router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

/// POST /auth/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<TokenResponse>> {
    let token = AccountService::new(state.db(), state.hasher(), state.tokens())
        .register_and_issue(&request.email, &request.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}

/// POST /auth/login
async fn login(
    State(state): State<AppState>,
    Form(form): Form<LoginForm>,
) -> Result<Json<TokenResponse>> {
    let token = AccountService::new(state.db(), state.hasher(), state.tokens())
        .login(&form.username, &form.password)
        .await?;

    Ok(Json(TokenResponse::bearer(token)))
}
