use axum::{
    extract::{FromRef, State},
    routing::post,
    Router,
};
use tracing::{error, info, instrument, warn};

use crate::{
    auth::{
        dto::{LoginRequest, LogoutResponse, TokenResponse},
        jwt::JwtKeys,
        password::{dummy_hash, verify_password_async},
    },
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
};

const BAD_CREDENTIALS: &str = "Incorrect username or password";

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/", post(login))
        .route("/logout/", post(logout))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> AppResult<Json<TokenResponse>> {
    let username = payload.username.trim();

    let user = match state.users.find_by_username(username).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            // Same Argon2 cost as a real check so response time does not reveal the username.
            verify_password_async(payload.password, dummy_hash().to_string()).await?;
            warn!(username = %username, "login unknown username");
            return Err(AppError::unauthorized(BAD_CREDENTIALS));
        }
        Err(e) => {
            error!(error = %e, "find_by_username failed");
            return Err(e.into());
        }
    };

    let ok = verify_password_async(payload.password, user.password_hash.clone()).await?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::unauthorized(BAD_CREDENTIALS));
    }

    let keys = JwtKeys::from_ref(&state);
    let access_token = keys.sign(user.id).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        AppError::Internal(e)
    })?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".into(),
        id: user.id,
        username: user.username,
        email: user.email,
    }))
}

/// Tokens are stateless, so there is nothing to invalidate server-side.
#[instrument]
pub async fn logout() -> Json<LogoutResponse> {
    Json(LogoutResponse {
        detail: "logged out".into(),
    })
}
