use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{error, warn};

use super::jwt::JwtKeys;
use crate::{error::AppError, state::AppState, users::repo_types::User};

/// Authenticated caller, loaded from the store by the token's subject.
pub struct CurrentUser(pub User);

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
pub(crate) fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.split_once(' ')?;
    let token = token.trim();
    if scheme.eq_ignore_ascii_case("bearer") && !token.is_empty() {
        Some(token)
    } else {
        None
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::unauthorized("Not authenticated"))?;

        let token = bearer_token(auth).ok_or_else(|| {
            warn!("authorization header without bearer token");
            AppError::unauthorized("Invalid authentication scheme")
        })?;

        let keys = JwtKeys::from_ref(state);
        let claims = keys.verify(token).map_err(|e| {
            warn!(error = %e, "token rejected");
            AppError::unauthorized("Could not validate credentials")
        })?;

        let user = match state.users.find_by_id(claims.sub).await {
            Ok(Some(u)) => u,
            Ok(None) => {
                warn!(user_id = %claims.sub, "token subject no longer exists");
                return Err(AppError::unauthorized("Could not validate credentials"));
            }
            Err(e) => {
                error!(error = %e, user_id = %claims.sub, "user lookup failed");
                return Err(e.into());
            }
        };

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_token_parsing() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("BEARER  abc "), Some("abc"));
        assert_eq!(bearer_token("Basic dXNlcjpwYXNz"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("Bearer"), None);
    }
}
