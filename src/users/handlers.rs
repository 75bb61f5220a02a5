use axum::{
    extract::State,
    http::StatusCode,
    routing::{post, put},
    Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{
        ChangePasswordRequest, RegisterRequest, UpdatePreferencesRequest, UpdateProfileRequest,
        UserRead,
    },
    repo_types::{NewUser, PreferencesUpdate, ProfileUpdate},
    services::{
        non_blank, normalize_email, validate_email, validate_optional_len, validate_password,
        validate_username, MAX_NAME_LEN, MAX_PHONE_LEN,
    },
};
use crate::{
    auth::{
        extractors::CurrentUser,
        password::{hash_password_async, verify_password_async},
    },
    error::{AppError, AppResult},
    extract::Json,
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users/", post(register))
        .route("/users/me", put(update_profile).get(get_me))
        .route("/users/me/preferences", put(update_preferences))
        .route("/users/me/password", put(change_password))
}

fn validate_profile_fields(
    first_name: Option<&str>,
    last_name: Option<&str>,
    phone_number: Option<&str>,
) -> Result<(), AppError> {
    validate_optional_len("first_name", first_name, MAX_NAME_LEN)?;
    validate_optional_len("last_name", last_name, MAX_NAME_LEN)?;
    validate_optional_len("phone_number", phone_number, MAX_PHONE_LEN)
}

/// Value being written by a tri-state profile field, if any.
fn new_value(field: &Option<Option<String>>) -> Option<&str> {
    field.as_ref().and_then(|v| v.as_deref())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<UserRead>)> {
    let username = payload.username.trim().to_string();
    let email = normalize_email(&payload.email);

    validate_username(&username)?;
    validate_email(&email)?;
    validate_password(&payload.password)?;

    let first_name = non_blank(payload.first_name);
    let last_name = non_blank(payload.last_name);
    let phone_number = non_blank(payload.phone_number);
    validate_profile_fields(
        first_name.as_deref(),
        last_name.as_deref(),
        phone_number.as_deref(),
    )?;

    let password_hash = hash_password_async(payload.password).await?;

    let user = state
        .users
        .create(NewUser {
            username,
            email,
            password_hash,
            first_name,
            last_name,
            phone_number,
        })
        .await
        .map_err(|e| {
            warn!(error = %e, "user registration rejected");
            AppError::from(e)
        })?;

    info!(user_id = %user.id, "user registered");
    Ok((StatusCode::CREATED, Json(UserRead::from(user))))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn get_me(CurrentUser(user): CurrentUser) -> Json<UserRead> {
    Json(UserRead::from(user))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> AppResult<Json<UserRead>> {
    let email = match payload.email {
        Some(raw) => {
            let email = normalize_email(&raw);
            validate_email(&email)?;
            Some(email)
        }
        None => None,
    };

    // Blank strings clear the field the same way `null` does.
    let update = ProfileUpdate {
        email,
        first_name: payload.first_name.map(non_blank),
        last_name: payload.last_name.map(non_blank),
        phone_number: payload.phone_number.map(non_blank),
    };
    validate_profile_fields(
        new_value(&update.first_name),
        new_value(&update.last_name),
        new_value(&update.phone_number),
    )?;

    let updated = state
        .users
        .update_profile(user.id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    info!("profile updated");
    Ok(Json(UserRead::from(updated)))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn update_preferences(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<UpdatePreferencesRequest>,
) -> AppResult<Json<UserRead>> {
    let update = PreferencesUpdate {
        dark_mode: payload.dark_mode,
        font_size: payload.font_size,
    };

    let updated = state
        .users
        .update_preferences(user.id, &update)
        .await?
        .ok_or_else(|| AppError::not_found("User not found"))?;

    Ok(Json(UserRead::from(updated)))
}

/// Tokens issued before the change stay valid until they expire.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn change_password(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<ChangePasswordRequest>,
) -> AppResult<StatusCode> {
    let ok = verify_password_async(payload.current_password, user.password_hash.clone()).await?;
    if !ok {
        warn!("password change with wrong current password");
        return Err(AppError::unauthorized("Incorrect password"));
    }

    validate_password(&payload.new_password)?;
    let hash = hash_password_async(payload.new_password).await?;

    if !state.users.update_password(user.id, &hash).await? {
        return Err(AppError::not_found("User not found"));
    }

    info!("password changed");
    Ok(StatusCode::NO_CONTENT)
}
