use axum::{
    extract::{
        multipart::MultipartRejection, rejection::JsonRejection, DefaultBodyLimit, FromRef,
        Multipart, Path, State,
    },
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::{ApiError, MessageResponse},
    images::{
        filter::{multipart_error, read_image_field, BODY_LIMIT_BYTES},
        services::normalize_to_png_blocking,
    },
    state::AppState,
    users::{
        dto::{LoginRequest, LoginResponse, SignupForm},
        repo_types::{NewUser, StoreError, User},
    },
};

pub fn signup_routes() -> Router<AppState> {
    Router::new()
        .route("/api/signup", post(signup))
        .layer(DefaultBodyLimit::max(BODY_LIMIT_BYTES))
}

pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/users", get(list_users))
        .route("/api/users/:userId", delete(delete_user))
}

async fn read_signup_form(mut mp: Multipart) -> Result<SignupForm, ApiError> {
    let mut form = SignupForm::default();
    while let Some(field) = mp.next_field().await.map_err(multipart_error)? {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field.file_name().map(str::to_owned);
        match file_name.as_deref() {
            // A browser form without a chosen file sends an empty filename.
            Some("") => continue,
            Some(_) if name != "image" || form.image.is_some() => {
                return Err(ApiError::Rejected("Unexpected field".into()));
            }
            Some(_) => form.image = Some(read_image_field(field).await?),
            None => {
                let value = field.text().await.map_err(multipart_error)?;
                form.set_text(&name, value);
            }
        }
    }
    Ok(form)
}

#[instrument(skip(state, mp))]
pub async fn signup(
    State(state): State<AppState>,
    mp: Result<Multipart, MultipartRejection>,
) -> Result<(StatusCode, Json<MessageResponse>), ApiError> {
    let form = read_signup_form(mp?).await?;

    if form.email.is_empty() || form.password.is_empty() {
        warn!("signup missing email or password");
        return Err(ApiError::Rejected("Email and password are required".into()));
    }

    let image = match form.image {
        Some(bytes) => Some(normalize_to_png_blocking(bytes).await.map_err(|e| {
            error!(error = %e, "image normalization failed");
            ApiError::Internal("Error signing up")
        })?),
        None => None,
    };

    let password_hash = hash_password_blocking(form.password).await.map_err(|e| {
        error!(error = %e, "hash_password failed");
        ApiError::Internal("Error signing up")
    })?;

    let new_user = NewUser {
        full_name: form.full_name,
        email: form.email,
        password_hash,
        username: form.username,
        brief: form.brief,
        location: form.location,
        image,
    };
    let user = state.users.insert(new_user).await.map_err(|e| match e {
        StoreError::Duplicate => {
            warn!("signup with registered email");
            ApiError::Conflict("Email already registered")
        }
        StoreError::Backend(e) => {
            error!(error = %e, "insert user failed");
            ApiError::Internal("Error signing up")
        }
    })?;

    info!(user_id = %user.id, email = %user.email, "user signed up");
    Ok((
        StatusCode::CREATED,
        MessageResponse::new("User signed up successfully"),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, ApiError> {
    let Json(payload) = payload?;
    let email = payload.email.trim().to_lowercase();
    if email.is_empty() || payload.password.is_empty() {
        return Err(ApiError::Rejected("Email and password are required".into()));
    }

    let user = match state.users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %email, "login unknown email");
            return Err(ApiError::NotFound("User not found"));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err(ApiError::Internal("Error logging in"));
        }
    };

    let ok = verify_password_blocking(payload.password, user.password_hash.clone())
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %user.id, "verify_password failed");
            ApiError::Internal("Error logging in")
        })?;
    if !ok {
        warn!(user_id = %user.id, "login invalid password");
        return Err(ApiError::Unauthorized("Invalid email or password"));
    }

    let token = JwtKeys::from_ref(&state)
        .sign(&user.email, user.id)
        .map_err(|e| {
            error!(error = %e, "jwt sign failed");
            ApiError::Internal("Error logging in")
        })?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(LoginResponse {
        token,
        user_id: user.id,
    }))
}

#[instrument(skip(state))]
pub async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    let users = state.users.list().await.map_err(|e| {
        error!(error = %e, "list users failed");
        ApiError::Internal("Error fetching users")
    })?;
    Ok(Json(users))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    let id = Uuid::parse_str(&user_id).map_err(|e| {
        error!(error = %e, %user_id, "malformed user id");
        ApiError::Internal("Internal server error")
    })?;

    let removed = match state.users.find_by_id(id).await {
        Ok(None) => false,
        Ok(Some(_)) => state.users.delete(id).await.map_err(|e| {
            error!(error = %e, %id, "delete user failed");
            ApiError::Internal("Internal server error")
        })?,
        Err(e) => {
            error!(error = %e, %id, "find_by_id failed");
            return Err(ApiError::Internal("Internal server error"));
        }
    };
    if !removed {
        return Err(ApiError::NotFound("User not found"));
    }

    info!(%id, "user deleted");
    Ok(MessageResponse::new("User deleted successfully"))
}
