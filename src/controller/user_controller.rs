use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::user::{User, UserUpdateInfo};
use crate::shared::util::{add_document, query_document};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use azure_data_cosmos::prelude::{Param, Query};

pub const USERS: &str = "Users";

pub async fn get_user(
    _claim: Claim,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match find_user(&state, &user_id).await {
        Some(user) => (StatusCode::OK, Json(user)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified user is not found.",
            )),
        )
            .into_response(),
    }
}

/// Creating a user that already exists is a no-op returning the stored
/// document.
pub async fn add_user(
    _claim: Claim,
    State(state): State<AppState>,
    Json(payload): Json<User>,
) -> Response {
    if payload.id.is_empty() || payload.name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "Either the user id or the name is empty.",
            )),
        )
            .into_response();
    }

    if let Some(existing_user) = find_user(&state, &payload.id).await {
        return (StatusCode::OK, Json(existing_user)).into_response();
    }

    match add_document(&state.cosmos_db.database, USERS, payload.clone()).await {
        Ok(_) => (StatusCode::CREATED, Json(payload)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to add a new user: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn update_user(
    _claim: Claim,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<UserUpdateInfo>,
) -> Response {
    let Some(user) = find_user(&state, &user_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified user is not found.",
            )),
        )
            .into_response();
    };

    let new_document = User {
        name: payload.name.unwrap_or_else(|| user.name.clone()),
        role: payload.role.unwrap_or(user.role),
        avatar: payload.avatar.unwrap_or_else(|| user.avatar.clone()),
        email: payload.email.unwrap_or_else(|| user.email.clone()),
        phone: payload.phone.unwrap_or_else(|| user.phone.clone()),
        ..user
    };

    match add_document(&state.cosmos_db.database, USERS, new_document.clone()).await {
        Ok(_) => (StatusCode::OK, Json(new_document)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to update the user {}: {}", user_id, e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

async fn find_user(state: &AppState, user_id: &str) -> Option<User> {
    let query = Query::with_params(
        format!("SELECT * FROM {} u WHERE u.id = @id", USERS),
        vec![Param::new("@id".into(), user_id.to_string())],
    );

    query_document::<User, _>(&state.cosmos_db.database, USERS, query, true)
        .await
        .and_then(|users| users.first().cloned())
}
