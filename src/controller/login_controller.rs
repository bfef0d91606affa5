use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::login_info::{LoginCredential, LoginResponse};
use crate::shared::configuration::CONFIGURATION;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jsonwebtoken::{encode, EncodingKey, Header};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub async fn login(Json(request): Json<LoginCredential>) -> Response {
    if !request.user_id.is_empty() && request.password == CONFIGURATION.api_user_pass {
        let expiry = OffsetDateTime::now_utc() + time::Duration::hours(1);
        let token = generate_jwt_token(&request.user_id, expiry);
        let login_response = LoginResponse {
            token,
            expiry: expiry.format(&Rfc3339).unwrap_or_default(),
        };
        (StatusCode::OK, Json(login_response)).into_response()
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ServerError::with_message("Invalid credentials.")),
        )
            .into_response()
    }
}

fn generate_jwt_token(user_id: &str, expiry: OffsetDateTime) -> String {
    let secret = &CONFIGURATION.jwt_secret;
    let claim = Claim {
        sub: user_id.into(),
        exp: expiry.unix_timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claim,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .expect("Failed to encode JWT token.")
}
