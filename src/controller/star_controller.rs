use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::star::{StarBalance, StarUpdateInfo, StarUpdateOpt};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use sqlx::{Pool, Postgres};

pub async fn get_user_star_balances(
    _claim: Claim,
    Path(user_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let query_result =
        sqlx::query_as::<_, StarBalance>(r#"SELECT * FROM "StarBalances" WHERE "user_id" = $1"#)
            .bind(&user_id)
            .fetch_all(&state.pg_pool)
            .await;

    match query_result {
        Ok(balances) => (StatusCode::OK, Json(balances)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to query star balances: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn get_star_balance(
    _claim: Claim,
    Path((user_id, shop_id)): Path<(String, String)>,
    State(state): State<AppState>,
) -> Response {
    match fetch_star_balance(&state.pg_pool, &user_id, &shop_id).await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to query star balance: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn add_stars(
    claim: Claim,
    Path((user_id, shop_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(request): Json<StarUpdateInfo>,
) -> Response {
    adjust_star_endpoint(claim, user_id, shop_id, state, request, StarUpdateOpt::Plus).await
}

pub async fn deduct_stars(
    claim: Claim,
    Path((user_id, shop_id)): Path<(String, String)>,
    State(state): State<AppState>,
    Json(request): Json<StarUpdateInfo>,
) -> Response {
    adjust_star_endpoint(claim, user_id, shop_id, state, request, StarUpdateOpt::Minus).await
}

async fn adjust_star_endpoint(
    _claim: Claim,
    user_id: String,
    shop_id: String,
    state: AppState,
    request: StarUpdateInfo,
    opt: StarUpdateOpt,
) -> Response {
    if request.stars < 0 {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "The amount of stars has to be greater than 0.",
            )),
        )
            .into_response();
    }

    match adjust_stars(&state.pg_pool, &user_id, &shop_id, request.stars, opt).await {
        Ok(balance) => (StatusCode::OK, Json(balance)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to update the user's star balance: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn fetch_star_balance(
    pool: &Pool<Postgres>,
    user_id: &str,
    shop_id: &str,
) -> anyhow::Result<StarBalance> {
    let balance = sqlx::query_as::<_, StarBalance>(
        r#"SELECT * FROM "StarBalances" WHERE "user_id" = $1 AND "shop_id" = $2"#,
    )
    .bind(user_id)
    .bind(shop_id)
    .fetch_optional(pool)
    .await?;

    Ok(balance.unwrap_or(StarBalance {
        user_id: user_id.to_string(),
        shop_id: shop_id.to_string(),
        stars: 0,
    }))
}

pub async fn adjust_stars(
    pool: &Pool<Postgres>,
    user_id: &str,
    shop_id: &str,
    amount: i32,
    opt: StarUpdateOpt,
) -> anyhow::Result<StarBalance> {
    let signed_amount = match opt {
        StarUpdateOpt::Plus => amount,
        StarUpdateOpt::Minus => -amount,
    };

    let balance = sqlx::query_as::<_, StarBalance>(
        r#"INSERT INTO "StarBalances" ("user_id", "shop_id", "stars") VALUES ($1, $2, $3)
           ON CONFLICT ("user_id", "shop_id")
           DO UPDATE SET "stars" = "StarBalances"."stars" + $3
           RETURNING *"#,
    )
    .bind(user_id)
    .bind(shop_id)
    .bind(signed_amount)
    .fetch_one(pool)
    .await?;

    Ok(balance)
}
