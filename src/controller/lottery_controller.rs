use crate::controller::star_controller::{adjust_stars, fetch_star_balance};
use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::{ApiError, ServerError};
use crate::model::game::outcome::draw_winner;
use crate::model::lottery::{Lottery, LotteryStatus, LotteryStatusUpdateInfo, LotteryType};
use crate::model::star::StarUpdateOpt;
use crate::shared::question_service::generate_quiz_questions;
use crate::shared::util::{add_document, query_document};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use azure_data_cosmos::prelude::{Param, Query};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use uuid::Uuid;

pub const LOTTERIES: &str = "Lotteries";

pub async fn get_live_lotteries(State(state): State<AppState>) -> Response {
    let query = Query::with_params(
        format!("SELECT * FROM {} l WHERE l.status = @status", LOTTERIES),
        vec![Param::new("@status".into(), "LIVE".to_string())],
    );

    let lotteries = query_document::<Lottery, _>(&state.cosmos_db.database, LOTTERIES, query, true)
        .await
        .unwrap_or_default();
    (StatusCode::OK, Json(lotteries)).into_response()
}

pub async fn get_shop_lotteries(
    Path(shop_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let query = Query::with_params(
        format!("SELECT * FROM {} l WHERE l.shopId = @shop_id", LOTTERIES),
        vec![Param::new("@shop_id".into(), shop_id)],
    );

    let lotteries = query_document::<Lottery, _>(&state.cosmos_db.database, LOTTERIES, query, true)
        .await
        .unwrap_or_default();
    (StatusCode::OK, Json(lotteries)).into_response()
}

pub async fn get_lottery(Path(lottery_id): Path<String>, State(state): State<AppState>) -> Response {
    match find_lottery(&state, &lottery_id).await {
        Some(lottery) => (StatusCode::OK, Json(lottery)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified lottery is not found.",
            )),
        )
            .into_response(),
    }
}

/// Creates a lottery. Quiz lotteries without supplied questions get theirs
/// generated from the prize product; supplied questions are validated.
pub async fn add_lottery(
    _claim: Claim,
    State(state): State<AppState>,
    Json(payload): Json<Lottery>,
) -> Response {
    let mut payload = payload;
    if payload.id.is_empty() {
        payload.id = Uuid::new_v4().to_string();
    }
    payload.participants = payload.entrant_ids.len() as u32;

    if payload.shop_id.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message("The shop id cannot be empty.")),
        )
            .into_response();
    }

    if OffsetDateTime::parse(&payload.end_time, &Rfc3339).is_err() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "The end time has to be an RFC 3339 timestamp.",
            )),
        )
            .into_response();
    }

    if let Some(questions) = payload.quiz_data.as_ref() {
        if questions.iter().any(|question| !question.is_valid()) {
            return (
                StatusCode::BAD_REQUEST,
                Json(ServerError::with_message(
                    "Each quiz question needs at least 2 options and a valid correct index.",
                )),
            )
                .into_response();
        }
    }

    if payload.lottery_type == LotteryType::Quiz
        && payload
            .quiz_data
            .as_ref()
            .map(|questions| questions.is_empty())
            .unwrap_or(true)
    {
        let questions = generate_quiz_questions(
            &payload.prize_product.name,
            &payload.prize_product.description,
        )
        .await;
        payload.quiz_data = Some(questions);
    }

    match add_document(&state.cosmos_db.database, LOTTERIES, payload.clone()).await {
        Ok(_) => (StatusCode::CREATED, Json(payload)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to add a new lottery: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

/// Applies a status transition. Transitions only ever move forward; a draw
/// completing without a winner picks one among the entrants.
pub async fn update_lottery_status(
    _claim: Claim,
    Path(lottery_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<LotteryStatusUpdateInfo>,
) -> Response {
    let Some(lottery) = find_lottery(&state, &lottery_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified lottery is not found.",
            )),
        )
            .into_response();
    };

    if !lottery.status.can_transition_to(payload.status) {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(format!(
                "The lottery status cannot change from {:?} to {:?}.",
                lottery.status, payload.status
            ))),
        )
            .into_response();
    }

    let winner_id = if payload.status == LotteryStatus::Completed
        && lottery.lottery_type != LotteryType::Scratch
        && lottery.winner_id.is_none()
    {
        draw_winner(&lottery.entrant_ids)
    } else {
        lottery.winner_id.clone()
    };

    let new_document = Lottery {
        status: payload.status,
        winner_id,
        ..lottery
    };

    match add_document(&state.cosmos_db.database, LOTTERIES, new_document.clone()).await {
        Ok(_) => (StatusCode::OK, Json(new_document)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to update the lottery status: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn enter_lottery(
    claim: Claim,
    Path(lottery_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    match record_lottery_entry(&state, &lottery_id, &claim.sub).await {
        Ok(lottery) => (StatusCode::OK, Json(lottery)).into_response(),
        Err(rejection) => rejection.into_response(),
    }
}

/// The server-side entry step: re-reads the lottery, enforces the LIVE
/// status, the participant cap and one-entry-per-user, checks and deducts
/// the star cost, then writes the updated document back.
pub async fn record_lottery_entry(
    state: &AppState,
    lottery_id: &str,
    user_id: &str,
) -> Result<Lottery, ApiError> {
    let mut lottery = find_lottery(state, lottery_id).await.ok_or((
        StatusCode::NOT_FOUND,
        Json(ServerError::with_message(
            "The specified lottery is not found.",
        )),
    ))?;

    lottery
        .record_entry(user_id)
        .map_err(|e| (StatusCode::BAD_REQUEST, Json(ServerError::with_message(e.to_string()))))?;

    let star_cost = lottery.star_cost as i32;
    let balance = fetch_star_balance(&state.pg_pool, user_id, &lottery.shop_id)
        .await
        .map_err(|e| {
            let error_message = format!("Failed to query the user's star balance: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
        })?;

    if balance.stars < star_cost {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "The user doesn't have enough stars at this shop.",
            )),
        ));
    }

    adjust_stars(
        &state.pg_pool,
        user_id,
        &lottery.shop_id,
        star_cost,
        StarUpdateOpt::Minus,
    )
    .await
    .map_err(|e| {
        let error_message = format!("Failed to deduct the entry cost: {}", e);
        tracing::error!("{}", &error_message);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ServerError::with_message(error_message)),
        )
    })?;

    if let Err(e) = add_document(&state.cosmos_db.database, LOTTERIES, lottery.clone()).await {
        // Put the deducted stars back, the entry was not recorded.
        let _ = adjust_stars(
            &state.pg_pool,
            user_id,
            &lottery.shop_id,
            star_cost,
            StarUpdateOpt::Plus,
        )
        .await;
        let error_message = format!("Failed to record the lottery entry: {}", e);
        tracing::error!("{}", &error_message);
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ServerError::with_message(error_message)),
        ));
    }

    Ok(lottery)
}

pub async fn find_lottery(state: &AppState, lottery_id: &str) -> Option<Lottery> {
    let query = Query::with_params(
        format!("SELECT * FROM {} l WHERE l.id = @id", LOTTERIES),
        vec![Param::new("@id".into(), lottery_id.to_string())],
    );

    query_document::<Lottery, _>(&state.cosmos_db.database, LOTTERIES, query, true)
        .await
        .and_then(|lotteries| lotteries.first().cloned())
}
