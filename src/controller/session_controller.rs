use crate::controller::lottery_controller::{find_lottery, record_lottery_entry};
use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::game::outcome::RandomOutcome;
use crate::model::game::{PlaySession, SessionPhase, RESULT_DISPLAY_DELAY};
use crate::model::lottery::{LotteryStatus, LotteryType};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use time::OffsetDateTime;

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewSessionRequest {
    pub lottery_id: String,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ScratchEventInfo {
    Press,
    Move { x: f32, y: f32 },
    Release,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ScratchRequest {
    pub events: Vec<ScratchEventInfo>,
}

#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRequest {
    pub option_index: usize,
}

#[derive(Serialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SessionStateResponse {
    pub session_id: String,
    pub lottery_id: String,
    pub lottery_type: LotteryType,
    pub phase: SessionPhase,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cleared_fraction: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revealed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_index: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub won: Option<bool>,
}

impl SessionStateResponse {
    fn from_session(session: &PlaySession) -> Self {
        SessionStateResponse {
            session_id: session.id.clone(),
            lottery_id: session.lottery.id.clone(),
            lottery_type: session.lottery.lottery_type,
            phase: session.phase,
            cleared_fraction: session.cleared_fraction(),
            revealed: session.scratch.as_ref().map(|card| card.is_revealed()),
            question_index: session.quiz.map(|progress| progress.current_index),
            correct_count: session.quiz.map(|progress| progress.correct_count),
            won: session.outcome,
        }
    }
}

/// Opens a participation session on a LIVE lottery. The session lives in
/// memory only and is discarded on exit.
pub async fn open_session(
    claim: Claim,
    State(state): State<AppState>,
    Json(payload): Json<NewSessionRequest>,
) -> Response {
    let Some(lottery) = find_lottery(&state, &payload.lottery_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified lottery is not found.",
            )),
        )
            .into_response();
    };

    if lottery.status != LotteryStatus::Live {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "The lottery is not open for entry.",
            )),
        )
            .into_response();
    }

    if lottery.lottery_type == LotteryType::Quiz
        && lottery
            .quiz_data
            .as_ref()
            .map(|questions| questions.is_empty())
            .unwrap_or(true)
    {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(
                "The lottery carries no quiz questions.",
            )),
        )
            .into_response();
    }

    let session = PlaySession::new(claim.sub, lottery);
    let response = SessionStateResponse::from_session(&session);
    state.sessions.insert(session.id.clone(), session);
    (StatusCode::CREATED, Json(response)).into_response()
}

pub async fn get_session(
    claim: Claim,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        return session_not_found();
    };
    if session.user_id != claim.sub {
        return session_forbidden();
    }

    // A revealed card whose display delay has passed advances lazily here.
    session.advance_after_reveal(OffsetDateTime::now_utc());
    (
        StatusCode::OK,
        Json(SessionStateResponse::from_session(&session)),
    )
        .into_response()
}

/// The customer's enter action. The entry is recorded server-side (status,
/// cap, duplicate and star checks) before the session leaves `info`.
pub async fn enter_session(
    claim: Claim,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let lottery_id = {
        let Some(session) = state.sessions.get(&session_id) else {
            return session_not_found();
        };
        if session.user_id != claim.sub {
            return session_forbidden();
        }
        if session.phase != SessionPhase::Info {
            return (
                StatusCode::BAD_REQUEST,
                Json(ServerError::with_message(
                    "The session has already been entered.",
                )),
            )
                .into_response();
        }
        session.lottery.id.clone()
    };

    let entered_lottery = match record_lottery_entry(&state, &lottery_id, &claim.sub).await {
        Ok(lottery) => lottery,
        Err(rejection) => return rejection.into_response(),
    };

    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        return session_not_found();
    };
    session.lottery = entered_lottery;
    match session.enter() {
        Ok(()) => (
            StatusCode::OK,
            Json(SessionStateResponse::from_session(&session)),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(e.to_string())),
        )
            .into_response(),
    }
}

/// Applies a batch of scratch gestures. When one of them triggers the
/// reveal, the result phase is scheduled after the display delay.
pub async fn scratch_session(
    claim: Claim,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ScratchRequest>,
) -> Response {
    let mut revealed = false;

    let response = {
        let Some(mut session) = state.sessions.get_mut(&session_id) else {
            return session_not_found();
        };
        if session.user_id != claim.sub {
            return session_forbidden();
        }

        let mut resolver = RandomOutcome;
        let now = OffsetDateTime::now_utc();
        for event in payload.events {
            let result = match event {
                ScratchEventInfo::Press => session.scratch_press().map(|_| None),
                ScratchEventInfo::Release => session.scratch_release().map(|_| None),
                ScratchEventInfo::Move { x, y } => {
                    session.scratch_move(x, y, &mut resolver, now)
                }
            };
            match result {
                Ok(Some(_)) => revealed = true,
                Ok(None) => {}
                Err(e) => {
                    return (
                        StatusCode::BAD_REQUEST,
                        Json(ServerError::with_message(e.to_string())),
                    )
                        .into_response();
                }
            }
        }

        SessionStateResponse::from_session(&session)
    };

    if revealed {
        spawn_result_advance(state.sessions.clone(), session_id);
    }

    (StatusCode::OK, Json(response)).into_response()
}

pub async fn answer_session(
    claim: Claim,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<AnswerRequest>,
) -> Response {
    let Some(mut session) = state.sessions.get_mut(&session_id) else {
        return session_not_found();
    };
    if session.user_id != claim.sub {
        return session_forbidden();
    }

    match session.answer(payload.option_index) {
        Ok(_) => (
            StatusCode::OK,
            Json(SessionStateResponse::from_session(&session)),
        )
            .into_response(),
        Err(e) => (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message(e.to_string())),
        )
            .into_response(),
    }
}

/// "Back to shop": the session is discarded, not reset.
pub async fn close_session(
    claim: Claim,
    Path(session_id): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let owned = state
        .sessions
        .get(&session_id)
        .map(|session| session.user_id == claim.sub);
    match owned {
        None => session_not_found(),
        Some(false) => session_forbidden(),
        Some(true) => {
            state.sessions.remove(&session_id);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

fn spawn_result_advance(sessions: Arc<DashMap<String, PlaySession>>, session_id: String) {
    tokio::spawn(async move {
        let delay = std::time::Duration::from_millis(RESULT_DISPLAY_DELAY.whole_milliseconds() as u64);
        tokio::time::sleep(delay).await;
        if let Some(mut session) = sessions.get_mut(&session_id) {
            session.advance_after_reveal(OffsetDateTime::now_utc());
        }
    });
}

fn session_not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(ServerError::with_message(
            "The specified session is not found.",
        )),
    )
        .into_response()
}

fn session_forbidden() -> Response {
    (
        StatusCode::FORBIDDEN,
        Json(ServerError::with_message(
            "The session belongs to another user.",
        )),
    )
        .into_response()
}
