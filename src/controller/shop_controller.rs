use crate::model::app_state::AppState;
use crate::model::claim::Claim;
use crate::model::errors::ServerError;
use crate::model::shop::{Shop, ShopUpdateInfo};
use crate::shared::util::{add_document, get_documents, query_document};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use azure_data_cosmos::prelude::{Param, Query};
use uuid::Uuid;

pub const SHOPS: &str = "Shops";

/// A failed listing degrades to an empty shop list rather than an error
/// page; the failure is only logged inside the query helper.
pub async fn get_all_shops(State(state): State<AppState>) -> Response {
    let shops = get_documents::<Shop, _>(&state.cosmos_db.database, SHOPS)
        .await
        .unwrap_or_default();
    (StatusCode::OK, Json(shops)).into_response()
}

pub async fn get_shop(Path(shop_id): Path<String>, State(state): State<AppState>) -> Response {
    match find_shop(&state, &shop_id).await {
        Some(shop) => (StatusCode::OK, Json(shop)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified shop is not found.",
            )),
        )
            .into_response(),
    }
}

pub async fn get_shops_by_category(
    Path(category): Path<String>,
    State(state): State<AppState>,
) -> Response {
    let query = Query::with_params(
        format!("SELECT * FROM {} s WHERE s.category = @category", SHOPS),
        vec![Param::new("@category".into(), category)],
    );

    let shops = query_document::<Shop, _>(&state.cosmos_db.database, SHOPS, query, true)
        .await
        .unwrap_or_default();
    (StatusCode::OK, Json(shops)).into_response()
}

pub async fn add_shop(
    _claim: Claim,
    State(state): State<AppState>,
    Json(payload): Json<Shop>,
) -> Response {
    let mut payload = payload;
    if payload.id.is_empty() {
        payload.id = Uuid::new_v4().to_string();
    }

    if payload.name.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ServerError::with_message("The shop name cannot be empty.")),
        )
            .into_response();
    }

    match add_document(&state.cosmos_db.database, SHOPS, payload.clone()).await {
        Ok(_) => (StatusCode::CREATED, Json(payload)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to add a new shop: {}", e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn update_shop(
    _claim: Claim,
    Path(shop_id): Path<String>,
    State(state): State<AppState>,
    Json(payload): Json<ShopUpdateInfo>,
) -> Response {
    let Some(shop) = find_shop(&state, &shop_id).await else {
        return (
            StatusCode::NOT_FOUND,
            Json(ServerError::with_message(
                "The specified shop is not found.",
            )),
        )
            .into_response();
    };

    let new_document = Shop {
        name: payload.name.unwrap_or_else(|| shop.name.clone()),
        category: payload.category.unwrap_or_else(|| shop.category.clone()),
        description: payload.description.unwrap_or_else(|| shop.description.clone()),
        image: payload.image.unwrap_or_else(|| shop.image.clone()),
        logo: payload.logo.unwrap_or_else(|| shop.logo.clone()),
        products: payload.products.unwrap_or_else(|| shop.products.clone()),
        ..shop
    };

    match add_document(&state.cosmos_db.database, SHOPS, new_document.clone()).await {
        Ok(_) => (StatusCode::OK, Json(new_document)).into_response(),
        Err(e) => {
            let error_message = format!("Failed to update the shop {}: {}", shop_id, e);
            tracing::error!("{}", &error_message);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ServerError::with_message(error_message)),
            )
                .into_response()
        }
    }
}

pub async fn find_shop(state: &AppState, shop_id: &str) -> Option<Shop> {
    let query = Query::with_params(
        format!("SELECT * FROM {} s WHERE s.id = @id", SHOPS),
        vec![Param::new("@id".into(), shop_id.to_string())],
    );

    query_document::<Shop, _>(&state.cosmos_db.database, SHOPS, query, true)
        .await
        .and_then(|shops| shops.first().cloned())
}
