use crate::controller::login_controller::login;
use crate::controller::lottery_controller::{
    add_lottery, enter_lottery, get_live_lotteries, get_lottery, get_shop_lotteries,
    update_lottery_status,
};
use crate::controller::session_controller::{
    answer_session, close_session, enter_session, get_session, open_session, scratch_session,
};
use crate::controller::shop_controller::{
    add_shop, get_all_shops, get_shop, get_shops_by_category, update_shop,
};
use crate::controller::star_controller::{
    add_stars, deduct_stars, get_star_balance, get_user_star_balances,
};
use crate::controller::user_controller::{add_user, get_user, update_user};
use crate::db::{initialize_cosmos, initialize_db};
use crate::model::app_state::AppState;
use crate::shared::configuration::CONFIGURATION;
use crate::shared::constants::ASSET_DIRECTORY;
use axum::routing::{get, patch, post};
use axum::Router;
use dashmap::DashMap;
use dotenv::dotenv;
use std::sync::Arc;
use tower_http::services::ServeDir;
use tracing::Level;

mod controller;
mod db;
mod middleware;
mod model;
mod shared;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let log_level = match CONFIGURATION.log_level.to_uppercase().as_str() {
        "TRACE" => Level::TRACE,
        "DEBUG" => Level::DEBUG,
        "WARN" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    };
    tracing_subscriber::fmt().with_max_level(log_level).init();

    let pg_pool = initialize_db().await?;
    let cosmos_db = initialize_cosmos()?;
    let app_state = AppState {
        cosmos_db,
        pg_pool,
        sessions: Arc::new(DashMap::new()),
    };

    let router = Router::new()
        .route("/login", post(login))
        .route("/user", post(add_user))
        .route("/user/:user_id", get(get_user).patch(update_user))
        .route("/shop", get(get_all_shops).post(add_shop))
        .route("/shop/:shop_id", get(get_shop).patch(update_shop))
        .route("/shop/category/:category", get(get_shops_by_category))
        .route("/lottery", post(add_lottery))
        .route("/lottery/live", get(get_live_lotteries))
        .route("/lottery/shop/:shop_id", get(get_shop_lotteries))
        .route("/lottery/:lottery_id", get(get_lottery))
        .route("/lottery/:lottery_id/status", patch(update_lottery_status))
        .route("/lottery/:lottery_id/enter", post(enter_lottery))
        .route("/star/:user_id", get(get_user_star_balances))
        .route("/star/:user_id/:shop_id", get(get_star_balance))
        .route("/star/:user_id/:shop_id/plus", patch(add_stars))
        .route("/star/:user_id/:shop_id/minus", patch(deduct_stars))
        .route("/session/new", post(open_session))
        .route(
            "/session/:session_id",
            get(get_session).delete(close_session),
        )
        .route("/session/:session_id/enter", post(enter_session))
        .route("/session/:session_id/scratch", post(scratch_session))
        .route("/session/:session_id/answer", post(answer_session))
        .nest_service(
            "/asset/product",
            ServeDir::new(String::from(ASSET_DIRECTORY) + "/product"),
        )
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(&CONFIGURATION.server_bind_point).await?;
    tracing::info!("Listening on {}", &CONFIGURATION.server_bind_point);
    axum::serve(listener, router).await?;
    Ok(())
}
