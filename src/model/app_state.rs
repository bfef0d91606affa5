use crate::model::cosmos_db::CosmosDb;
use crate::model::game::PlaySession;
use dashmap::DashMap;
use sqlx::{Pool, Postgres};
use std::sync::Arc;

/// Shared handles for every request handler. Participation sessions are
/// in-memory only and are lost on restart.
#[derive(Clone)]
pub struct AppState {
    pub cosmos_db: CosmosDb,
    pub pg_pool: Pool<Postgres>,
    pub sessions: Arc<DashMap<String, PlaySession>>,
}
