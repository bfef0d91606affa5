use crate::model::cosmos_db::CosmosDb;
use crate::shared::configuration::CONFIGURATION;
use crate::shared::util::initialize_clients;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub async fn initialize_db() -> anyhow::Result<Pool<Postgres>> {
    let connection_string = &CONFIGURATION.database_url;
    let pool = PgPoolOptions::new().connect(connection_string).await?;
    Ok(pool)
}

pub fn initialize_cosmos() -> anyhow::Result<CosmosDb> {
    let (client, database) = initialize_clients()?;
    Ok(CosmosDb { client, database })
}
