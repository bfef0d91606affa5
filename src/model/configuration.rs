use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Clone)]
pub struct Configuration {
    pub database_url: String,
    pub jwt_secret: String,
    pub api_user_pass: String,
    pub server_bind_point: String,
    pub log_level: String,
    pub cosmos_db_primary_key: String,
    pub cosmos_db_database_name: String,
    pub cosmos_db_account: String,
    pub question_api_endpoint: String,
    pub question_api_key: String,
}
