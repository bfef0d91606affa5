use crate::model::configuration::Configuration;
use crate::shared::constants::CONFIG_DIRECTORY;
use once_cell::sync::Lazy;

pub static CONFIGURATION: Lazy<Configuration> =
    Lazy::new(|| initialize().expect("Failed to initialize configuration."));

const CONFIGURATION_FILE_NAME: &str = "/config.toml";

fn initialize() -> anyhow::Result<Configuration> {
    if !std::path::Path::new(CONFIG_DIRECTORY).exists() {
        std::fs::create_dir(CONFIG_DIRECTORY)?;
    }

    let configuration_path = String::from(CONFIG_DIRECTORY) + CONFIGURATION_FILE_NAME;
    if !std::path::Path::new(&configuration_path).exists() {
        // Read from environment variables
        let configuration = Configuration {
            database_url: std::env::var("DATABASE_URL")?,
            jwt_secret: std::env::var("JWT_SECRET")?,
            api_user_pass: std::env::var("API_USERPASS")?,
            server_bind_point: std::env::var("SERVER_BIND_POINT")?,
            log_level: "DEBUG".to_string(),
            cosmos_db_primary_key: std::env::var("COSMOS_DB_PRIMARY_KEY")?,
            cosmos_db_database_name: std::env::var("COSMOS_DB_DATABASE_NAME")?,
            cosmos_db_account: std::env::var("COSMOS_DB_ACCOUNT")?,
            question_api_endpoint: std::env::var("QUESTION_API_ENDPOINT")?,
            question_api_key: std::env::var("QUESTION_API_KEY").unwrap_or_default(),
        };
        let serialized_toml = toml::to_string_pretty(&configuration)?;
        std::fs::write(&configuration_path, serialized_toml)?;
        Ok(configuration)
    } else {
        let toml = std::fs::read_to_string(&configuration_path)?;
        let deserialized_toml = toml::from_str::<Configuration>(&toml)?;
        Ok(deserialized_toml)
    }
}
