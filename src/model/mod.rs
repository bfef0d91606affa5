pub mod app_state;
pub mod claim;
pub mod configuration;
pub mod cosmos_db;
pub mod errors;
pub mod game;
pub mod login_info;
pub mod lottery;
pub mod shop;
pub mod star;
pub mod user;
