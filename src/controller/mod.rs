pub mod login_controller;
pub mod lottery_controller;
pub mod session_controller;
pub mod shop_controller;
pub mod star_controller;
pub mod user_controller;
