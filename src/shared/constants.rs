pub const CONFIG_DIRECTORY: &str = "./config";
pub const ASSET_DIRECTORY: &str = "./asset";
