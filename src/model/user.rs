use azure_data_cosmos::CosmosEntity;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: UserRole,
    #[serde(default)]
    pub avatar: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Deserialize, Serialize, Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum UserRole {
    #[serde(rename = "MERCHANT")]
    Merchant,
    #[serde(rename = "CUSTOMER")]
    #[default]
    Customer,
    #[serde(rename = "GUEST")]
    Guest,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdateInfo {
    pub name: Option<String>,
    pub role: Option<UserRole>,
    pub avatar: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CosmosEntity for User {
    type Entity = String;

    fn partition_key(&self) -> Self::Entity {
        self.id.clone()
    }
}
