use crate::model::lottery::Product;
use azure_data_cosmos::CosmosEntity;
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: String,
    pub name: String,
    pub category: String,
    pub description: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub logo: String,
    pub lat: f64,
    pub lng: f64,
    #[serde(default)]
    pub products: Vec<Product>,
}

#[derive(Deserialize, Serialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShopUpdateInfo {
    pub name: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub logo: Option<String>,
    pub products: Option<Vec<Product>>,
}

impl CosmosEntity for Shop {
    type Entity = String;

    fn partition_key(&self) -> Self::Entity {
        self.id.clone()
    }
}
