use serde::{Deserialize, Serialize};

/// One row of the star ledger: a user's balance at a single shop.
#[derive(Deserialize, Serialize, sqlx::FromRow, Clone, Debug, Default)]
pub struct StarBalance {
    pub user_id: String,
    pub shop_id: String,
    pub stars: i32,
}

#[derive(Deserialize, Serialize, Clone)]
pub struct StarUpdateInfo {
    pub stars: i32,
}

#[derive(Copy, Clone, Debug)]
pub enum StarUpdateOpt {
    Plus,
    Minus,
}
