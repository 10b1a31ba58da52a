use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub user_id: String,
    pub user_code: Option<String>,
    pub role: String,
    pub status: String,
    #[serde(skip)]
    pub password_hash: Option<String>,
    pub expiry_date: Option<String>,
}

impl User {
    pub fn is_banned(&self) -> bool {
        self.status == UserStatus::Banned.as_str()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserStatus {
    Active,
    Banned,
}

impl UserStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Banned => "banned",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Reseller {
    pub reseller_id: String,
    pub credit: f64,
}
