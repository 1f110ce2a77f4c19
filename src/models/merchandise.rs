use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct MerchandiseItem {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct MerchandiseForm {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub quantity: i64,
    pub price: f64,
}
