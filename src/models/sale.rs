use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One row of the append-only sales ledger. `unit_price` and `total_price`
/// are captured at sale time and never re-derived from the live item.
#[derive(Debug, Serialize, Deserialize, FromRow)]
pub struct SaleRecord {
    pub id: i64,
    pub merchandise_id: i64,
    pub consumer_id: i64,
    pub quantity_sold: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
pub struct NewSale {
    pub merchandise_id: i64,
    pub consumer_id: i64,
    pub quantity_sold: i64,
}

// JOIN result for the history view
#[derive(Debug, Serialize, FromRow)]
pub struct SaleWithNames {
    pub id: i64,
    pub merchandise_id: i64,
    pub merchandise_name: String,
    pub consumer_id: i64,
    pub consumer_name: String,
    pub quantity_sold: i64,
    pub unit_price: f64,
    pub total_price: f64,
    pub sale_date: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct Statistics {
    pub item_count: i64,
    pub total_stock: i64,
    pub total_sales_count: i64,
    pub total_revenue: f64,
}
