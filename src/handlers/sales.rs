use axum::{
    extract::{Query, State},
    response::Json,
};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    database::Database,
    error::AppError,
    models::{NewSale, SaleRecord, SaleWithNames},
    services,
};

#[derive(Deserialize)]
pub struct SalesHistoryFilters {
    start_date: Option<String>,
    end_date: Option<String>,
}

pub async fn record_sale(
    State(db): State<Database>,
    Json(payload): Json<NewSale>,
) -> Result<Json<SaleRecord>, AppError> {
    let record = services::sales::record_sale(&db, &payload).await?;
    Ok(Json(record))
}

pub async fn sales_history(
    State(db): State<Database>,
    Query(filters): Query<SalesHistoryFilters>,
) -> Result<Json<Vec<SaleWithNames>>, AppError> {
    // Blank or malformed dates fall back to an unbounded side.
    let start_date = filters
        .start_date
        .as_deref()
        .and_then(|s| if s.is_empty() { None } else { NaiveDate::parse_from_str(s, "%Y-%m-%d").ok() });
    let end_date = filters
        .end_date
        .as_deref()
        .and_then(|s| if s.is_empty() { None } else { NaiveDate::parse_from_str(s, "%Y-%m-%d").ok() });

    let sales = services::reports::sales_history(&db, start_date, end_date).await?;
    Ok(Json(sales))
}
