use chrono::NaiveDate;

use crate::database::Database;
use crate::error::AppError;
use crate::models::{SaleWithNames, Statistics};

/// Derives the dashboard totals from one aggregate statement, so the numbers
/// always come from a single snapshot of the store.
pub async fn statistics(db: &Database) -> Result<Statistics, AppError> {
    let stats = sqlx::query_as::<_, Statistics>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM merchandise) AS item_count,
            (SELECT COALESCE(SUM(quantity), 0) FROM merchandise) AS total_stock,
            (SELECT COUNT(*) FROM sales) AS total_sales_count,
            (SELECT COALESCE(SUM(total_price), 0.0) FROM sales) AS total_revenue
        "#,
    )
    .fetch_one(db)
    .await?;

    Ok(stats)
}

/// Committed sales newest first, optionally bounded to the closed interval
/// [start_date, end_date].
pub async fn sales_history(
    db: &Database,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Result<Vec<SaleWithNames>, AppError> {
    let mut sql = String::from(
        r#"
        SELECT
            s.id,
            s.merchandise_id,
            m.name AS merchandise_name,
            s.consumer_id,
            c.name AS consumer_name,
            s.quantity_sold,
            s.unit_price,
            s.total_price,
            s.sale_date
        FROM sales s
        JOIN merchandise m ON s.merchandise_id = m.id
        JOIN consumers c ON s.consumer_id = c.id
        "#,
    );

    let mut conditions = Vec::new();
    if start_date.is_some() {
        conditions.push("DATE(s.sale_date) >= ?");
    }
    if end_date.is_some() {
        conditions.push("DATE(s.sale_date) <= ?");
    }
    if !conditions.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
    }
    sql.push_str(" ORDER BY s.sale_date DESC, s.id DESC");

    let mut query = sqlx::query_as::<_, SaleWithNames>(&sql);
    if let Some(date) = start_date {
        query = query.bind(date);
    }
    if let Some(date) = end_date {
        query = query.bind(date);
    }

    let sales = query.fetch_all(db).await?;
    Ok(sales)
}
