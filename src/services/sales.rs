use chrono::Utc;
use std::time::Duration;

use crate::database::Database;
use crate::error::{is_transient, AppError};
use crate::models::{NewSale, SaleRecord};
use crate::services::inventory;

/// Whole-transaction retries before contention is escalated to
/// `StoreUnavailable`.
const MAX_TX_RETRIES: u64 = 3;

/// Records a sale as one atomic unit: stock check, decrement, and ledger
/// insert all commit together or not at all.
///
/// Validation failures are detected before any mutation. Transient store
/// contention retries the entire transaction, never a part of it.
pub async fn record_sale(db: &Database, sale: &NewSale) -> Result<SaleRecord, AppError> {
    if sale.quantity_sold <= 0 {
        return Err(AppError::InvalidQuantity(sale.quantity_sold));
    }

    let mut attempt = 0;
    loop {
        match record_sale_once(db, sale).await {
            Err(AppError::Store(err)) if is_transient(&err) => {
                attempt += 1;
                if attempt > MAX_TX_RETRIES {
                    return Err(AppError::StoreUnavailable(err));
                }
                log::warn!(
                    "sale transaction contention on merchandise {}, retrying (attempt {})",
                    sale.merchandise_id,
                    attempt
                );
                tokio::time::sleep(Duration::from_millis(25 * attempt)).await;
            }
            result => return result,
        }
    }
}

async fn record_sale_once(db: &Database, sale: &NewSale) -> Result<SaleRecord, AppError> {
    let mut tx = db.begin().await?;

    let consumer_id: Option<i64> = sqlx::query_scalar("SELECT id FROM consumers WHERE id = ?")
        .bind(sale.consumer_id)
        .fetch_optional(&mut *tx)
        .await?;
    if consumer_id.is_none() {
        return Err(AppError::ConsumerNotFound(sale.consumer_id));
    }

    // Price at time of sale; later price edits never touch this record.
    let unit_price: f64 = sqlx::query_scalar("SELECT price FROM merchandise WHERE id = ?")
        .bind(sale.merchandise_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::ItemNotFound(sale.merchandise_id))?;

    inventory::reserve_and_decrement(&mut tx, sale.merchandise_id, sale.quantity_sold).await?;

    let total_price = unit_price * sale.quantity_sold as f64;
    let sale_date = Utc::now();
    let result = sqlx::query(
        "INSERT INTO sales (merchandise_id, consumer_id, quantity_sold, unit_price, total_price, sale_date)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(sale.merchandise_id)
    .bind(sale.consumer_id)
    .bind(sale.quantity_sold)
    .bind(unit_price)
    .bind(total_price)
    .bind(sale_date)
    .execute(&mut *tx)
    .await?;

    tx.commit().await?;

    log::debug!(
        "recorded sale {} of merchandise {} x{}",
        result.last_insert_rowid(),
        sale.merchandise_id,
        sale.quantity_sold
    );

    Ok(SaleRecord {
        id: result.last_insert_rowid(),
        merchandise_id: sale.merchandise_id,
        consumer_id: sale.consumer_id,
        quantity_sold: sale.quantity_sold,
        unit_price,
        total_price,
        sale_date,
    })
}
