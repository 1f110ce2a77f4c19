use chrono::Utc;
use sqlx::{Sqlite, Transaction};

use crate::error::AppError;

/// Checks stock and decrements it as one unit inside the caller's open
/// transaction. Returns the new quantity on hand.
///
/// The read and the guarded UPDATE share the transaction's snapshot, so a
/// concurrent sale against the same item either serializes behind this one
/// or fails the store's lock and is retried by the coordinator.
pub async fn reserve_and_decrement(
    tx: &mut Transaction<'_, Sqlite>,
    merchandise_id: i64,
    quantity: i64,
) -> Result<i64, AppError> {
    let on_hand: i64 = sqlx::query_scalar("SELECT quantity FROM merchandise WHERE id = ?")
        .bind(merchandise_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::ItemNotFound(merchandise_id))?;

    if on_hand < quantity {
        return Err(AppError::InsufficientStock {
            requested: quantity,
            available: on_hand,
        });
    }

    let result = sqlx::query(
        "UPDATE merchandise
         SET quantity = quantity - ?, updated_at = ?
         WHERE id = ? AND quantity >= ?",
    )
    .bind(quantity)
    .bind(Utc::now())
    .bind(merchandise_id)
    .bind(quantity)
    .execute(&mut **tx)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::InsufficientStock {
            requested: quantity,
            available: on_hand,
        });
    }

    Ok(on_hand - quantity)
}
