use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::AppError,
    models::{Consumer, ConsumerForm},
};

pub async fn list_consumers(State(db): State<Database>) -> Result<Json<Vec<Consumer>>, AppError> {
    let consumers = sqlx::query_as::<_, Consumer>("SELECT * FROM consumers ORDER BY name")
        .fetch_all(&db)
        .await?;

    Ok(Json(consumers))
}

pub async fn create_consumer(
    State(db): State<Database>,
    Json(form): Json<ConsumerForm>,
) -> Result<Json<Value>, AppError> {
    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO consumers (name, phone, address, notes, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&form.name)
    .bind(&form.phone)
    .bind(&form.address)
    .bind(&form.notes)
    .bind(now)
    .bind(now)
    .execute(&db)
    .await?;

    Ok(Json(json!({
        "id": result.last_insert_rowid(),
        "message": "Consumer added successfully"
    })))
}

pub async fn update_consumer(
    State(db): State<Database>,
    Path(consumer_id): Path<i64>,
    Json(form): Json<ConsumerForm>,
) -> Result<Json<Value>, AppError> {
    let result = sqlx::query(
        "UPDATE consumers
         SET name = ?, phone = ?, address = ?, notes = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&form.name)
    .bind(&form.phone)
    .bind(&form.address)
    .bind(&form.notes)
    .bind(Utc::now())
    .bind(consumer_id)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ConsumerNotFound(consumer_id));
    }

    Ok(Json(json!({ "message": "Consumer updated successfully" })))
}

pub async fn delete_consumer(
    State(db): State<Database>,
    Path(consumer_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    let sales_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE consumer_id = ?")
        .bind(consumer_id)
        .fetch_one(&db)
        .await?;
    if sales_count > 0 {
        return Err(AppError::ReferencedBySales("consumer"));
    }

    let result = sqlx::query("DELETE FROM consumers WHERE id = ?")
        .bind(consumer_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ConsumerNotFound(consumer_id));
    }

    Ok(Json(json!({ "message": "Consumer deleted successfully" })))
}
