use axum::{
    extract::{Path, State},
    response::Json,
};
use chrono::Utc;
use serde_json::{json, Value};

use crate::{
    database::Database,
    error::AppError,
    models::{MerchandiseForm, MerchandiseItem},
};

fn validate(form: &MerchandiseForm) -> Result<(), AppError> {
    if form.quantity < 0 {
        return Err(AppError::InvalidQuantity(form.quantity));
    }
    if form.price < 0.0 {
        return Err(AppError::InvalidPrice(form.price));
    }
    Ok(())
}

pub async fn list_merchandise(
    State(db): State<Database>,
) -> Result<Json<Vec<MerchandiseItem>>, AppError> {
    let items = sqlx::query_as::<_, MerchandiseItem>("SELECT * FROM merchandise ORDER BY name")
        .fetch_all(&db)
        .await?;

    Ok(Json(items))
}

pub async fn create_merchandise(
    State(db): State<Database>,
    Json(form): Json<MerchandiseForm>,
) -> Result<Json<Value>, AppError> {
    validate(&form)?;

    let now = Utc::now();
    let result = sqlx::query(
        "INSERT INTO merchandise (name, description, quantity, price, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?, ?)",
    )
    .bind(&form.name)
    .bind(&form.description)
    .bind(form.quantity)
    .bind(form.price)
    .bind(now)
    .bind(now)
    .execute(&db)
    .await?;

    Ok(Json(json!({
        "id": result.last_insert_rowid(),
        "message": "Merchandise added successfully"
    })))
}

pub async fn update_merchandise(
    State(db): State<Database>,
    Path(merchandise_id): Path<i64>,
    Json(form): Json<MerchandiseForm>,
) -> Result<Json<Value>, AppError> {
    validate(&form)?;

    let result = sqlx::query(
        "UPDATE merchandise
         SET name = ?, description = ?, quantity = ?, price = ?, updated_at = ?
         WHERE id = ?",
    )
    .bind(&form.name)
    .bind(&form.description)
    .bind(form.quantity)
    .bind(form.price)
    .bind(Utc::now())
    .bind(merchandise_id)
    .execute(&db)
    .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ItemNotFound(merchandise_id));
    }

    Ok(Json(json!({ "message": "Merchandise updated successfully" })))
}

pub async fn delete_merchandise(
    State(db): State<Database>,
    Path(merchandise_id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    // Sale history must stay reconcilable with the item it references.
    let sales_count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE merchandise_id = ?")
            .bind(merchandise_id)
            .fetch_one(&db)
            .await?;
    if sales_count > 0 {
        return Err(AppError::ReferencedBySales("merchandise"));
    }

    let result = sqlx::query("DELETE FROM merchandise WHERE id = ?")
        .bind(merchandise_id)
        .execute(&db)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::ItemNotFound(merchandise_id));
    }

    Ok(Json(json!({ "message": "Merchandise deleted successfully" })))
}
