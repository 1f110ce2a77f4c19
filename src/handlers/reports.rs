use axum::{extract::State, response::Json};

use crate::{database::Database, error::AppError, models::Statistics, services};

pub async fn statistics(State(db): State<Database>) -> Result<Json<Statistics>, AppError> {
    let stats = services::reports::statistics(&db).await?;
    Ok(Json(stats))
}
