use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Merchandise {0} not found")]
    ItemNotFound(i64),

    #[error("Consumer {0} not found")]
    ConsumerNotFound(i64),

    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    #[error("Invalid price: {0}")]
    InvalidPrice(f64),

    #[error("Insufficient quantity: requested {requested}, available {available}")]
    InsufficientStock { requested: i64, available: i64 },

    #[error("Cannot delete {0} with existing sales records")]
    ReferencedBySales(&'static str),

    /// Store contention that survived every retry.
    #[error("Store unavailable")]
    StoreUnavailable(#[source] sqlx::Error),

    #[error(transparent)]
    Store(#[from] sqlx::Error),
}

impl AppError {
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ItemNotFound(_) => "ItemNotFound",
            AppError::ConsumerNotFound(_) => "ConsumerNotFound",
            AppError::InvalidQuantity(_) => "InvalidQuantity",
            AppError::InvalidPrice(_) => "InvalidPrice",
            AppError::InsufficientStock { .. } => "InsufficientStock",
            AppError::ReferencedBySales(_) => "ReferencedBySales",
            AppError::StoreUnavailable(_) => "StoreUnavailable",
            AppError::Store(_) => "StoreError",
        }
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ItemNotFound(_) | AppError::ConsumerNotFound(_) => StatusCode::NOT_FOUND,
            AppError::InvalidQuantity(_)
            | AppError::InvalidPrice(_)
            | AppError::InsufficientStock { .. }
            | AppError::ReferencedBySales(_) => StatusCode::BAD_REQUEST,
            AppError::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if let AppError::Store(err) | AppError::StoreUnavailable(err) = &self {
            log::error!("store error: {}", err);
        }
        let body = Json(json!({
            "error": self.to_string(),
            "kind": self.kind(),
        }));
        (self.status_code(), body).into_response()
    }
}

/// SQLITE_BUSY / SQLITE_LOCKED family: safe to retry the whole transaction.
pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db) => matches!(
            db.code().as_deref(),
            Some("5") | Some("6") | Some("261") | Some("262") | Some("517")
        ),
        _ => false,
    }
}
