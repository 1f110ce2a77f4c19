mod database;
mod error;
mod handlers;
mod models;
mod services;

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use dotenvy::dotenv;
use std::env;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use database::{create_database_pool, init_db, Database};

#[tokio::main]
async fn main() {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    // Initialize database
    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://salesmanager.db".to_string());

    let db = create_database_pool(&database_url)
        .await
        .expect("Failed to connect to database");

    init_db(&db).await.expect("Failed to initialize database");

    println!("Database connection successful!");

    // Build the application router
    let app = create_router(db);

    // Get port from environment or use default
    let port = env::var("PORT").unwrap_or_else(|_| "5000".to_string());
    let addr = format!("0.0.0.0:{}", port);

    println!("🚀 Sales Manager starting on http://{}", addr);

    // Start the server
    let listener = tokio::net::TcpListener::bind(&addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}

fn create_router(db: Database) -> Router {
    Router::new()
        // Merchandise routes
        .route("/api/merchandise", get(handlers::merchandise::list_merchandise))
        .route("/api/merchandise", post(handlers::merchandise::create_merchandise))
        .route("/api/merchandise/:id", put(handlers::merchandise::update_merchandise))
        .route("/api/merchandise/:id", delete(handlers::merchandise::delete_merchandise))
        // Consumer routes
        .route("/api/consumers", get(handlers::consumers::list_consumers))
        .route("/api/consumers", post(handlers::consumers::create_consumer))
        .route("/api/consumers/:id", put(handlers::consumers::update_consumer))
        .route("/api/consumers/:id", delete(handlers::consumers::delete_consumer))
        // Sales routes
        .route("/api/sales", get(handlers::sales::sales_history))
        .route("/api/sales", post(handlers::sales::record_sale))
        // Statistics
        .route("/api/statistics", get(handlers::reports::statistics))
        // Static files (browser UI)
        .fallback_service(ServeDir::new("static"))
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_support::{memory_pool, merchandise_quantity, seed_consumer, seed_merchandise};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn send(
        app: &Router,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let request = match body {
            Some(body) => Request::builder()
                .method(method)
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    #[tokio::test]
    async fn sale_round_trip_through_the_api() {
        let db = memory_pool().await;
        let item_id = seed_merchandise(&db, "Widget", 10, 5.0).await;
        let consumer_id = seed_consumer(&db, "Alice").await;
        let app = create_router(db.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({
                "merchandise_id": item_id,
                "consumer_id": consumer_id,
                "quantity_sold": 3
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["quantity_sold"], 3);
        assert_eq!(body["unit_price"], 5.0);
        assert_eq!(body["total_price"], 15.0);
        assert_eq!(merchandise_quantity(&db, item_id).await, 7);

        let (status, stats) = send(&app, Method::GET, "/api/statistics", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(stats["total_stock"], 7);
        assert_eq!(stats["total_sales_count"], 1);
        assert_eq!(stats["total_revenue"], 15.0);

        let (status, history) = send(&app, Method::GET, "/api/sales", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(history[0]["merchandise_name"], "Widget");
        assert_eq!(history[0]["consumer_name"], "Alice");
    }

    #[tokio::test]
    async fn oversell_returns_a_structured_error() {
        let db = memory_pool().await;
        let item_id = seed_merchandise(&db, "Widget", 2, 5.0).await;
        let consumer_id = seed_consumer(&db, "Alice").await;
        let app = create_router(db.clone());

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({
                "merchandise_id": item_id,
                "consumer_id": consumer_id,
                "quantity_sold": 5
            })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "InsufficientStock");
        assert_eq!(merchandise_quantity(&db, item_id).await, 2);
    }

    #[tokio::test]
    async fn unknown_references_map_to_not_found() {
        let db = memory_pool().await;
        let consumer_id = seed_consumer(&db, "Alice").await;
        let app = create_router(db);

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({
                "merchandise_id": 999,
                "consumer_id": consumer_id,
                "quantity_sold": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "ItemNotFound");
    }

    #[tokio::test]
    async fn merchandise_with_history_cannot_be_deleted() {
        let db = memory_pool().await;
        let item_id = seed_merchandise(&db, "Widget", 10, 5.0).await;
        let consumer_id = seed_consumer(&db, "Alice").await;
        let app = create_router(db);

        let (status, _) = send(
            &app,
            Method::POST,
            "/api/sales",
            Some(json!({
                "merchandise_id": item_id,
                "consumer_id": consumer_id,
                "quantity_sold": 1
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            Method::DELETE,
            &format!("/api/merchandise/{item_id}"),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "Cannot delete merchandise with existing sales records"
        );
    }

    #[tokio::test]
    async fn merchandise_crud_round_trip() {
        let db = memory_pool().await;
        let app = create_router(db);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/merchandise",
            Some(json!({
                "name": "Widget",
                "description": "A widget",
                "quantity": 10,
                "price": 5.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();

        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/merchandise/{id}"),
            Some(json!({
                "name": "Widget v2",
                "quantity": 12,
                "price": 6.0
            })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (status, items) = send(&app, Method::GET, "/api/merchandise", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(items[0]["name"], "Widget v2");
        assert_eq!(items[0]["quantity"], 12);

        let (status, _) = send(&app, Method::DELETE, &format!("/api/merchandise/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);

        let (_, items) = send(&app, Method::GET, "/api/merchandise", None).await;
        assert_eq!(items.as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn consumer_crud_round_trip() {
        let db = memory_pool().await;
        let app = create_router(db);

        let (status, created) = send(
            &app,
            Method::POST,
            "/api/consumers",
            Some(json!({ "name": "Alice", "phone": "555-0100" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let id = created["id"].as_i64().unwrap();

        let (status, consumers) = send(&app, Method::GET, "/api/consumers", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(consumers[0]["name"], "Alice");
        assert_eq!(consumers[0]["phone"], "555-0100");

        let (status, _) = send(&app, Method::DELETE, &format!("/api/consumers/{id}"), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
