use axum::{routing::get, Json, Router};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::{DbPool, features::scheduler::Scheduler};

pub mod reviews;

pub fn app_router(pool: DbPool, scheduler: Arc<Scheduler>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api", reviews::reviews_router(pool, scheduler))
}

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
