use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::error::ApiError;

pub mod pastes;
pub mod users;

pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": "dropkey-api",
        "timestamp": Utc::now().to_rfc3339()
    }))
}

/// Run a synchronous core call off the async runtime.
pub(crate) async fn blocking<T, F>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(ApiError::internal)?
}
