//! Handlers shared by every resource

use crate::server::state::AppState;
use crate::utils::error::{ApiError, Result};
use actix_web::{HttpRequest, HttpResponse, web};
use serde_json::json;

/// Health check endpoint
pub async fn healthcheck(state: web::Data<AppState>) -> Result<HttpResponse> {
    let status = if state.shutdown.is_draining() {
        "draining"
    } else {
        "available"
    };

    Ok(HttpResponse::Ok().json(json!({
        "status": status,
        "system_info": {
            "environment": state.config.server().environment,
            "version": crate::VERSION,
        }
    })))
}

/// Request, admission and background-work counters
pub async fn metrics(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(json!({
        "version": crate::VERSION,
        "timestamp": chrono::Utc::now().timestamp(),
        "state": state.shutdown.state().to_string(),
        "requests": state.metrics.snapshot(),
        "limiter": {
            "tracked_clients": state.clients.len(),
        },
        "background": {
            "outstanding_jobs": state.tracker.outstanding(),
        },
    })))
}

/// Fallback for paths no resource matches
pub async fn not_found() -> Result<HttpResponse> {
    Err(ApiError::NotFound)
}

/// Fallback for a known resource requested with an unsupported method
pub async fn method_not_allowed(req: HttpRequest) -> Result<HttpResponse> {
    Err(ApiError::MethodNotAllowed(req.method().to_string()))
}
