//! Helper functions for middleware

use super::request_id::RequestId;
use crate::utils::error::{ApiError, Result};
use actix_web::HttpMessage;
use actix_web::dev::ServiceResponse;
use std::net::SocketAddr;
use tracing::error;

/// Admission key for a connection: the IP of its peer address
pub fn client_key(peer_addr: Option<SocketAddr>) -> Result<String> {
    peer_addr
        .map(|addr| addr.ip().to_string())
        .ok_or_else(|| ApiError::internal("peer address unavailable"))
}

/// Request id recorded by [`RequestIdMiddleware`](super::RequestIdMiddleware), if any
pub fn current_request_id<M: HttpMessage>(msg: &M) -> Option<String> {
    msg.extensions().get::<RequestId>().map(|id| id.0.clone())
}

/// Log the detail of an internal error carried by a response
pub fn log_internal_error<B>(res: &ServiceResponse<B>) {
    let Some(err) = res.response().error() else {
        return;
    };

    if let Some(api_error) = err.as_error::<ApiError>().filter(|e| e.is_internal()) {
        error!(
            request_id = current_request_id(res.request()).as_deref().unwrap_or("-"),
            method = %res.request().method(),
            uri = %res.request().uri(),
            error = %api_error,
            "Internal error while serving request"
        );
    }
}
