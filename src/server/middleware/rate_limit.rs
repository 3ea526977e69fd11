//! Admission control middleware

use super::helpers::client_key;
use crate::server::state::AppState;
use crate::utils::error::{ApiError, Result as ApiResult};
use actix_web::body::EitherBody;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::web;
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;

/// Checks the global bucket, then the caller's bucket. Denials are
/// answered with 429 and never reach the inner service.
pub struct RateLimit;

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RateLimitService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitService { service }))
    }
}

/// Service implementation for admission control
pub struct RateLimitService<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RateLimitService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        if let Err(err) = admit(&req) {
            if let (ApiError::AdmissionDenied, Some(state)) =
                (&err, req.app_data::<web::Data<AppState>>())
            {
                state.metrics.record_denial();
            }
            let res = req.error_response(err).map_into_right_body();
            return Box::pin(async move { Ok(res) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}

fn admit(req: &ServiceRequest) -> ApiResult<()> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or_else(|| ApiError::internal("application state missing"))?;

    if !state.global_limiter.admit().is_allowed() {
        return Err(ApiError::AdmissionDenied);
    }

    if state.clients.is_enabled() {
        let key = client_key(req.peer_addr())?;
        if !state.clients.admit(&key).is_allowed() {
            return Err(ApiError::AdmissionDenied);
        }
    }

    Ok(())
}
