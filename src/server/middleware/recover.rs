//! Panic isolation middleware

use super::helpers::{current_request_id, log_internal_error};
use crate::core::background::panic_message;
use crate::utils::error::ApiError;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{self, HeaderValue};
use actix_web::http::{Method, StatusCode, Uri};
use actix_web::{HttpResponse, ResponseError};
use futures::FutureExt;
use futures::future::{Ready, ready};
use std::any::Any;
use std::fmt;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::pin::Pin;
use tracing::error;

/// Turns a panic anywhere below it into a generic 500 and closes the
/// connection. Also logs every internal error response that passes through.
pub struct RecoverPanic;

impl<S, B> Transform<S, ServiceRequest> for RecoverPanic
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = RecoverPanicService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RecoverPanicService { service }))
    }
}

/// Service implementation for panic isolation
pub struct RecoverPanicService<S> {
    service: S,
}

/// What is kept of a request for logging once it has been handed on
struct RequestContext {
    request_id: Option<String>,
    method: Method,
    uri: Uri,
}

impl<S, B> Service<ServiceRequest> for RecoverPanicService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        // The router needs sole ownership of the request, so no HttpRequest
        // clone may outlive this call.
        let context = RequestContext {
            request_id: current_request_id(&req),
            method: req.method().clone(),
            uri: req.uri().clone(),
        };
        let called = panic::catch_unwind(AssertUnwindSafe(|| self.service.call(req)));

        Box::pin(async move {
            let fut = match called {
                Ok(fut) => fut,
                Err(payload) => return Err(recovered(&context, payload)),
            };

            match AssertUnwindSafe(fut).catch_unwind().await {
                Ok(Ok(res)) => {
                    log_internal_error(&res);
                    Ok(res)
                }
                Ok(Err(err)) => {
                    if let Some(api_error) = err.as_error::<ApiError>().filter(|e| e.is_internal()) {
                        error!(
                            request_id = context.request_id.as_deref().unwrap_or("-"),
                            method = %context.method,
                            uri = %context.uri,
                            error = %api_error,
                            "Internal error while serving request"
                        );
                    }
                    Err(err)
                }
                Err(payload) => Err(recovered(&context, payload)),
            }
        })
    }
}

fn recovered(context: &RequestContext, payload: Box<dyn Any + Send>) -> actix_web::Error {
    error!(
        request_id = context.request_id.as_deref().unwrap_or("-"),
        method = %context.method,
        uri = %context.uri,
        panic = %panic_message(payload.as_ref()),
        "Request handler panicked"
    );
    HandlerPanicked.into()
}

/// Rendered as the generic internal error on a connection that is then closed
#[derive(Debug)]
struct HandlerPanicked;

impl fmt::Display for HandlerPanicked {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "request handler panicked")
    }
}

impl ResponseError for HandlerPanicked {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        let err = ApiError::internal(self.to_string());
        let mut response = HttpResponse::build(self.status_code())
            .force_close()
            .json(err.envelope());
        response
            .headers_mut()
            .insert(header::CONNECTION, HeaderValue::from_static("close"));
        response
    }
}
