//! Authentication and authorization middleware

use crate::auth::{AuthorizationChain, Identity};
use crate::server::state::AppState;
use crate::utils::error::ApiError;
use actix_web::body::EitherBody;
use actix_web::dev::{Payload, Service, ServiceRequest, ServiceResponse, Transform, forward_ready};
use actix_web::http::header::{self, HeaderValue};
use actix_web::{FromRequest, HttpMessage, HttpRequest, web};
use futures::future::{Ready, ready};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use tracing::debug;

/// Resolves the bearer credential to an [`Identity`] and stores it in the
/// request extensions. Requests without a credential continue as
/// [`Identity::Anonymous`]; a bad credential ends the request with 401.
pub struct Authenticate;

impl<S, B> Transform<S, ServiceRequest> for Authenticate
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthenticateService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthenticateService {
            service: Rc::new(service),
        }))
    }
}

/// Service implementation for authentication
pub struct AuthenticateService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for AuthenticateService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let identity = match resolve_identity(&req).await {
                Ok(identity) => identity,
                Err(err) => {
                    debug!(error = %err, "Rejected request credential");
                    let mut res = req.error_response(err);
                    vary_on_authorization(res.headers_mut());
                    return Ok(res.map_into_right_body());
                }
            };

            req.extensions_mut().insert(identity);

            let mut res = service.call(req).await?;
            vary_on_authorization(res.headers_mut());
            Ok(res.map_into_left_body())
        })
    }
}

async fn resolve_identity(req: &ServiceRequest) -> Result<Identity, ApiError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| ApiError::internal("application state missing"))?;

    let header = match req.headers().get(header::AUTHORIZATION) {
        None => None,
        Some(value) => Some(
            value
                .to_str()
                .map_err(|_| ApiError::InvalidCredential)?
                .to_string(),
        ),
    };

    state.authenticator.authenticate(header.as_deref()).await
}

fn vary_on_authorization(headers: &mut header::HeaderMap) {
    headers.append(header::VARY, HeaderValue::from_static("Authorization"));
}

/// Per-route authorization gate. Must run inside [`Authenticate`].
pub struct Authorize {
    chain: Rc<AuthorizationChain>,
}

impl Authorize {
    pub fn new(chain: AuthorizationChain) -> Self {
        Self {
            chain: Rc::new(chain),
        }
    }

    /// Require an activated user holding `code`
    pub fn permission(code: &str) -> Self {
        Self::new(AuthorizationChain::permission(code))
    }

    /// Require an activated user
    pub fn activated() -> Self {
        Self::new(AuthorizationChain::activated())
    }
}

impl<S, B> Transform<S, ServiceRequest> for Authorize
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type InitError = ();
    type Transform = AuthorizeService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthorizeService {
            service: Rc::new(service),
            chain: Rc::clone(&self.chain),
        }))
    }
}

/// Service implementation for authorization
pub struct AuthorizeService<S> {
    service: Rc<S>,
    chain: Rc<AuthorizationChain>,
}

impl<S, B> Service<ServiceRequest> for AuthorizeService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = actix_web::Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = actix_web::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let chain = Rc::clone(&self.chain);

        Box::pin(async move {
            let identity = req.extensions().get::<Identity>().cloned().unwrap_or_default();

            let evaluated = match req.app_data::<web::Data<AppState>>().cloned() {
                Some(state) => chain.evaluate(&identity, &state.storage).await,
                None => Err(ApiError::internal("application state missing")),
            };

            match evaluated {
                Ok(reached) => {
                    debug!(state = %reached, "Request authorized");
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

/// Handlers take the request principal as an argument
impl FromRequest for Identity {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(req.extensions().get::<Identity>().cloned().unwrap_or_default()))
    }
}
