//! HTTP server core implementation
//!
//! This module provides the HttpServer struct, the application factory and
//! the serve loop wrapped by the shutdown coordinator.

use super::handlers;
use super::middleware::{
    Authenticate, MetricsMiddleware, RateLimit, RecoverPanic, RequestIdMiddleware,
};
use super::routes;
use super::state::AppState;
use super::utils::format_bind_error;
use crate::config::{Config, CorsConfig};
use crate::utils::error::{ApiError, Result};
use actix_cors::Cors;
use actix_web::{
    App, HttpRequest, HttpServer as ActixHttpServer,
    error::{JsonPayloadError, PathError, QueryPayloadError},
    middleware::{DefaultHeaders, Logger},
    web,
};
use std::net::TcpListener;
use tracing::{info, warn};

/// Access log line; the request id comes from the response header
const ACCESS_LOG_FORMAT: &str = r#"%a "%r" %s %b %T %{x-request-id}o"#;

/// HTTP server
pub struct HttpServer {
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server. Must be called inside a Tokio runtime.
    pub fn new(config: Config) -> Self {
        info!("Creating HTTP server");
        Self {
            state: AppState::new(config),
        }
    }

    /// Create a server around prepared state
    pub fn with_state(state: AppState) -> Self {
        Self { state }
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Bind the configured address and serve until shutdown completes
    pub async fn start(self) -> Result<()> {
        let server_config = self.state.config.server();
        let bind_addr = server_config.address();
        let port = server_config.port;

        info!("Starting HTTP server on {}", bind_addr);
        let listener =
            TcpListener::bind(&bind_addr).map_err(|e| format_bind_error(e, &bind_addr, port))?;

        self.serve(listener).await
    }

    /// Serve on an already bound listener.
    ///
    /// Returns once the shutdown coordinator reports `Stopped` and the store
    /// has been released.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        let state = self.state;
        let server_config = state.config.server().clone();
        let local_addr = listener.local_addr()?;

        let data = web::Data::new(state.clone());
        let server = ActixHttpServer::new(move || create_app(data.clone()))
            .workers(server_config.worker_count())
            .shutdown_timeout(server_config.shutdown_timeout_secs)
            .disable_signals()
            .listen(listener)
            .map_err(|e| format_bind_error(e, &local_addr.to_string(), local_addr.port()))?
            .run();

        info!(address = %local_addr, "HTTP server listening");

        let sweeper = state.clients.is_enabled().then(|| {
            state
                .clients
                .spawn_sweeper(state.config.limiter().sweep_interval(), state.shutdown.subscribe())
        });

        let served = state.shutdown.run(server, &state.tracker).await;

        if let Some(sweeper) = sweeper {
            if let Err(e) = sweeper.await {
                warn!(error = %e, "Client registry sweeper did not exit cleanly");
            }
        }

        state.storage.close();

        served.map_err(|e| ApiError::server(format!("HTTP server failed: {}", e)))?;
        info!("HTTP server stopped");
        Ok(())
    }
}

/// Create the Actix-web application
pub fn create_app(
    state: web::Data<AppState>,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let cors = build_cors(&state.config.server().cors);
    let max_body_size = state.config.server().max_body_size;

    App::new()
        .app_data(state)
        .app_data(
            web::JsonConfig::default()
                .limit(max_body_size)
                .error_handler(json_error),
        )
        .app_data(web::PathConfig::default().error_handler(path_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .wrap(Authenticate)
        .wrap(cors)
        .wrap(RateLimit)
        .wrap(RecoverPanic)
        .wrap(RequestIdMiddleware)
        .wrap(DefaultHeaders::new().add(("Server", "Eiga")))
        .wrap(Logger::new(ACCESS_LOG_FORMAT))
        .wrap(MetricsMiddleware)
        .configure(routes::configure)
        .default_service(web::to(handlers::not_found))
}

fn build_cors(config: &CorsConfig) -> Cors {
    let mut cors = Cors::default();

    if !config.enabled {
        return cors;
    }

    if config.allows_all_origins() {
        cors = cors.allow_any_origin();
        config.validate().unwrap_or_else(|e| {
            warn!(error = %e, "CORS Configuration Warning");
        });
    } else {
        for origin in &config.trusted_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    let methods: Vec<actix_web::http::Method> = config
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();
    if !methods.is_empty() {
        cors = cors.allowed_methods(methods);
    }

    let headers: Vec<actix_web::http::header::HeaderName> = config
        .allowed_headers
        .iter()
        .filter_map(|h| h.parse().ok())
        .collect();
    if !headers.is_empty() {
        cors = cors.allowed_headers(headers);
    }

    cors.max_age(config.max_age as usize)
}

fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from(err).into()
}

fn path_error(err: PathError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from(err).into()
}

fn query_error(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::from(err).into()
}
