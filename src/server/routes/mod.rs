//! Route registration
//!
//! Every resource answers unsupported methods with a 405 envelope; unknown
//! paths fall through to the app-level 404.

pub mod movies;
pub mod tokens;
pub mod users;

use super::handlers;
use super::middleware::Authorize;
use crate::auth::{MOVIES_READ, MOVIES_WRITE};
use actix_web::web;

/// Register every `/v1` resource
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/v1/healthcheck")
            .route(web::get().to(handlers::healthcheck))
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/metrics")
            .route(web::get().to(handlers::metrics))
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/movies")
            .route(
                web::get()
                    .to(movies::list_movies)
                    .wrap(Authorize::permission(MOVIES_READ)),
            )
            .route(
                web::post()
                    .to(movies::create_movie)
                    .wrap(Authorize::permission(MOVIES_WRITE)),
            )
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/movies/{id}")
            .route(
                web::get()
                    .to(movies::show_movie)
                    .wrap(Authorize::permission(MOVIES_READ)),
            )
            .route(
                web::patch()
                    .to(movies::update_movie)
                    .wrap(Authorize::permission(MOVIES_WRITE)),
            )
            .route(
                web::delete()
                    .to(movies::delete_movie)
                    .wrap(Authorize::permission(MOVIES_WRITE)),
            )
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/users")
            .route(web::post().to(users::register_user))
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/users/activated")
            .route(web::put().to(users::activate_user))
            .default_service(web::to(handlers::method_not_allowed)),
    )
    .service(
        web::resource("/v1/tokens/authentication")
            .route(web::post().to(tokens::create_authentication_token))
            .default_service(web::to(handlers::method_not_allowed)),
    );
}
