//! HTTP server implementation
//!
//! Request admission, authentication and panic isolation live in
//! [`middleware`]; resources are registered by [`routes`].

pub mod handlers;
pub mod middleware;
pub mod routes;
#[allow(clippy::module_inception)]
pub mod server;
pub mod state;
mod utils;


pub use server::{HttpServer, create_app};
pub use state::AppState;
