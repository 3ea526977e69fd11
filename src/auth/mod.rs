//! Authentication and authorization
//!
//! Requests move through anonymous → authenticated → activated →
//! permitted(code). [`Authenticator`] performs the first transition from the
//! bearer credential; [`AuthorizationChain`] performs the rest per route.

pub mod authenticator;
pub mod chain;
pub mod credential;
pub mod password;
pub mod tokens;
pub mod types;


pub use authenticator::Authenticator;
pub use chain::{AuthorizationChain, Gate};
pub use types::{AuthState, AuthenticatedUser, Identity};

/// Permission required to read the catalogue
pub const MOVIES_READ: &str = "movies:read";
/// Permission required to change the catalogue
pub const MOVIES_WRITE: &str = "movies:write";
