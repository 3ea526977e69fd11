//! Identity attached to every request

use crate::storage::User;
use serde::Serialize;
use std::fmt;

/// Resolved user behind a valid bearer token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub activated: bool,
}

impl From<User> for AuthenticatedUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            activated: user.activated,
        }
    }
}

/// Principal of a request. Exactly one is attached per request and it is
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Identity {
    #[default]
    Anonymous,
    User(AuthenticatedUser),
}

impl Identity {
    pub fn is_anonymous(&self) -> bool {
        matches!(self, Identity::Anonymous)
    }

    pub fn user(&self) -> Option<&AuthenticatedUser> {
        match self {
            Identity::Anonymous => None,
            Identity::User(user) => Some(user),
        }
    }
}

/// Furthest point an identity reached in the authorization chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Authenticated,
    Activated,
    Permitted(String),
}

impl AuthState {
    /// State an identity holds before any gate runs
    pub fn initial(identity: &Identity) -> Self {
        match identity {
            Identity::Anonymous => AuthState::Anonymous,
            Identity::User(_) => AuthState::Authenticated,
        }
    }
}

impl fmt::Display for AuthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthState::Anonymous => write!(f, "anonymous"),
            AuthState::Authenticated => write!(f, "authenticated"),
            AuthState::Activated => write!(f, "activated"),
            AuthState::Permitted(code) => write!(f, "permitted({})", code),
        }
    }
}
