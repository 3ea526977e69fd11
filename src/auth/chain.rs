//! Ordered authorization gates

use super::types::{AuthState, Identity};
use crate::storage::StorageLayer;
use crate::utils::error::{ApiError, Result};

/// One precondition a route can demand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    Authenticated,
    Activated,
    Permission(String),
}

/// Linear list of gates evaluated in order, stopping at the first failure.
///
/// The constructors build the composed prefixes: a permission chain also
/// checks activation, which also checks authentication.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthorizationChain {
    gates: Vec<Gate>,
}

impl AuthorizationChain {
    /// Chain with no gates; every identity passes
    pub fn open() -> Self {
        Self::default()
    }

    pub fn authenticated() -> Self {
        Self {
            gates: vec![Gate::Authenticated],
        }
    }

    pub fn activated() -> Self {
        Self {
            gates: vec![Gate::Authenticated, Gate::Activated],
        }
    }

    pub fn permission<S: Into<String>>(code: S) -> Self {
        Self {
            gates: vec![
                Gate::Authenticated,
                Gate::Activated,
                Gate::Permission(code.into()),
            ],
        }
    }

    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Walk the gates for `identity`, returning the final state reached.
    ///
    /// Permission codes are fetched from the permission store at most once,
    /// and only when a permission gate is reached.
    pub async fn evaluate(&self, identity: &Identity, storage: &StorageLayer) -> Result<AuthState> {
        let mut state = AuthState::initial(identity);
        let mut granted = None;

        for gate in &self.gates {
            let user = match identity {
                Identity::Anonymous => return Err(ApiError::AuthenticationRequired),
                Identity::User(user) => user,
            };

            match gate {
                Gate::Authenticated => {}
                Gate::Activated => {
                    if !user.activated {
                        return Err(ApiError::InactiveAccount);
                    }
                    state = AuthState::Activated;
                }
                Gate::Permission(code) => {
                    if granted.is_none() {
                        granted = Some(
                            storage
                                .bounded(storage.permissions().get_all_for_user(user.id))
                                .await
                                .map_err(ApiError::Store)?,
                        );
                    }
                    let held = granted.as_ref().is_some_and(|p| p.includes(code));
                    if !held {
                        return Err(ApiError::NotPermitted);
                    }
                    state = AuthState::Permitted(code.clone());
                }
            }
        }

        Ok(state)
    }
}
