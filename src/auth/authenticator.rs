//! Credential resolution against the token store

use super::credential::{Credential, parse_authorization};
use super::types::{AuthenticatedUser, Identity};
use crate::storage::{Scope, StorageLayer, StoreError};
use crate::utils::error::{ApiError, Result};
use tracing::debug;

/// Turns an `Authorization` header into an [`Identity`]
#[derive(Debug, Clone)]
pub struct Authenticator {
    storage: StorageLayer,
}

impl Authenticator {
    pub fn new(storage: StorageLayer) -> Self {
        Self { storage }
    }

    /// Resolve the request principal.
    ///
    /// Absent header is anonymous. Malformed, unknown or expired tokens are
    /// [`ApiError::InvalidCredential`]; any other store failure, including
    /// the query deadline, is internal.
    pub async fn authenticate(&self, header: Option<&str>) -> Result<Identity> {
        let token = match parse_authorization(header)? {
            Credential::Absent => return Ok(Identity::Anonymous),
            Credential::Bearer(token) => token,
        };

        let lookup = self
            .storage
            .bounded(self.storage.users().get_for_token(Scope::Authentication, token))
            .await;

        match lookup {
            Ok(user) => {
                debug!(user_id = user.id, "Request authenticated");
                Ok(Identity::User(AuthenticatedUser::from(user)))
            }
            Err(StoreError::NotFound) => Err(ApiError::InvalidCredential),
            Err(e) => Err(ApiError::Store(e)),
        }
    }
}
