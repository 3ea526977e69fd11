//! Collaborator interfaces the request path depends on

use super::error::StoreError;
use super::models::{Metadata, Movie, MovieFilters, Permissions, Scope, Token, User};
use async_trait::async_trait;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insert a user, returning it with its assigned id
    async fn insert(&self, user: User) -> StoreResult<User>;

    async fn get_by_email(&self, email: &str) -> StoreResult<User>;

    /// Update a user if its version still matches, bumping the version
    async fn update(&self, user: User) -> StoreResult<User>;

    /// Resolve an unexpired token of the given scope to its owner
    async fn get_for_token(&self, scope: Scope, plaintext: &str) -> StoreResult<User>;
}

#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Issue and persist a new token valid for `ttl`
    async fn new_token(
        &self,
        user_id: i64,
        ttl: chrono::Duration,
        scope: Scope,
    ) -> StoreResult<Token>;

    async fn delete_all_for_user(&self, scope: Scope, user_id: i64) -> StoreResult<()>;
}

#[async_trait]
pub trait PermissionStore: Send + Sync {
    async fn get_all_for_user(&self, user_id: i64) -> StoreResult<Permissions>;

    /// Grant the given codes; unknown codes are ignored
    async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> StoreResult<()>;
}

#[async_trait]
pub trait MovieStore: Send + Sync {
    async fn insert(&self, movie: Movie) -> StoreResult<Movie>;

    async fn get(&self, id: i64) -> StoreResult<Movie>;

    async fn list(&self, filters: &MovieFilters) -> StoreResult<(Vec<Movie>, Metadata)>;

    /// Update a movie if its version still matches, bumping the version
    async fn update(&self, movie: Movie) -> StoreResult<Movie>;

    async fn delete(&self, id: i64) -> StoreResult<()>;
}
