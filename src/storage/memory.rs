//! In-process store backing every collaborator trait

use super::error::StoreError;
use super::models::{Metadata, Movie, MovieFilters, Permissions, Scope, SortColumn, Token, User};
use super::traits::{MovieStore, PermissionStore, StoreResult, TokenStore, UserStore};
use crate::auth::tokens;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Permission codes the store knows how to grant
pub const KNOWN_PERMISSIONS: &[&str] = &["movies:read", "movies:write"];

#[derive(Debug, Clone)]
struct TokenRow {
    user_id: i64,
    expiry: DateTime<Utc>,
    scope: Scope,
}

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    next_user_id: i64,
    tokens: HashMap<String, TokenRow>,
    permissions: HashMap<i64, BTreeSet<String>>,
    movies: BTreeMap<i64, Movie>,
    next_movie_id: i64,
}

/// Memory-backed store; every method holds the table lock for one operation
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live token rows, expired ones included
    pub fn token_count(&self) -> usize {
        self.tables.read().tokens.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn insert(&self, mut user: User) -> StoreResult<User> {
        let mut tables = self.tables.write();

        if tables
            .users
            .values()
            .any(|u| u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::DuplicateEmail);
        }

        tables.next_user_id += 1;
        user.id = tables.next_user_id;
        user.created_at = Utc::now();
        user.version = 1;
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_by_email(&self, email: &str) -> StoreResult<User> {
        self.tables
            .read()
            .users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, mut user: User) -> StoreResult<User> {
        let mut tables = self.tables.write();

        if tables
            .users
            .values()
            .any(|u| u.id != user.id && u.email.eq_ignore_ascii_case(&user.email))
        {
            return Err(StoreError::DuplicateEmail);
        }

        let stored = tables
            .users
            .get_mut(&user.id)
            .ok_or(StoreError::EditConflict)?;
        if stored.version != user.version {
            return Err(StoreError::EditConflict);
        }

        user.version += 1;
        *stored = user.clone();
        Ok(user)
    }

    async fn get_for_token(&self, scope: Scope, plaintext: &str) -> StoreResult<User> {
        let hash = tokens::hash_token(plaintext);
        let tables = self.tables.read();

        let row = tables
            .tokens
            .get(&hash)
            .filter(|row| row.scope == scope && row.expiry > Utc::now())
            .ok_or(StoreError::NotFound)?;

        tables
            .users
            .get(&row.user_id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }
}

#[async_trait]
impl TokenStore for MemoryStore {
    async fn new_token(
        &self,
        user_id: i64,
        ttl: chrono::Duration,
        scope: Scope,
    ) -> StoreResult<Token> {
        let token = tokens::generate(user_id, ttl, scope);

        self.tables.write().tokens.insert(
            token.hash.clone(),
            TokenRow {
                user_id,
                expiry: token.expiry,
                scope,
            },
        );

        Ok(token)
    }

    async fn delete_all_for_user(&self, scope: Scope, user_id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .tokens
            .retain(|_, row| !(row.scope == scope && row.user_id == user_id));
        Ok(())
    }
}

#[async_trait]
impl PermissionStore for MemoryStore {
    async fn get_all_for_user(&self, user_id: i64) -> StoreResult<Permissions> {
        Ok(self
            .tables
            .read()
            .permissions
            .get(&user_id)
            .map(|codes| codes.iter().cloned().collect())
            .unwrap_or_default())
    }

    async fn add_for_user(&self, user_id: i64, codes: &[&str]) -> StoreResult<()> {
        let mut tables = self.tables.write();
        if !tables.users.contains_key(&user_id) {
            return Err(StoreError::NotFound);
        }

        let granted = tables.permissions.entry(user_id).or_default();
        for code in codes.iter().filter(|c| KNOWN_PERMISSIONS.contains(c)) {
            granted.insert((*code).to_string());
        }
        Ok(())
    }
}

#[async_trait]
impl MovieStore for MemoryStore {
    async fn insert(&self, mut movie: Movie) -> StoreResult<Movie> {
        let mut tables = self.tables.write();
        tables.next_movie_id += 1;
        movie.id = tables.next_movie_id;
        movie.created_at = Utc::now();
        movie.version = 1;
        tables.movies.insert(movie.id, movie.clone());
        Ok(movie)
    }

    async fn get(&self, id: i64) -> StoreResult<Movie> {
        if id < 1 {
            return Err(StoreError::NotFound);
        }
        self.tables
            .read()
            .movies
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn list(&self, filters: &MovieFilters) -> StoreResult<(Vec<Movie>, Metadata)> {
        let title_words: Vec<String> = filters
            .title
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();

        let mut matched: Vec<Movie> = {
            let tables = self.tables.read();
            tables
                .movies
                .values()
                .filter(|movie| matches_title(movie, &title_words))
                .filter(|movie| filters.genres.iter().all(|g| movie.genres.contains(g)))
                .cloned()
                .collect()
        };

        let (column, descending) = filters.sort_column();
        matched.sort_by(|a, b| {
            let primary = match column {
                SortColumn::Id => a.id.cmp(&b.id),
                SortColumn::Title => a.title.cmp(&b.title),
                SortColumn::Year => a.year.cmp(&b.year),
                SortColumn::Runtime => a.runtime.cmp(&b.runtime),
            };
            let primary = if descending { primary.reverse() } else { primary };
            primary.then(a.id.cmp(&b.id))
        });

        let total = matched.len();
        let page = matched
            .into_iter()
            .skip(filters.offset())
            .take(filters.page_size as usize)
            .collect();

        Ok((page, Metadata::calculate(total, filters.page, filters.page_size)))
    }

    async fn update(&self, mut movie: Movie) -> StoreResult<Movie> {
        let mut tables = self.tables.write();
        let stored = tables
            .movies
            .get_mut(&movie.id)
            .ok_or(StoreError::EditConflict)?;
        if stored.version != movie.version {
            return Err(StoreError::EditConflict);
        }

        movie.version += 1;
        *stored = movie.clone();
        Ok(movie)
    }

    async fn delete(&self, id: i64) -> StoreResult<()> {
        self.tables
            .write()
            .movies
            .remove(&id)
            .map(|_| ())
            .ok_or(StoreError::NotFound)
    }
}

/// Every query word must appear as a word of the title
fn matches_title(movie: &Movie, words: &[String]) -> bool {
    if words.is_empty() {
        return true;
    }
    let title: Vec<String> = movie
        .title
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    words.iter().all(|w| title.contains(w))
}
