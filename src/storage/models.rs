//! Records exchanged with the persistence collaborators

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeSet;
use std::fmt;

/// Registered account
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    pub name: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
    pub activated: bool,
    #[serde(skip)]
    pub version: i32,
}

impl User {
    /// A user record that has not been inserted yet
    pub fn new(name: String, email: String, password_hash: String) -> Self {
        Self {
            id: 0,
            created_at: Utc::now(),
            name,
            email,
            password_hash,
            activated: false,
            version: 1,
        }
    }
}

/// What a token grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Activation,
    Authentication,
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scope::Activation => write!(f, "activation"),
            Scope::Authentication => write!(f, "authentication"),
        }
    }
}

/// A freshly issued token; only the hash is ever persisted
#[derive(Debug, Clone, Serialize)]
pub struct Token {
    #[serde(rename = "token")]
    pub plaintext: String,
    #[serde(skip)]
    pub hash: String,
    #[serde(skip)]
    pub user_id: i64,
    pub expiry: DateTime<Utc>,
    #[serde(skip)]
    pub scope: Scope,
}

/// Permission codes held by a user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Permissions(BTreeSet<String>);

impl Permissions {
    pub fn includes(&self, code: &str) -> bool {
        self.0.contains(code)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Permissions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Movie running time in minutes, rendered as `"<n> mins"`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Runtime(pub i32);

impl Serialize for Runtime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("{} mins", self.0))
    }
}

impl<'de> Deserialize<'de> for Runtime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let invalid = || serde::de::Error::custom("invalid runtime format");

        let mut parts = raw.split(' ');
        let (Some(minutes), Some("mins"), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(invalid());
        };
        minutes.parse().map(Runtime).map_err(|_| invalid())
    }
}

/// Catalogue entry
#[derive(Debug, Clone, Serialize)]
pub struct Movie {
    pub id: i64,
    #[serde(skip)]
    pub created_at: DateTime<Utc>,
    pub title: String,
    #[serde(skip_serializing_if = "is_zero")]
    pub year: i32,
    #[serde(skip_serializing_if = "is_zero_runtime")]
    pub runtime: Runtime,
    pub genres: Vec<String>,
    pub version: i32,
}

fn is_zero(value: &i32) -> bool {
    *value == 0
}

fn is_zero_runtime(value: &Runtime) -> bool {
    value.0 == 0
}

/// Column a movie listing is ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortColumn {
    Id,
    Title,
    Year,
    Runtime,
}

/// Listing parameters, already validated by the handler
#[derive(Debug, Clone)]
pub struct MovieFilters {
    pub title: String,
    pub genres: Vec<String>,
    pub page: u32,
    pub page_size: u32,
    pub sort: String,
}

impl Default for MovieFilters {
    fn default() -> Self {
        Self {
            title: String::new(),
            genres: Vec::new(),
            page: 1,
            page_size: 20,
            sort: "id".to_string(),
        }
    }
}

impl MovieFilters {
    pub const SORT_SAFELIST: &'static [&'static str] = &[
        "id", "title", "year", "runtime", "-id", "-title", "-year", "-runtime",
    ];

    /// Sort column and whether it is descending
    pub fn sort_column(&self) -> (SortColumn, bool) {
        let descending = self.sort.starts_with('-');
        let column = match self.sort.trim_start_matches('-') {
            "title" => SortColumn::Title,
            "year" => SortColumn::Year,
            "runtime" => SortColumn::Runtime,
            _ => SortColumn::Id,
        };
        (column, descending)
    }

    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * self.page_size as usize
    }
}

/// Pagination metadata; empty when no records matched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Metadata {
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub current_page: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub page_size: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub first_page: u32,
    #[serde(skip_serializing_if = "is_zero_u32")]
    pub last_page: u32,
    #[serde(skip_serializing_if = "is_zero_usize")]
    pub total_records: usize,
}

impl Metadata {
    pub fn calculate(total_records: usize, page: u32, page_size: u32) -> Self {
        if total_records == 0 {
            return Self::default();
        }

        let page_size_records = page_size.max(1) as usize;
        Self {
            current_page: page,
            page_size,
            first_page: 1,
            last_page: total_records.div_ceil(page_size_records) as u32,
            total_records,
        }
    }
}

fn is_zero_u32(value: &u32) -> bool {
    *value == 0
}

fn is_zero_usize(value: &usize) -> bool {
    *value == 0
}
