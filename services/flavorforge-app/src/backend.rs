//! Backend collaborator: identity and record queries
//!
//! The application never talks to the recipe store directly. Everything goes
//! through [`RecipeBackend`], which production code backs with the Manifest
//! REST API and tests replace with doubles.

use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::AppError;

/// Collection holding recipe records
pub const RECIPES: &str = "recipes";

/// Record identifier; Manifest uses numbers or strings depending on version
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Number(i64),
    Text(String),
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordId::Number(n) => write!(f, "{}", n),
            RecordId::Text(s) => write!(f, "{}", s),
        }
    }
}

/// Resized variants of an uploaded image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSet {
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub medium: Option<String>,
}

/// The authenticated user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub avatar: Option<ImageSet>,
}

/// Author summary embedded in a recipe when requested
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<RecordId>,
    pub name: String,
}

/// A recipe record; attributes not modelled here are kept in `extra`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    pub id: RecordId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub author: Option<Author>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub main_image: Option<ImageSet>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Recipe {
    /// Comma-separated category names, or `Uncategorized`
    pub fn category_label(&self) -> String {
        if self.categories.is_empty() {
            "Uncategorized".to_string()
        } else {
            self.categories
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        }
    }

    pub fn author_name(&self) -> &str {
        self.author
            .as_ref()
            .map(|a| a.name.as_str())
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Chef")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sort {
    pub field: String,
    pub order: SortOrder,
}

/// Filter, relations, ordering and page size of a record query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordQuery {
    pub filter: Vec<(String, String)>,
    pub include: Vec<String>,
    pub sort: Option<Sort>,
    /// `None` leaves the page size to the backend
    pub per_page: Option<u32>,
}

impl RecordQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filter.push((field.into(), value.into()));
        self
    }

    pub fn include(mut self, relation: impl Into<String>) -> Self {
        self.include.push(relation.into());
        self
    }

    pub fn sort_desc(mut self, field: impl Into<String>) -> Self {
        self.sort = Some(Sort {
            field: field.into(),
            order: SortOrder::Desc,
        });
        self
    }

    pub fn per_page(mut self, per_page: u32) -> Self {
        self.per_page = Some(per_page);
        self
    }

    /// Published recipes with author and categories, newest first, 20 per page
    pub fn published_recipes() -> Self {
        Self::new()
            .filter("status", "published")
            .include("author")
            .include("categories")
            .sort_desc("publishedAt")
            .per_page(20)
    }

    /// Every recipe authored by `author_id` with categories, newest first
    pub fn recipes_by(author_id: &RecordId) -> Self {
        Self::new()
            .filter("authorId", author_id.to_string())
            .include("categories")
            .sort_desc("createdAt")
    }
}

/// One page of records returned by a query; pagination metadata is ignored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub data: Vec<T>,
}

impl<T> Page<T> {
    pub fn of(data: Vec<T>) -> Self {
        Self { data }
    }
}

/// Identity and data provider the application delegates to
#[async_trait]
#[cfg_attr(test, mockall::automock)]
pub trait RecipeBackend: Send + Sync {
    /// The signed-in user; fails when there is no session
    async fn current_user(&self) -> crate::Result<User>;

    /// Exchange credentials for a session
    async fn login(&self, email: &str, password: &str) -> crate::Result<()>;

    /// End the current session
    async fn logout(&self) -> crate::Result<()>;

    /// Query records of a collection
    async fn query(&self, collection: &str, query: &RecordQuery) -> crate::Result<Page<Recipe>>;
}

/// Bound `future` by `timeout`; expiry becomes [`AppError::Timeout`]
pub async fn with_timeout<T, F>(timeout: Duration, operation: &str, future: F) -> crate::Result<T>
where
    F: Future<Output = crate::Result<T>>,
{
    tokio::time::timeout(timeout, future)
        .await
        .map_err(|_| AppError::Timeout(format!("{} did not finish within {:?}", operation, timeout)))?
}
