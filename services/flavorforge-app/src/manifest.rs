//! Manifest REST API client

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::backend::{Page, Recipe, RecipeBackend, RecordQuery, SortOrder, User};
use crate::io::HttpClient;
use crate::AppError;

/// Entity that users authenticate as
const AUTH_ENTITY: &str = "users";

#[derive(Debug, Deserialize)]
struct LoginResponse {
    token: String,
}

/// [`RecipeBackend`] backed by a Manifest instance
pub struct ManifestBackend {
    base_url: String,
    http: Arc<dyn HttpClient>,
    token: RwLock<Option<String>>,
}

impl std::fmt::Debug for ManifestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManifestBackend")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl ManifestBackend {
    pub fn new(base_url: &str, http: Arc<dyn HttpClient>) -> Self {
        let base_url = base_url.trim_end_matches('/').to_string();
        tracing::debug!("Created ManifestBackend at {}", base_url);
        Self {
            base_url,
            http,
            token: RwLock::new(None),
        }
    }

    #[cfg(test)]
    async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    fn auth_url(&self, action: &str) -> String {
        format!("{}/api/auth/{}/{}", self.base_url, AUTH_ENTITY, action)
    }

    /// URL of a collection listing with the query encoded as parameters
    pub fn collection_url(&self, collection: &str, query: &RecordQuery) -> crate::Result<String> {
        let base = format!("{}/api/collections/{}", self.base_url, collection);
        let mut url = reqwest::Url::parse(&base)
            .map_err(|e| AppError::Config(format!("Invalid collection URL {}: {}", base, e)))?;
        let params = query_params(query);
        if !params.is_empty() {
            url.query_pairs_mut().extend_pairs(params);
        }
        Ok(url.to_string())
    }

    async fn bearer(&self) -> Option<String> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|token| format!("Bearer {}", token))
    }
}

/// Manifest query parameters: `{field}_eq`, `relations`, `orderBy`, `order`, `perPage`
pub fn query_params(query: &RecordQuery) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = query
        .filter
        .iter()
        .map(|(field, value)| (format!("{}_eq", field), value.clone()))
        .collect();

    if !query.include.is_empty() {
        params.push(("relations".to_string(), query.include.join(",")));
    }

    if let Some(sort) = &query.sort {
        params.push(("orderBy".to_string(), sort.field.clone()));
        let order = match sort.order {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        };
        params.push(("order".to_string(), order.to_string()));
    }

    if let Some(per_page) = query.per_page {
        params.push(("perPage".to_string(), per_page.to_string()));
    }

    params
}

#[async_trait]
impl RecipeBackend for ManifestBackend {
    async fn current_user(&self) -> crate::Result<User> {
        let bearer = self.bearer().await.ok_or(AppError::NotAuthenticated)?;
        let response = self
            .http
            .get(&self.auth_url("me"), &[("Authorization", bearer.as_str())])
            .await?
            .error_for_status()?;
        Ok(serde_json::from_str(&response.body)?)
    }

    async fn login(&self, email: &str, password: &str) -> crate::Result<()> {
        tracing::debug!("Logging in as {}", email);
        let body = serde_json::json!({ "email": email, "password": password });
        let response = self
            .http
            .post_json(&self.auth_url("login"), &[], &body)
            .await?
            .error_for_status()?;

        let LoginResponse { token } = serde_json::from_str(&response.body)?;
        *self.token.write().await = Some(token);
        tracing::debug!("Logged in as {}", email);
        Ok(())
    }

    async fn logout(&self) -> crate::Result<()> {
        *self.token.write().await = None;
        tracing::debug!("Dropped Manifest session token");
        Ok(())
    }

    async fn query(&self, collection: &str, query: &RecordQuery) -> crate::Result<Page<Recipe>> {
        let url = self.collection_url(collection, query)?;
        let bearer = self.bearer().await;
        let headers: Vec<(&str, &str)> = bearer
            .as_deref()
            .map(|value| vec![("Authorization", value)])
            .unwrap_or_default();

        let response = self.http.get(&url, &headers).await?.error_for_status()?;
        let page: Page<Recipe> = serde_json::from_str(&response.body)?;
        tracing::debug!("{} returned {} records", collection, page.data.len());
        Ok(page)
    }
}
