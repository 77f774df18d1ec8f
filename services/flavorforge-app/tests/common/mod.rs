//! In-memory doubles for the backend, the health endpoint and alerts

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use flavorforge_app::alert::Alerter;
use flavorforge_app::backend::{Author, Page, Recipe, RecipeBackend, RecordId, RecordQuery, User};
use flavorforge_app::io::{HttpClient, HttpResponse};
use flavorforge_app::session::{DEMO_EMAIL, DEMO_PASSWORD};
use flavorforge_app::AppError;

pub const HEALTH_BODY: &str = r#"{"status":"ok","timestamp":"2025-01-01T00:00:00.000Z","appId":"flavorforge-web","manifest":"running","version":"1.0.0"}"#;

pub fn chef() -> User {
    User {
        id: RecordId::Number(1),
        name: "Chef Demo".to_string(),
        email: DEMO_EMAIL.to_string(),
        avatar: None,
    }
}

pub fn recipe(id: i64, title: &str, author: &User, status: &str) -> Recipe {
    Recipe {
        id: RecordId::Number(id),
        title: title.to_string(),
        status: Some(status.to_string()),
        author: Some(Author {
            id: Some(author.id.clone()),
            name: author.name.clone(),
        }),
        categories: Vec::new(),
        main_image: None,
        published_at: None,
        created_at: None,
        extra: BTreeMap::new(),
    }
}

/// Backend with one account and a fixed set of recipes
#[derive(Debug)]
pub struct FakeBackend {
    account: User,
    password: String,
    signed_in: AtomicBool,
    recipes: Mutex<Vec<Recipe>>,
    pub fail_queries: AtomicBool,
    pub fail_logout: AtomicBool,
    current_user_calls: AtomicUsize,
    queries: Mutex<Vec<RecordQuery>>,
}

impl Default for FakeBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeBackend {
    pub fn new() -> Self {
        Self {
            account: chef(),
            password: DEMO_PASSWORD.to_string(),
            signed_in: AtomicBool::new(false),
            recipes: Mutex::new(Vec::new()),
            fail_queries: AtomicBool::new(false),
            fail_logout: AtomicBool::new(false),
            current_user_calls: AtomicUsize::new(0),
            queries: Mutex::new(Vec::new()),
        }
    }

    pub fn account(&self) -> &User {
        &self.account
    }

    pub fn sign_in(&self) {
        self.signed_in.store(true, Ordering::SeqCst);
    }

    pub fn add_recipe(&self, recipe: Recipe) {
        self.recipes.lock().unwrap().push(recipe);
    }

    pub fn recipe_count(&self) -> usize {
        self.recipes.lock().unwrap().len()
    }

    pub fn current_user_calls(&self) -> usize {
        self.current_user_calls.load(Ordering::SeqCst)
    }

    pub fn queries(&self) -> Vec<RecordQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn matches(recipe: &Recipe, query: &RecordQuery) -> bool {
        query.filter.iter().all(|(field, value)| match field.as_str() {
            "status" => recipe.status.as_deref() == Some(value.as_str()),
            "authorId" => recipe
                .author
                .as_ref()
                .and_then(|a| a.id.as_ref())
                .is_some_and(|id| id.to_string() == *value),
            _ => true,
        })
    }
}

#[async_trait]
impl RecipeBackend for FakeBackend {
    async fn current_user(&self) -> flavorforge_app::Result<User> {
        self.current_user_calls.fetch_add(1, Ordering::SeqCst);
        if self.signed_in.load(Ordering::SeqCst) {
            Ok(self.account.clone())
        } else {
            Err(AppError::NotAuthenticated)
        }
    }

    async fn login(&self, email: &str, password: &str) -> flavorforge_app::Result<()> {
        if email == self.account.email && password == self.password {
            self.signed_in.store(true, Ordering::SeqCst);
            Ok(())
        } else {
            Err(AppError::Status {
                status: 401,
                body: "Invalid credentials".to_string(),
            })
        }
    }

    async fn logout(&self) -> flavorforge_app::Result<()> {
        if self.fail_logout.load(Ordering::SeqCst) {
            return Err(AppError::Backend("session store offline".to_string()));
        }
        self.signed_in.store(false, Ordering::SeqCst);
        Ok(())
    }

    async fn query(
        &self,
        _collection: &str,
        query: &RecordQuery,
    ) -> flavorforge_app::Result<Page<Recipe>> {
        self.queries.lock().unwrap().push(query.clone());
        if self.fail_queries.load(Ordering::SeqCst) {
            return Err(AppError::Status {
                status: 500,
                body: "database unavailable".to_string(),
            });
        }

        let data = self
            .recipes
            .lock()
            .unwrap()
            .iter()
            .filter(|recipe| Self::matches(recipe, query))
            .cloned()
            .collect();
        Ok(Page::of(data))
    }
}

/// Health endpoint that is either up or refuses connections
#[derive(Debug)]
pub struct StubHealth {
    pub reachable: bool,
}

#[async_trait]
impl HttpClient for StubHealth {
    async fn get(&self, url: &str, _headers: &[(&str, &str)]) -> flavorforge_app::Result<HttpResponse> {
        if self.reachable {
            Ok(HttpResponse {
                status: 200,
                body: HEALTH_BODY.to_string(),
            })
        } else {
            Err(AppError::Http(format!("GET {} failed: connection refused", url)))
        }
    }

    async fn post_json(
        &self,
        url: &str,
        _headers: &[(&str, &str)],
        _body: &serde_json::Value,
    ) -> flavorforge_app::Result<HttpResponse> {
        Err(AppError::Http(format!("POST {} not expected", url)))
    }
}

/// Remembers every alert raised
#[derive(Debug, Default)]
pub struct RecordingAlerter {
    alerts: Mutex<Vec<String>>,
}

impl RecordingAlerter {
    pub fn alerts(&self) -> Vec<String> {
        self.alerts.lock().unwrap().clone()
    }
}

impl Alerter for RecordingAlerter {
    fn alert(&self, message: &str) {
        self.alerts.lock().unwrap().push(message.to_string());
    }
}
