//! FlavorForge client core
//!
//! Probes the backend once at startup, restores or establishes a session and
//! loads the recipe lists shown on the dashboard.

pub mod alert;
pub mod backend;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod io;
pub mod manifest;
pub mod probe;
pub mod session;

pub use config::{load_config, Config};
pub use dashboard::{Dashboard, DashboardView, LoadOutcome, Tab};
pub use error::{AppError, Result};
pub use session::{App, Connectivity, Screen};

use std::sync::Arc;

use crate::backend::Recipe;
use crate::io::{HttpClient, ReqwestHttpClient};
use crate::session::{DEMO_EMAIL, DEMO_PASSWORD};

/// Email and password to sign in with
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn demo() -> Self {
        Self {
            email: DEMO_EMAIL.to_string(),
            password: DEMO_PASSWORD.to_string(),
        }
    }
}

/// What a single client run should do after bootstrap
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub credentials: Option<Credentials>,
    pub tab: Tab,
}

/// Bootstrap, optionally sign in, then print the selected recipe list
pub async fn run(config: Config, options: RunOptions) -> Result<()> {
    let http: Arc<dyn HttpClient> = Arc::new(ReqwestHttpClient::with_timeout(
        config.request_timeout,
    )?);
    let app = App::from_config(&config, http);

    let mut screen = app.bootstrap().await;
    println!(
        "Backend {}: {}",
        config.health_url(),
        app.connectivity().await.label()
    );

    if let (Screen::Landing, Some(credentials)) = (&screen, &options.credentials) {
        screen = app.login(&credentials.email, &credentials.password).await;
    }

    let user = match screen {
        Screen::Dashboard(user) => user,
        Screen::Landing | Screen::Loading => {
            println!("Not signed in. Pass --demo or --email and --password to sign in.");
            return Ok(());
        }
    };
    println!("Signed in as {} <{}>", user.name, user.email);

    let dashboard = app.dashboard().await.ok_or(AppError::NotAuthenticated)?;
    dashboard.select_tab(options.tab).await;

    let state = dashboard.state();
    let state = state.read().await;
    println!("\n{}", options.tab);
    match state.view() {
        DashboardView::Loading => println!("Loading..."),
        DashboardView::Error(message) => println!("{}", message),
        DashboardView::Empty => println!("No recipes found."),
        DashboardView::Recipes(recipes) => {
            for recipe in recipes {
                println!("{}", recipe_line(recipe));
            }
        }
    }

    Ok(())
}

fn recipe_line(recipe: &Recipe) -> String {
    format!(
        "  {:<32} {:<20} {}",
        recipe.title,
        recipe.author_name(),
        recipe.category_label()
    )
}
