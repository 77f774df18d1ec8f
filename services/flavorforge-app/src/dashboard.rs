//! Dashboard data loader: one recipe list per tab
//!
//! Each list moves through `Idle -> Loading -> Populated | Errored` on its own.
//! A load takes a [`LoadTicket`] stamped with the list's generation; when the
//! response arrives it is applied only if no newer load of the same list has
//! started in the meantime.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::backend::{with_timeout, Recipe, RecipeBackend, RecordQuery, User, RECIPES};
use crate::session::SessionHandle;

pub const ALL_RECIPES_ERROR: &str = "Could not load recipes. Please try again later.";
pub const MY_RECIPES_ERROR: &str = "Could not load your recipes. Please try again later.";

/// Which recipe list the dashboard shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Tab {
    #[default]
    AllRecipes,
    MyRecipes,
}

impl Tab {
    pub fn error_message(self) -> &'static str {
        match self {
            Tab::AllRecipes => ALL_RECIPES_ERROR,
            Tab::MyRecipes => MY_RECIPES_ERROR,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Tab::AllRecipes => write!(f, "All Recipes"),
            Tab::MyRecipes => write!(f, "My Recipes"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoadPhase {
    #[default]
    Idle,
    Loading,
    Populated,
    Errored(String),
}

/// Load phase of one list plus the records of its last successful load
#[derive(Debug, Clone, Default)]
pub struct RecipeList {
    phase: LoadPhase,
    records: Vec<Recipe>,
    generation: u64,
}

impl RecipeList {
    pub fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    pub fn records(&self) -> &[Recipe] {
        &self.records
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Identifies one load of one list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket {
    pub tab: Tab,
    pub generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was stored in its list
    Applied,
    /// A newer load of the same list had started; the response was dropped
    Stale,
    /// Nothing was requested
    Skipped,
}

/// What the active tab should display
#[derive(Debug, Clone, PartialEq)]
pub enum DashboardView<'a> {
    Loading,
    Error(&'a str),
    Empty,
    Recipes(&'a [Recipe]),
}

#[derive(Debug, Default)]
pub struct DashboardState {
    active_tab: Tab,
    all_recipes: RecipeList,
    my_recipes: RecipeList,
}

impl DashboardState {
    pub fn active_tab(&self) -> Tab {
        self.active_tab
    }

    pub fn list(&self, tab: Tab) -> &RecipeList {
        match tab {
            Tab::AllRecipes => &self.all_recipes,
            Tab::MyRecipes => &self.my_recipes,
        }
    }

    fn list_mut(&mut self, tab: Tab) -> &mut RecipeList {
        match tab {
            Tab::AllRecipes => &mut self.all_recipes,
            Tab::MyRecipes => &mut self.my_recipes,
        }
    }

    /// Make `tab` active without loading it
    pub fn activate(&mut self, tab: Tab) {
        self.active_tab = tab;
    }

    /// Make `tab` active and put its list into `Loading`
    pub fn begin_load(&mut self, tab: Tab) -> LoadTicket {
        self.active_tab = tab;
        let list = self.list_mut(tab);
        list.generation += 1;
        list.phase = LoadPhase::Loading;
        LoadTicket {
            tab,
            generation: list.generation,
        }
    }

    /// Store the result of the load identified by `ticket` unless it was superseded
    pub fn finish_load(
        &mut self,
        ticket: LoadTicket,
        result: crate::Result<Vec<Recipe>>,
    ) -> LoadOutcome {
        let list = self.list_mut(ticket.tab);
        if list.generation != ticket.generation {
            return LoadOutcome::Stale;
        }

        match result {
            Ok(records) => {
                list.records = records;
                list.phase = LoadPhase::Populated;
            }
            Err(_) => {
                list.phase = LoadPhase::Errored(ticket.tab.error_message().to_string());
            }
        }
        LoadOutcome::Applied
    }

    pub fn view(&self) -> DashboardView<'_> {
        let list = self.list(self.active_tab);
        match &list.phase {
            LoadPhase::Loading => DashboardView::Loading,
            LoadPhase::Errored(message) => DashboardView::Error(message),
            LoadPhase::Idle | LoadPhase::Populated if list.records.is_empty() => {
                DashboardView::Empty
            }
            LoadPhase::Idle | LoadPhase::Populated => DashboardView::Recipes(&list.records),
        }
    }
}

/// Thread-safe dashboard state handle
pub type DashboardHandle = Arc<RwLock<DashboardState>>;

/// Loads recipe lists for whoever is signed in when a load starts
pub struct Dashboard {
    backend: Arc<dyn RecipeBackend>,
    session: SessionHandle,
    timeout: Duration,
    state: DashboardHandle,
}

impl fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dashboard")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl Dashboard {
    pub fn new(backend: Arc<dyn RecipeBackend>, session: SessionHandle, timeout: Duration) -> Self {
        Self {
            backend,
            session,
            timeout,
            state: Arc::new(RwLock::new(DashboardState::default())),
        }
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.user.clone()
    }

    pub fn state(&self) -> DashboardHandle {
        Arc::clone(&self.state)
    }

    /// Switch to `tab` and load its list
    pub async fn select_tab(&self, tab: Tab) -> LoadOutcome {
        match tab {
            Tab::AllRecipes => self.load_all_recipes().await,
            Tab::MyRecipes => self.load_my_recipes().await,
        }
    }

    /// Reload the active tab
    pub async fn refresh(&self) -> LoadOutcome {
        let tab = self.state.read().await.active_tab();
        self.select_tab(tab).await
    }

    pub async fn load_all_recipes(&self) -> LoadOutcome {
        self.load(Tab::AllRecipes, RecordQuery::published_recipes())
            .await
    }

    /// No-op without a session
    pub async fn load_my_recipes(&self) -> LoadOutcome {
        let Some(user) = self.user().await else {
            tracing::debug!("No session, not loading {}", Tab::MyRecipes);
            self.state.write().await.activate(Tab::MyRecipes);
            return LoadOutcome::Skipped;
        };
        self.load(Tab::MyRecipes, RecordQuery::recipes_by(&user.id))
            .await
    }

    async fn load(&self, tab: Tab, query: RecordQuery) -> LoadOutcome {
        let ticket = self.state.write().await.begin_load(tab);
        tracing::debug!("Loading {} (generation {})", tab, ticket.generation);

        let result = with_timeout(
            self.timeout,
            "recipe query",
            self.backend.query(RECIPES, &query),
        )
        .await
        .map(|page| page.data);

        if let Err(e) = &result {
            tracing::warn!("Failed to load {}: {}", tab, e);
        }

        let outcome = self.state.write().await.finish_load(ticket, result);
        if outcome == LoadOutcome::Stale {
            tracing::debug!(
                "Discarded stale response for {} (generation {})",
                tab,
                ticket.generation
            );
        }
        outcome
    }
}
