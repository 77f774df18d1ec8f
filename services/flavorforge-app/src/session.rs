//! Connectivity-gated session bootstrap, login and logout

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;

use crate::alert::{Alerter, ConsoleAlerter};
use crate::backend::{with_timeout, RecipeBackend, User};
use crate::config::Config;
use crate::dashboard::Dashboard;
use crate::io::HttpClient;
use crate::manifest::ManifestBackend;
use crate::probe::{ConnectivityProbe, HealthStatus};

pub const LOGIN_FAILED_MESSAGE: &str = "Login failed. Please check your credentials.";

/// Credentials of the demo account offered on the landing screen
pub const DEMO_EMAIL: &str = "chef@example.com";
pub const DEMO_PASSWORD: &str = "password123";

/// Result of the startup connectivity probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Connectivity {
    #[default]
    Unknown,
    Connected,
    Error,
}

impl Connectivity {
    /// Status indicator text
    pub fn label(self) -> &'static str {
        match self {
            Connectivity::Connected => "Connected",
            Connectivity::Unknown | Connectivity::Error => "Error",
        }
    }
}

/// Top-level screen
#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    Loading,
    Landing,
    Dashboard(User),
}

#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub connectivity: Connectivity,
    pub user: Option<User>,
    pub bootstrapped: bool,
    /// Last health report, when the probe succeeded
    pub health: Option<HealthStatus>,
}

impl SessionState {
    pub fn screen(&self) -> Screen {
        if !self.bootstrapped {
            return Screen::Loading;
        }
        match &self.user {
            Some(user) => Screen::Dashboard(user.clone()),
            None => Screen::Landing,
        }
    }
}

/// Thread-safe session state handle
pub type SessionHandle = Arc<RwLock<SessionState>>;

/// Client application core: owns the session and hands out dashboards
pub struct App {
    backend: Arc<dyn RecipeBackend>,
    probe: ConnectivityProbe,
    alerter: Arc<dyn Alerter>,
    timeout: Duration,
    state: SessionHandle,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("probe", &self.probe)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl App {
    pub fn new(
        backend: Arc<dyn RecipeBackend>,
        probe: ConnectivityProbe,
        alerter: Arc<dyn Alerter>,
        timeout: Duration,
    ) -> Self {
        Self {
            backend,
            probe,
            alerter,
            timeout,
            state: Arc::new(RwLock::new(SessionState::default())),
        }
    }

    /// Wire the Manifest backend and console alerts from configuration
    pub fn from_config(config: &Config, http: Arc<dyn HttpClient>) -> Self {
        let backend = Arc::new(ManifestBackend::new(&config.backend_url, Arc::clone(&http)));
        let probe = ConnectivityProbe::new(config, http);
        Self::new(
            backend,
            probe,
            Arc::new(ConsoleAlerter),
            config.request_timeout,
        )
    }

    pub fn state(&self) -> SessionHandle {
        Arc::clone(&self.state)
    }

    pub async fn screen(&self) -> Screen {
        self.state.read().await.screen()
    }

    pub async fn connectivity(&self) -> Connectivity {
        self.state.read().await.connectivity
    }

    pub async fn user(&self) -> Option<User> {
        self.state.read().await.user.clone()
    }

    /// Probe the backend, then restore an existing session if it answered
    pub async fn bootstrap(&self) -> Screen {
        let result = self.probe.probe().await;
        {
            let mut state = self.state.write().await;
            state.connectivity = if result.success {
                Connectivity::Connected
            } else {
                Connectivity::Error
            };
            state.health = result.status.clone();
        }

        let user = if result.success {
            match self.fetch_user().await {
                Ok(user) => {
                    tracing::info!("Restored session for {}", user.email);
                    Some(user)
                }
                Err(e) => {
                    tracing::info!("No active session: {}", e);
                    None
                }
            }
        } else {
            tracing::info!(
                "Backend unreachable, skipping session bootstrap: {}",
                result.error.as_deref().unwrap_or("unknown error")
            );
            None
        };

        let mut state = self.state.write().await;
        state.user = user;
        state.bootstrapped = true;
        state.screen()
    }

    /// Sign in; failure raises the login alert and leaves the session unset
    pub async fn login(&self, email: &str, password: &str) -> Screen {
        match self.authenticate(email, password).await {
            Ok(user) => {
                tracing::info!("Logged in as {}", user.email);
                let mut state = self.state.write().await;
                state.user = Some(user);
                state.bootstrapped = true;
                state.screen()
            }
            Err(e) => {
                tracing::warn!("Login failed for {}: {}", email, e);
                self.alerter.alert(LOGIN_FAILED_MESSAGE);
                self.screen().await
            }
        }
    }

    pub async fn demo_login(&self) -> Screen {
        self.login(DEMO_EMAIL, DEMO_PASSWORD).await
    }

    /// Sign out; the local session is cleared even if the backend call fails
    pub async fn logout(&self) -> Screen {
        if let Err(e) = with_timeout(self.timeout, "logout", self.backend.logout()).await {
            tracing::warn!("Logout failed, clearing local session anyway: {}", e);
        }

        let mut state = self.state.write().await;
        state.user = None;
        tracing::info!("Logged out");
        state.screen()
    }

    /// Data loader bound to this session; `None` without a signed-in user
    pub async fn dashboard(&self) -> Option<Dashboard> {
        self.state.read().await.user.as_ref()?;
        Some(Dashboard::new(
            Arc::clone(&self.backend),
            Arc::clone(&self.state),
            self.timeout,
        ))
    }

    async fn authenticate(&self, email: &str, password: &str) -> crate::Result<User> {
        with_timeout(self.timeout, "login", self.backend.login(email, password)).await?;
        match self.fetch_user().await {
            Ok(user) => Ok(user),
            Err(e) => {
                // the backend holds a session the client will not show
                if let Err(logout) =
                    with_timeout(self.timeout, "logout", self.backend.logout()).await
                {
                    tracing::warn!("Dropping half-open session failed: {}", logout);
                }
                Err(e)
            }
        }
    }

    async fn fetch_user(&self) -> crate::Result<User> {
        with_timeout(self.timeout, "current user", self.backend.current_user()).await
    }
}
