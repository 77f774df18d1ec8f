//! BDD test world for the client core

use std::sync::Arc;
use std::time::Duration;

use cucumber::World;
use flavorforge_app::probe::ConnectivityProbe;
use flavorforge_app::{App, Config, Dashboard, LoadOutcome, Screen};

use crate::common::{FakeBackend, RecordingAlerter, StubHealth};

#[derive(Debug, Default, World)]
pub struct SessionWorld {
    pub backend: Arc<FakeBackend>,
    pub alerter: Arc<RecordingAlerter>,
    pub reachable: bool,

    pub app: Option<App>,
    pub screen: Option<Screen>,

    pub dashboard: Option<Dashboard>,
    pub last_outcome: Option<LoadOutcome>,
}

impl SessionWorld {
    /// The application under test, built on first use
    pub fn app(&mut self) -> &App {
        if self.app.is_none() {
            let probe = ConnectivityProbe::new(
                &Config::default(),
                Arc::new(StubHealth {
                    reachable: self.reachable,
                }),
            );
            self.app = Some(App::new(
                self.backend.clone(),
                probe,
                self.alerter.clone(),
                Duration::from_secs(5),
            ));
        }
        self.app.as_ref().expect("app just built")
    }
}
