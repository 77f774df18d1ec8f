//! BDD step definitions for the session feature

use std::sync::atomic::Ordering;

use cucumber::{given, then, when};
use flavorforge_app::session::LOGIN_FAILED_MESSAGE;
use flavorforge_app::Screen;

use crate::world::SessionWorld;

#[given("the backend is reachable")]
fn backend_reachable(world: &mut SessionWorld) {
    world.reachable = true;
}

#[given("the backend is unreachable")]
fn backend_unreachable(world: &mut SessionWorld) {
    world.reachable = false;
}

#[given("the demo chef already has a session")]
fn existing_session(world: &mut SessionWorld) {
    world.backend.sign_in();
}

#[given("the backend fails to end sessions")]
fn logout_fails(world: &mut SessionWorld) {
    world.backend.fail_logout.store(true, Ordering::SeqCst);
}

#[when("the client starts")]
async fn client_starts(world: &mut SessionWorld) {
    let screen = world.app().bootstrap().await;
    world.screen = Some(screen);
}

#[when("the user signs in with the demo account")]
async fn demo_login(world: &mut SessionWorld) {
    let screen = world.app().demo_login().await;
    world.screen = Some(screen);
}

#[when(expr = "the user signs in as {string} with password {string}")]
async fn login(world: &mut SessionWorld, email: String, password: String) {
    let screen = world.app().login(&email, &password).await;
    world.screen = Some(screen);
}

#[when("the user signs out")]
async fn logout(world: &mut SessionWorld) {
    let screen = world.app().logout().await;
    world.screen = Some(screen);
}

#[then(expr = "the connectivity indicator should read {string}")]
async fn connectivity_label(world: &mut SessionWorld, expected: String) {
    let connectivity = world.app().connectivity().await;
    assert_eq!(connectivity.label(), expected);
}

#[then("the landing screen should be shown")]
fn landing_shown(world: &mut SessionWorld) {
    assert_eq!(world.screen, Some(Screen::Landing));
}

#[then(expr = "the dashboard should be shown for {string}")]
fn dashboard_shown(world: &mut SessionWorld, name: String) {
    match &world.screen {
        Some(Screen::Dashboard(user)) => assert_eq!(user.name, name),
        other => panic!("expected dashboard, got {other:?}"),
    }
}

#[then("no session should be active")]
async fn no_session(world: &mut SessionWorld) {
    assert!(world.app().user().await.is_none());
}

#[then("the session should not have been queried")]
fn session_not_queried(world: &mut SessionWorld) {
    assert_eq!(world.backend.current_user_calls(), 0);
}

#[then("the login failure alert should be shown")]
fn login_alert(world: &mut SessionWorld) {
    assert_eq!(world.alerter.alerts(), vec![LOGIN_FAILED_MESSAGE.to_string()]);
}

#[then("no alert should be shown")]
fn no_alert(world: &mut SessionWorld) {
    assert!(world.alerter.alerts().is_empty());
}
