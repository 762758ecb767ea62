//! Verification runs against a conforming session service

use actix_web::http::StatusCode;
use session_harness::protocol::{contract, Credential, SessionClient};
use session_harness::testing::{setup, FakeSessionService};
use session_harness::verifier::{scenarios, SessionScope, SessionState};
use session_harness::{Harness, RunOptions};

#[actix_web::test]
async fn test_every_scenario_passes_against_conforming_service() {
    let service = FakeSessionService::start().await.unwrap();
    let harness = Harness::new(setup::config_for(&service));

    let report = harness.verify(&[], true).await.unwrap();

    assert!(report.is_success(), "unexpected failures:\n{}", report);
    assert_eq!(report.scenarios.len(), scenarios::all().len());
    assert_eq!(service.live_sessions(), 0, "teardown must log out every session");

    service.stop().await;
}

#[actix_web::test]
async fn test_run_without_provisioning_honors_scenario_selection() {
    let service = FakeSessionService::start().await.unwrap();
    let harness = Harness::new(setup::config_for(&service));

    let options = RunOptions {
        provision: false,
        readiness: false,
        scenarios: vec!["logout-invalidates".to_string()],
    };
    let report = harness.run(&options).await.unwrap();

    assert_eq!(report.scenarios.len(), 1);
    assert!(report.outcome("logout-invalidates").unwrap().passed);

    service.stop().await;
}

#[actix_web::test]
async fn test_unknown_scenario_is_rejected_before_any_request() {
    let service = FakeSessionService::start().await.unwrap();
    let harness = Harness::new(setup::config_for(&service));

    let result = harness.verify(&["no-such-scenario".to_string()], false).await;

    assert!(matches!(
        result,
        Err(session_harness::HarnessError::UnknownScenario(name)) if name == "no-such-scenario"
    ));
    assert_eq!(service.live_sessions(), 0);

    service.stop().await;
}

/// The literal sequence: authorize, private 200, logout ok, private 400
#[actix_web::test]
async fn test_literal_session_lifecycle() {
    let service = FakeSessionService::start().await.unwrap();
    let client = SessionClient::new(setup::config_for(&service).service);

    let reply = client.authorize(&Credential::fixture()).await.unwrap();
    let authorized = contract::authorization(&reply).unwrap();
    assert_eq!(authorized.token_type, "Bearer");
    let token = authorized.token();

    let reply = client.access_private(&token).await.unwrap();
    assert_eq!(reply.status, StatusCode::OK);

    let reply = client.logout(&token).await.unwrap();
    let logged_out = contract::logout(&reply).unwrap();
    assert!(logged_out.ok);
    assert!(!logged_out.session_id.is_empty());

    let reply = client.access_private(&token).await.unwrap();
    assert_eq!(reply.status, StatusCode::BAD_REQUEST);

    service.stop().await;
}

#[actix_web::test]
async fn test_session_scope_state_transitions() {
    let service = FakeSessionService::start().await.unwrap();
    let client = SessionClient::new(setup::config_for(&service).service);
    let mut scope = SessionScope::new(&client, Credential::fixture(), StatusCode::BAD_REQUEST);

    assert_eq!(scope.state(), &SessionState::Unauthenticated);
    assert!(scope.expect_access_granted().await.is_err(), "no token yet");

    let first = scope.authorize().await.unwrap().token();
    assert_eq!(scope.state(), &SessionState::Authenticated(first.clone()));

    // Repeat authorize keeps the held token.
    let again = scope.authorize().await.unwrap().token();
    assert_eq!(again, first);
    scope.expect_access_granted().await.unwrap();

    scope.logout().await.unwrap();
    assert_eq!(scope.state(), &SessionState::LoggedOut(first.clone()));
    scope.expect_access_rejected().await.unwrap();
    assert!(scope.logout().await.is_err(), "nothing left to log out");

    let second = scope.authorize().await.unwrap().token();
    assert_ne!(second, first);
    assert_eq!(service.live_sessions(), 1);

    scope.release().await.unwrap();
    assert_eq!(service.live_sessions(), 0);

    service.stop().await;
}

#[actix_web::test]
async fn test_wrong_secret_is_not_authorized() {
    let service = FakeSessionService::start().await.unwrap();
    let client = SessionClient::new(setup::config_for(&service).service);

    let credential = Credential::new(session_harness::protocol::types::FIXTURE_CLIENT_ID, "password2");
    let reply = client.authorize(&credential).await.unwrap();

    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
    assert!(contract::authorization(&reply).is_err());

    service.stop().await;
}
