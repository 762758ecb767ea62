//! Each contract breach of the fake service must fail the scenario that
//! covers it

use session_harness::report::RunReport;
use session_harness::testing::{setup, FakeSessionService, Fault};
use session_harness::Harness;

async fn run_against(fault: Fault, scenarios: &[&str]) -> RunReport {
    let service = FakeSessionService::start_with(fault).await.unwrap();
    let harness = Harness::new(setup::config_for(&service));
    let names: Vec<String> = scenarios.iter().map(|name| name.to_string()).collect();

    let report = harness.verify(&names, false).await.unwrap();

    service.stop().await;
    report
}

fn assert_failed_with(report: &RunReport, scenario: &str, needle: &str) {
    let outcome = report.outcome(scenario).unwrap();

    assert!(!outcome.passed, "{} should fail:\n{}", scenario, report);
    assert!(
        outcome.violations.iter().any(|v| v.contains(needle)),
        "expected a violation containing `{}`:\n{}",
        needle,
        report
    );
}

#[actix_web::test]
async fn test_token_changing_between_authorizes_is_caught() {
    let report = run_against(Fault::MintPerRequest, &["authorize", "authorize-idempotent"]).await;

    assert!(report.outcome("authorize").unwrap().passed);
    assert_failed_with(&report, "authorize-idempotent", "changed the token");
}

/// Both tokens handed out by a non-idempotent authorize are logged out
#[actix_web::test]
async fn test_superseded_token_is_released_at_teardown() {
    let service = FakeSessionService::start_with(Fault::MintPerRequest).await.unwrap();
    let harness = Harness::new(setup::config_for(&service));

    let report = harness
        .verify(&["authorize-idempotent".to_string()], false)
        .await
        .unwrap();

    assert_failed_with(&report, "authorize-idempotent", "changed the token");
    assert_eq!(
        report.outcome("authorize-idempotent").unwrap().violations.len(),
        1,
        "teardown must succeed:\n{}",
        report
    );
    assert_eq!(service.live_sessions(), 0, "superseded token leaked");

    service.stop().await;
}

#[actix_web::test]
async fn test_token_surviving_logout_is_caught() {
    let report = run_against(Fault::KeepSessionOnLogout, &["private-access", "logout-invalidates"]).await;

    assert!(report.outcome("private-access").unwrap().passed);
    assert_failed_with(&report, "logout-invalidates", "expected status 400, got 200");
}

#[actix_web::test]
async fn test_logout_not_ok_is_caught() {
    let report = run_against(Fault::LogoutNotOk, &["logout-invalidates"]).await;

    assert_failed_with(&report, "logout-invalidates", "`ok` is false");
}

#[actix_web::test]
async fn test_empty_session_id_is_caught() {
    let report = run_against(Fault::LogoutWithoutSessionId, &["logout-invalidates"]).await;

    assert_failed_with(&report, "logout-invalidates", "`session_id`");
}

#[actix_web::test]
async fn test_wrong_rejection_status_is_caught() {
    let report = run_against(Fault::RejectWithUnauthorized, &["logout-invalidates"]).await;

    assert_failed_with(&report, "logout-invalidates", "expected status 400, got 401");
}

#[actix_web::test]
async fn test_accepted_unknown_credential_is_caught() {
    let report = run_against(Fault::AcceptAnyCredential, &["authorize", "unknown-credential-rejected"]).await;

    assert!(report.outcome("authorize").unwrap().passed);
    assert_failed_with(&report, "unknown-credential-rejected", "was accepted with status 200");
}

#[actix_web::test]
async fn test_session_issued_to_unknown_credential_is_logged_out() {
    let service = FakeSessionService::start_with(Fault::AcceptAnyCredential).await.unwrap();
    let harness = Harness::new(setup::config_for(&service));

    let report = harness
        .verify(&["unknown-credential-rejected".to_string()], false)
        .await
        .unwrap();

    let outcome = report.outcome("unknown-credential-rejected").unwrap();
    assert!(!outcome.passed);
    assert!(
        outcome.violations.iter().all(|v| !v.contains("cleanup logout failed")),
        "{}",
        report
    );
    assert_eq!(service.live_sessions(), 0);

    service.stop().await;
}

#[actix_web::test]
async fn test_forged_token_accepted_is_caught() {
    let report = run_against(Fault::AcceptAnyBearer, &["private-access", "forged-token-rejected"]).await;

    assert!(report.outcome("private-access").unwrap().passed);
    assert_failed_with(&report, "forged-token-rejected", "expected status 400, got 200");
}

#[actix_web::test]
async fn test_missing_token_type_is_caught() {
    let report = run_against(Fault::OmitTokenType, &["authorize"]).await;

    assert_failed_with(&report, "authorize", "`token_type`");
}

#[actix_web::test]
async fn test_reissued_token_after_logout_is_caught() {
    let report = run_against(Fault::ReissueAfterLogout, &["logout-invalidates", "reauthorize-after-logout"]).await;

    assert!(report.outcome("logout-invalidates").unwrap().passed);
    assert_failed_with(&report, "reauthorize-after-logout", "equals the invalidated token");
}

#[actix_web::test]
async fn test_failing_scenario_does_not_stop_the_run() {
    let report = run_against(Fault::OmitTokenType, &[]).await;

    assert_eq!(report.scenarios.len(), 7);
    assert!(report.outcome("forged-token-rejected").unwrap().passed);
    assert!(report.outcome("unknown-credential-rejected").unwrap().passed);
    assert!(!report.is_success());
}
