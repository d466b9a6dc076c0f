//! End-to-end checks through the library against a local server.

mod helpers;

use http_assert::{
    run_check, Assertion, CheckError, CheckOutcome, Config, ConfigError, HostMapping,
    HostMappings, RequestDescriptor, TransportErrorKind,
};
use tokio_util::sync::CancellationToken;

use helpers::{closed_port, start_test_server};

async fn check(
    config: &Config,
    url: &str,
    assertions: &[Assertion],
) -> Result<CheckOutcome, CheckError> {
    let request = RequestDescriptor::new("GET", url).expect("valid request");
    run_check(config, &request, assertions, &CancellationToken::new()).await
}

#[tokio::test]
async fn test_assert_ok_passes_on_204() {
    let addr = start_test_server().await;
    let outcome = check(
        &Config::default(),
        &format!("http://{addr}/no-content"),
        &[Assertion::StatusOk, Assertion::BodyEmpty],
    )
    .await
    .expect("response received");

    assert!(outcome.is_passed());
    assert_eq!(outcome.exit_code().code(), 0);
    assert_eq!(outcome.response().status(), 204);
}

#[tokio::test]
async fn test_assert_ok_fails_on_404() {
    let addr = start_test_server().await;
    let outcome = check(
        &Config::default(),
        &format!("http://{addr}/missing"),
        &[Assertion::StatusOk],
    )
    .await
    .expect("response received");

    let CheckOutcome::Failed {
        failures, report, ..
    } = &outcome
    else {
        panic!("expected failure, got {outcome:?}");
    };
    assert_eq!(outcome.exit_code().code(), 95);
    assert_eq!(
        failures.messages(),
        vec![r#"ok: expected OK, got 404 ("404 Not Found")"#.to_string()]
    );
    assert!(report.starts_with("1 assertions failed:\n- ok: expected OK, got 404"));
    assert!(report.contains(&format!("FAILED: GET http://{addr}/missing (HTTP/1.1)")));
    assert!(report.contains("GET /missing HTTP/1.1\n"));
    assert!(report.contains("HTTP/1.1 404 Not Found\n"));
    assert!(report.contains("no such page"));
}

#[tokio::test]
async fn test_all_failures_are_reported() {
    let addr = start_test_server().await;
    let assertions = vec![
        Assertion::StatusEquals(200),
        Assertion::header_equals("Content-Type", "text/html"),
        Assertion::body_matches(r#""status":"ok""#).expect("valid pattern"),
        Assertion::header_missing("Content-Type"),
    ];
    let outcome = check(
        &Config::default(),
        &format!("http://{addr}/json"),
        &assertions,
    )
    .await
    .expect("response received");

    let CheckOutcome::Failed { failures, .. } = outcome else {
        panic!("expected failure");
    };
    assert_eq!(
        failures.messages(),
        vec![
            r#"header[Content-Type]: expected "text/html", got ["application/json"]"#.to_string(),
            r#"header[Content-Type]: expected to be missing, got ["application/json"]"#
                .to_string(),
        ]
    );
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let addr = start_test_server().await;
    let outcome = check(
        &Config::default(),
        &format!("http://{addr}/redirect"),
        &[
            Assertion::redirect_equals("/next"),
            Assertion::redirect_matches("^/ne").expect("valid pattern"),
            Assertion::StatusEquals(302),
        ],
    )
    .await
    .expect("response received");

    assert!(outcome.is_passed(), "{outcome:?}");
}

#[tokio::test]
async fn test_host_mapping_keeps_host_header() {
    let addr = start_test_server().await;
    let config = Config {
        host_mappings: HostMappings::new(vec![HostMapping::new(
            "app.example.invalid:80",
            addr.to_string(),
        )]),
        ..Default::default()
    };

    let outcome = check(
        &config,
        "http://app.example.invalid/host",
        &[Assertion::body_equals("app.example.invalid")],
    )
    .await
    .expect("rerouted response");
    assert!(outcome.is_passed(), "{outcome:?}");
}

#[tokio::test]
async fn test_binary_body_is_hex_dumped_and_cropped() {
    let addr = start_test_server().await;
    let outcome = check(
        &Config::default(),
        &format!("http://{addr}/binary"),
        &[Assertion::BodyEmpty],
    )
    .await
    .expect("response received");

    let CheckOutcome::Failed { report, .. } = outcome else {
        panic!("expected failure");
    };
    assert!(report.contains(
        "00000000  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f  |................|\n"
    ));
    assert!(report.contains("<< Payload is cropped: 44 bytes are hidden >>"));
}

#[tokio::test]
async fn test_no_assertions_is_rejected_before_dialing() {
    let addr = closed_port().await;
    let err = check(&Config::default(), &format!("http://{addr}/"), &[])
        .await
        .expect_err("no assertions");
    assert!(matches!(err, CheckError::Config(ConfigError::NoAssertions)));
}

#[tokio::test]
async fn test_transport_failure() {
    let addr = closed_port().await;
    let err = check(
        &Config::default(),
        &format!("http://{addr}/"),
        &[Assertion::StatusOk],
    )
    .await
    .expect_err("nothing listens");

    let CheckError::Transport(e) = err else {
        panic!("expected transport error, got {err:?}");
    };
    assert!(matches!(e.kind, TransportErrorKind::Connect { .. }), "{e}");
    assert_eq!(e.request, format!("GET http://{addr}/"));
}
