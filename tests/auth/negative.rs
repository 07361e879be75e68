use crate::common::{self, ISIN};
use chrono::TimeDelta;
use gettex_rs::{AuthPhase, Clock, GxError, Stock};
use httpmock::Method::{GET, POST};
use serde_json::json;

#[tokio::test]
async fn homepage_without_widget_config() {
    let server = common::setup_server();
    let clock = common::clock();

    let homepage = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(200)
            .header("content-type", "text/html")
            .body("<html><body><h1>Wartungsarbeiten</h1></body></html>");
    });
    let login = common::mock_login(&server, clock.now());
    let client = common::client(&server, clock);

    let err = client.valid_token().await.unwrap_err();
    assert!(matches!(err, GxError::ConfigNotFound(_)), "got {err:?}");
    homepage.assert_calls(1);
    login.assert_calls(0);
    assert_eq!(client.auth_phase().await, AuthPhase::Unauthenticated);
}

#[tokio::test]
async fn homepage_http_error() {
    let server = common::setup_server();
    let clock = common::clock();

    let _homepage = server.mock(|when, then| {
        when.method(GET).path("/");
        then.status(404);
    });
    let client = common::client(&server, clock);

    match client.fetch_login_config().await.unwrap_err() {
        GxError::Status { status, .. } => assert_eq!(status, 404),
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn login_must_answer_created() {
    for status in [200, 401, 500] {
        let server = common::setup_server();
        let clock = common::clock();
        let now = clock.now();

        let _homepage = common::mock_homepage(&server);
        let login = server.mock(|when, then| {
            when.method(POST).path("/auth/api/v1/sessions/samllogin");
            then.status(status).json_body(json!({
                "sid": "s",
                "expiresAt": (now + TimeDelta::seconds(60)).timestamp(),
                "token": "t",
            }));
        });
        let tokens = common::mock_tokens(&server, &common::jwt(now + TimeDelta::hours(1)));
        let client = common::client(&server, clock);

        let err = client.valid_token().await.unwrap_err();
        assert!(
            matches!(err, GxError::Authentication(ref m) if m.contains(&status.to_string())),
            "status {status}: got {err:?}"
        );
        login.assert_calls(1);
        tokens.assert_calls(0);
        assert_eq!(client.auth_phase().await, AuthPhase::Unauthenticated);
    }
}

#[tokio::test]
async fn login_body_without_session_fields() {
    let server = common::setup_server();
    let clock = common::clock();

    let _homepage = common::mock_homepage(&server);
    let _login = server.mock(|when, then| {
        when.method(POST).path("/auth/api/v1/sessions/samllogin");
        then.status(201).json_body(json!({ "message": "created" }));
    });
    let client = common::client(&server, clock);

    let err = client.valid_token().await.unwrap_err();
    assert!(matches!(err, GxError::Authentication(_)), "got {err:?}");
}

#[tokio::test]
async fn exchange_must_answer_ok() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();

    let _homepage = common::mock_homepage(&server);
    let _login = common::mock_login(&server, now);
    let tokens = server.mock(|when, then| {
        when.method(POST).path("/auth/api/v1/tokens");
        then.status(403).body("forbidden");
    });
    let client = common::client(&server, clock);

    match client.valid_token().await.unwrap_err() {
        GxError::Authentication(msg) => assert!(msg.contains("403"), "msg: {msg}"),
        other => panic!("expected Authentication, got {other:?}"),
    }
    tokens.assert_calls(1);
}

#[tokio::test]
async fn exchange_returning_garbage_is_rejected() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();

    let _homepage = common::mock_homepage(&server);
    let _login = common::mock_login(&server, now);
    let _tokens = common::mock_tokens(&server, "not-a-jwt");
    let client = common::client(&server, clock);

    let err = client.valid_token().await.unwrap_err();
    assert!(matches!(err, GxError::Authentication(_)), "got {err:?}");
    assert_eq!(client.auth_phase().await, AuthPhase::SessionAcquired);
}

#[tokio::test]
async fn auth_failure_stops_stock_construction() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _homepage = common::mock_homepage(&server);
    let _login = server.mock(|when, then| {
        when.method(POST).path("/auth/api/v1/sessions/samllogin");
        then.status(401);
    });
    let securities =
        common::mock_find_securities(&server, &token, common::fixture("securities_ric.json"));
    let client = common::client(&server, clock);

    let err = Stock::new(&client, ISIN).await.unwrap_err();
    assert!(matches!(err, GxError::Authentication(_)), "got {err:?}");
    securities.assert_calls(0);
}
