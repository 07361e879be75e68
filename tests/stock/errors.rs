use crate::common::{self, ISIN, PRICE_FIDS, SYMBOL};
use chrono::TimeDelta;
use gettex_rs::{Clock, GxError, SecurityResolver, Stock};
use httpmock::Method::GET;

#[tokio::test]
async fn unknown_isin_is_security_not_found() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let securities =
        common::mock_find_securities(&server, &token, common::fixture("securities_empty.json"));
    let client = common::client(&server, clock);

    let err = Stock::new(&client, ISIN).await.unwrap_err();
    securities.assert_calls(1);
    match err {
        GxError::SecurityNotFound { isin } => assert_eq!(isin, ISIN),
        other => panic!("expected SecurityNotFound, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_isin_never_touches_the_network() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let auth = common::mock_auth(&server, now, &token);
    let client = common::client(&server, clock);

    let err = Stock::new(&client, "TSLA").await.unwrap_err();
    assert!(matches!(err, GxError::InvalidIsin(ref s) if s == "TSLA"), "got {err:?}");
    auth.homepage.assert_calls(0);
    auth.login.assert_calls(0);
}

#[tokio::test]
async fn non_ascii_isin_is_rejected() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let auth = common::mock_auth(&server, now, &token);
    let client = common::client(&server, clock);

    let err = Stock::new(&client, "US12345678é").await.unwrap_err();
    assert!(
        matches!(err, GxError::InvalidIsin(ref s) if s == "US12345678é"),
        "got {err:?}"
    );
    auth.homepage.assert_calls(0);
}

#[tokio::test]
async fn resolver_searches_the_requested_venue() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let xetra = server.mock(|when, then| {
        when.method(GET)
            .path("/rest/api/find/securities")
            .query_param("search", ISIN)
            .query_param("exchanges", "GER");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"total":1,"data":[{"x.RIC":"TSLA.DE"}]}"#);
    });
    let client = common::client(&server, clock);

    let ric = SecurityResolver::new(&client, ISIN)
        .exchange("GER")
        .fetch()
        .await
        .unwrap();
    assert_eq!(ric, "TSLA.DE");
    xetra.assert_calls(1);
}

#[tokio::test]
async fn search_http_error_is_reported_with_status() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let _securities = server.mock(|when, then| {
        when.method(GET).path("/rest/api/find/securities");
        then.status(503);
    });
    let client = common::client(&server, clock);

    match Stock::new(&client, ISIN).await.unwrap_err() {
        GxError::Status { status, url } => {
            assert_eq!(status, 503);
            assert!(url.contains("/rest/api/find/securities"), "url: {url}");
        }
        other => panic!("expected Status, got {other:?}"),
    }
}

#[tokio::test]
async fn incomplete_quote_is_a_fetch_error() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let _securities =
        common::mock_find_securities(&server, &token, common::fixture("securities_ric.json"));
    let _price = common::mock_quote(
        &server,
        &token,
        PRICE_FIDS,
        format!(r#"{{"data":{{"{SYMBOL}":{{"q._BID":290.1}}}}}}"#),
    );
    let client = common::client(&server, clock);
    let stock = Stock::new(&client, ISIN).await.unwrap();

    match stock.ask_price().await.unwrap_err() {
        GxError::QuoteFetch(msg) => assert!(msg.contains("q._ASK"), "msg: {msg}"),
        other => panic!("expected QuoteFetch, got {other:?}"),
    }
}

#[tokio::test]
async fn empty_value_is_a_data_error() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let _securities =
        common::mock_find_securities(&server, &token, common::fixture("securities_ric.json"));
    let _price = common::mock_quote(
        &server,
        &token,
        PRICE_FIDS,
        format!(r#"{{"data":{{"{SYMBOL}":{{"q._BID":"","q._ASK":290.25}}}}}}"#),
    );
    let client = common::client(&server, clock);
    let stock = Stock::new(&client, ISIN).await.unwrap();

    assert!(matches!(
        stock.bid_price().await.unwrap_err(),
        GxError::Data(_)
    ));
    assert!((stock.ask_price().await.unwrap() - 290.25).abs() < 1e-9);
}

#[tokio::test]
async fn quote_body_that_is_not_json_is_a_fetch_error() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let _securities =
        common::mock_find_securities(&server, &token, common::fixture("securities_ric.json"));
    let _price = common::mock_quote(&server, &token, PRICE_FIDS, "<html>maintenance</html>".into());
    let client = common::client(&server, clock);
    let stock = Stock::new(&client, ISIN).await.unwrap();

    assert!(matches!(
        stock.bid_price().await.unwrap_err(),
        GxError::QuoteFetch(_)
    ));
}
