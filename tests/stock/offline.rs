use crate::common::{self, ISIN, SYMBOL};
use chrono::{TimeDelta, TimeZone, Utc};
use gettex_rs::{Clock, Field, FieldValue, Stock};
use std::time::Duration;

#[tokio::test]
async fn tesla_quote_and_instrument_data() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let auth = common::mock_auth(&server, now, &token);
    let api = common::mock_tesla(&server, &token);
    let client = common::client(&server, clock.clone());

    let stock = Stock::new(&client, ISIN).await.unwrap();
    assert_eq!(stock.isin(), ISIN);
    assert_eq!(stock.symbol(), SYMBOL);

    assert!((stock.bid_price().await.unwrap() - 290.1).abs() < 1e-9);
    assert!((stock.ask_price().await.unwrap() - 290.25).abs() < 1e-9);

    clock.advance(Duration::from_millis(2500));

    assert_eq!(stock.bid_size().await.unwrap(), 375);
    assert_eq!(stock.ask_size().await.unwrap(), 365);

    assert_eq!(stock.ticker().await.unwrap(), "TL0");
    assert_eq!(stock.display_name().await.unwrap(), "TESLA MOTORS");
    assert!((stock.low_price().await.unwrap() - 274.4).abs() < 1e-9);
    assert!((stock.price_change().await.unwrap() - 14.55).abs() < 1e-9);
    assert!((stock.percent_change().await.unwrap() - 5.283).abs() < 1e-9);
    assert_eq!(stock.country().await.unwrap(), "DE");
    assert_eq!(
        stock.trade_date_time().await.unwrap(),
        Utc.with_ymd_and_hms(2025, 8, 22, 20, 57, 0).unwrap()
    );
    assert_eq!(stock.wkn().await.unwrap(), "A1CX3T");
    assert!((stock.open_price().await.unwrap() - 275.75).abs() < 1e-9);
    assert!((stock.high_price().await.unwrap() - 290.4).abs() < 1e-9);
    assert!((stock.last_price().await.unwrap() - 289.95).abs() < 1e-9);
    assert!((stock.turnover().await.unwrap() - 9_747_130.85).abs() < 1e-6);
    assert_eq!(stock.taxonomy().await.unwrap(), "Consumer");

    // One login, one lookup, one request per field group.
    auth.homepage.assert_calls(1);
    auth.login.assert_calls(1);
    auth.tokens.assert_calls(1);
    api.securities.assert_calls(1);
    api.price.assert_calls(1);
    api.size.assert_calls(1);
    api.instrument.assert_calls(1);
}

#[tokio::test]
async fn snapshot_reads_each_group_once() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let api = common::mock_tesla(&server, &token);
    let client = common::client(&server, clock);

    let stock = Stock::new(&client, ISIN).await.unwrap();
    let snap = stock.snapshot().await.unwrap();

    assert_eq!(snap.isin, ISIN);
    assert_eq!(snap.symbol, SYMBOL);
    assert_eq!(snap.bid_size, 375);
    assert_eq!(snap.ask_size, 365);
    assert_eq!(snap.ticker, "TL0");
    assert_eq!(snap.taxonomy, "Consumer");
    assert_eq!(
        snap.trade_date_time,
        Utc.with_ymd_and_hms(2025, 8, 22, 20, 57, 0).unwrap()
    );

    // Accessors right after the snapshot are served from the cache.
    assert!((stock.bid_price().await.unwrap() - snap.bid_price).abs() < 1e-9);
    assert_eq!(stock.wkn().await.unwrap(), snap.wkn);

    api.price.assert_calls(1);
    api.size.assert_calls(1);
    api.instrument.assert_calls(1);
}

#[tokio::test]
async fn raw_field_access() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let _api = common::mock_tesla(&server, &token);
    let client = common::client(&server, clock);

    let stock = Stock::new(&client, ISIN).await.unwrap();
    assert_eq!(
        stock.field(Field::Ticker).await.unwrap(),
        FieldValue::Text("TL0".into())
    );
    assert_eq!(
        stock.field(Field::BidSize).await.unwrap(),
        FieldValue::Number(375.0)
    );
}

#[tokio::test]
async fn lowercase_isin_is_normalized() {
    let server = common::setup_server();
    let clock = common::clock();
    let now = clock.now();
    let token = common::jwt(now + TimeDelta::hours(1));

    let _auth = common::mock_auth(&server, now, &token);
    let api = common::mock_tesla(&server, &token);
    let client = common::client(&server, clock);

    let stock = Stock::new(&client, " us88160r1014 ").await.unwrap();
    assert_eq!(stock.isin(), ISIN);
    assert_eq!(stock.symbol(), SYMBOL);
    api.securities.assert_calls(1);
}
