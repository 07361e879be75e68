use gettex_rs::{CacheMode, GxClient, SecurityResolver, Stock};
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Create a client with a 5-second timeout and a slightly longer cache window.
    let client = GxClient::builder()
        .timeout(Duration::from_secs(5))
        .cache_ttl(Duration::from_secs(3))
        .build()?;

    // 2. Resolve an ISIN and read the order book top.
    let tesla = Stock::new(&client, "US88160R1014").await?;
    println!("--- Quote for {} ({}) ---", tesla.isin(), tesla.symbol());
    println!(
        "Bid: {:.2} x {}",
        tesla.bid_price().await?,
        tesla.bid_size().await?
    );
    println!(
        "Ask: {:.2} x {}",
        tesla.ask_price().await?,
        tesla.ask_size().await?
    );
    println!();

    // 3. Instrument data comes from a single request shared by all accessors.
    let snap = tesla.snapshot().await?;
    println!("--- Instrument ---");
    println!("{} / {} (WKN {})", snap.ticker, snap.display_name, snap.wkn);
    println!(
        "O {:.2}  H {:.2}  L {:.2}  Last {:.2}",
        snap.open_price, snap.high_price, snap.low_price, snap.last_price
    );
    println!(
        "Change {:+.2} ({:+.3}%), turnover {:.2}",
        snap.price_change, snap.percent_change, snap.turnover
    );
    println!("Last trade: {}", snap.trade_date_time);
    println!("Sector: {}, country: {}", snap.taxonomy, snap.country);
    println!();

    // 4. Always-fresh reads skip the cache entirely.
    let live = tesla.clone().cache_mode(CacheMode::Bypass);
    println!("Fresh bid: {:.2}", live.bid_price().await?);

    // 5. Look up the same security on another venue.
    let ric = SecurityResolver::new(&client, "US88160R1014")
        .exchange("GER")
        .fetch()
        .await?;
    println!("Symbol on GER: {ric}");

    Ok(())
}
