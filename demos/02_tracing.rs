use gettex_rs::{GxClient, Stock};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("gettex_rs=debug")),
        )
        .init();

    let client = GxClient::default();
    let stock = Stock::new(&client, "US88160R1014").await?;

    // The second read inside the TTL is logged as a cache hit.
    let first = stock.last_price().await?;
    let second = stock.last_price().await?;
    println!("{}: {first:.2} / {second:.2}", stock.symbol());
    println!("auth phase: {:?}", client.auth_phase().await);

    Ok(())
}
