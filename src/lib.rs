//! gettex-rs: quotes and instrument data from the gettex exchange.
//!
//! The crate logs in to the LSEG widget API the same way the gettex homepage
//! does, resolves ISINs to vendor symbols and reads quote fields through a
//! short-lived in-memory cache.
//!
//! ```no_run
//! use gettex_rs::{GxClient, Stock};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), gettex_rs::GxError> {
//! let client = GxClient::builder()
//!     .timeout(Duration::from_secs(5))
//!     .cache_ttl(Duration::from_secs(2))
//!     .build()?;
//!
//! let stock = Stock::new(&client, "US88160R1014").await?;
//! let snap = stock.snapshot().await?;
//! println!("{} {} @ {}", snap.ticker, snap.display_name, snap.last_price);
//! # Ok(())
//! # }
//! ```

pub mod core;
pub mod quote;
pub mod search;
pub mod stock;

pub use crate::core::{
    AuthConfig, AuthPhase, BearerToken, CacheMode, Clock, Field, FieldGroup, FieldMatrix,
    FieldValue, GxClient, GxClientBuilder, GxConfig, GxError, ManualClock, SessionCredentials,
    SystemClock, extract_auth_config,
};
pub use search::SecurityResolver;
pub use stock::{Stock, StockSnapshot};
