mod model;

pub use model::StockSnapshot;

use chrono::{DateTime, Utc};

use crate::core::fields::{INSTRUMENT_GROUP, PRICE_GROUP, SIZE_GROUP, trade_date_time};
use crate::core::{CacheMode, Field, FieldGroup, FieldMatrix, FieldValue, GxClient, GxError};
use crate::{quote, search};

/// A single security listed on gettex, addressed by ISIN.
///
/// Construction resolves the ISIN to the vendor symbol once; the instance is
/// bound to that symbol for its whole life. Each accessor reads its field group
/// through the client's cache, so accessors sharing a group (for example
/// [`bid_price`](Self::bid_price) and [`ask_price`](Self::ask_price)) share one
/// request and one TTL window.
///
/// # Example
///
/// ```no_run
/// # use gettex_rs::{GxClient, Stock};
/// # #[tokio::main]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let client = GxClient::default();
/// let tesla = Stock::new(&client, "US88160R1014").await?;
///
/// println!("{} bid {} / ask {}", tesla.symbol(), tesla.bid_price().await?, tesla.ask_price().await?);
/// println!("last trade at {}", tesla.trade_date_time().await?);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Stock {
    client: GxClient,
    isin: String,
    symbol: String,
    cache_mode: CacheMode,
}

impl Stock {
    /// Resolves `isin` and binds a new `Stock` to the resulting symbol.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::SecurityNotFound`] if the venue has no listing for the
    /// ISIN, [`GxError::InvalidIsin`] for a malformed one, and auth or transport
    /// errors as they occur. No `Stock` exists after a failure.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(client), err))]
    pub async fn new(client: &GxClient, isin: &str) -> Result<Self, GxError> {
        let isin = isin.trim().to_ascii_uppercase();
        let symbol = search::resolve(client, &isin).await?;
        Ok(Self {
            client: client.clone(),
            isin,
            symbol,
            cache_mode: CacheMode::Use,
        })
    }

    /// Sets the cache mode for all subsequent reads of this `Stock`.
    #[must_use]
    pub const fn cache_mode(mut self, mode: CacheMode) -> Self {
        self.cache_mode = mode;
        self
    }

    /// The ISIN this stock was constructed with.
    #[must_use]
    pub fn isin(&self) -> &str {
        &self.isin
    }

    /// The vendor symbol (RIC) the ISIN resolved to.
    #[must_use]
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Reads one field as the upstream sent it.
    ///
    /// # Errors
    ///
    /// Returns [`GxError::QuoteFetch`] if the group fetch fails or omits the field.
    pub async fn field(&self, field: Field) -> Result<FieldValue, GxError> {
        let m = self.group(field.group()).await?;
        m.get(field.fid())
            .cloned()
            .ok_or_else(|| GxError::QuoteFetch(format!("field {} missing", field.fid())))
    }

    async fn group(&self, group: &FieldGroup) -> Result<FieldMatrix, GxError> {
        quote::fetch_group(&self.client, &self.symbol, group, self.cache_mode).await
    }

    async fn number(&self, field: Field) -> Result<f64, GxError> {
        field.number(&self.group(field.group()).await?)
    }

    async fn size(&self, field: Field) -> Result<u64, GxError> {
        field.size(&self.group(field.group()).await?)
    }

    async fn text(&self, field: Field) -> Result<String, GxError> {
        field.text(&self.group(field.group()).await?)
    }

    /* ---------------- Price group ---------------- */

    /// Best bid price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price group cannot be fetched or the value is not numeric.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn bid_price(&self) -> Result<f64, GxError> {
        self.number(Field::BidPrice).await
    }

    /// Best ask price.
    ///
    /// # Errors
    ///
    /// Returns an error if the price group cannot be fetched or the value is not numeric.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn ask_price(&self) -> Result<f64, GxError> {
        self.number(Field::AskPrice).await
    }

    /* ---------------- Size group ---------------- */

    /// Size at the best bid.
    ///
    /// # Errors
    ///
    /// Returns an error if the size group cannot be fetched or the value is not a whole number.
    pub async fn bid_size(&self) -> Result<u64, GxError> {
        self.size(Field::BidSize).await
    }

    /// Size at the best ask.
    ///
    /// # Errors
    ///
    /// Returns an error if the size group cannot be fetched or the value is not a whole number.
    pub async fn ask_size(&self) -> Result<u64, GxError> {
        self.size(Field::AskSize).await
    }

    /* ---------------- Instrument group ---------------- */

    /// Venue ticker, e.g. `TL0`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched.
    pub async fn ticker(&self) -> Result<String, GxError> {
        self.text(Field::Ticker).await
    }

    /// Display name.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched.
    pub async fn display_name(&self) -> Result<String, GxError> {
        self.text(Field::DisplayName).await
    }

    /// Last traded price.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn last_price(&self) -> Result<f64, GxError> {
        self.number(Field::LastPrice).await
    }

    /// Opening price.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn open_price(&self) -> Result<f64, GxError> {
        self.number(Field::OpenPrice).await
    }

    /// Session high.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn high_price(&self) -> Result<f64, GxError> {
        self.number(Field::HighPrice).await
    }

    /// Session low.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn low_price(&self) -> Result<f64, GxError> {
        self.number(Field::LowPrice).await
    }

    /// Absolute change against the previous close.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn price_change(&self) -> Result<f64, GxError> {
        self.number(Field::PriceChange).await
    }

    /// Percentage change against the previous close.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn percent_change(&self) -> Result<f64, GxError> {
        self.number(Field::PercentChange).await
    }

    /// Country code of the listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched.
    pub async fn country(&self) -> Result<String, GxError> {
        self.text(Field::Country).await
    }

    /// Time of the last trade, built from the trade-date and trade-time fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or either
    /// field is in an unrecognized format.
    pub async fn trade_date_time(&self) -> Result<DateTime<Utc>, GxError> {
        trade_date_time(&self.group(&INSTRUMENT_GROUP).await?)
    }

    /// German securities identification number.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched.
    pub async fn wkn(&self) -> Result<String, GxError> {
        self.text(Field::Wkn).await
    }

    /// Session turnover.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched or the value is not numeric.
    pub async fn turnover(&self) -> Result<f64, GxError> {
        self.number(Field::Turnover).await
    }

    /// Top-level TRBC economic sector, e.g. `Consumer`.
    ///
    /// # Errors
    ///
    /// Returns an error if the instrument group cannot be fetched.
    pub async fn taxonomy(&self) -> Result<String, GxError> {
        self.text(Field::Taxonomy).await
    }

    /* ---------------- Aggregate ---------------- */

    /// Reads every group once and returns all data points together.
    ///
    /// # Errors
    ///
    /// Returns the first error met while fetching or converting a field.
    #[cfg_attr(feature = "tracing", tracing::instrument(skip(self), err, fields(symbol = %self.symbol)))]
    pub async fn snapshot(&self) -> Result<StockSnapshot, GxError> {
        let price = self.group(&PRICE_GROUP).await?;
        let size = self.group(&SIZE_GROUP).await?;
        let info = self.group(&INSTRUMENT_GROUP).await?;

        Ok(StockSnapshot {
            isin: self.isin.clone(),
            symbol: self.symbol.clone(),
            bid_price: Field::BidPrice.number(&price)?,
            ask_price: Field::AskPrice.number(&price)?,
            bid_size: Field::BidSize.size(&size)?,
            ask_size: Field::AskSize.size(&size)?,
            ticker: Field::Ticker.text(&info)?,
            display_name: Field::DisplayName.text(&info)?,
            last_price: Field::LastPrice.number(&info)?,
            open_price: Field::OpenPrice.number(&info)?,
            high_price: Field::HighPrice.number(&info)?,
            low_price: Field::LowPrice.number(&info)?,
            price_change: Field::PriceChange.number(&info)?,
            percent_change: Field::PercentChange.number(&info)?,
            country: Field::Country.text(&info)?,
            trade_date_time: trade_date_time(&info)?,
            wkn: Field::Wkn.text(&info)?,
            turnover: Field::Turnover.number(&info)?,
            taxonomy: Field::Taxonomy.text(&info)?,
        })
    }
}
