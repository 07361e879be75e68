use chrono::{DateTime, Utc};

/// Every data point of a [`Stock`](super::Stock), read in one go.
#[derive(Debug, Clone, PartialEq)]
pub struct StockSnapshot {
    /// The ISIN the stock was constructed with.
    pub isin: String,
    /// Vendor symbol (RIC) the ISIN resolved to.
    pub symbol: String,
    /// Best bid price.
    pub bid_price: f64,
    /// Best ask price.
    pub ask_price: f64,
    /// Size at the best bid.
    pub bid_size: u64,
    /// Size at the best ask.
    pub ask_size: u64,
    /// Venue ticker.
    pub ticker: String,
    /// Display name.
    pub display_name: String,
    /// Last traded price.
    pub last_price: f64,
    /// Opening price.
    pub open_price: f64,
    /// Session high.
    pub high_price: f64,
    /// Session low.
    pub low_price: f64,
    /// Absolute change against the previous close.
    pub price_change: f64,
    /// Percentage change against the previous close.
    pub percent_change: f64,
    /// Country code of the listing.
    pub country: String,
    /// Time of the last trade.
    pub trade_date_time: DateTime<Utc>,
    /// German securities identification number.
    pub wkn: String,
    /// Session turnover.
    pub turnover: f64,
    /// Top-level TRBC economic sector.
    pub taxonomy: String,
}
