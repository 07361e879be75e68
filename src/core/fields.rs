//! Field ids, field groups and the value matrix returned by the quote endpoint.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use std::collections::HashMap;

use crate::core::GxError;

/// One value returned for a field id.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// A numeric value (prices, sizes, turnover, changes).
    Number(f64),
    /// A textual value (names, codes, dates and times as sent upstream).
    Text(String),
    /// A full timestamp sent as a single value.
    Timestamp(DateTime<Utc>),
    /// The field was present but empty.
    Null,
}

impl FieldValue {
    /// Numeric view; numeric strings are accepted too.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Timestamp(_) | Self::Null => None,
        }
    }

    /// Textual view; numbers are rendered back to text.
    #[must_use]
    pub fn as_text(&self) -> Option<String> {
        match self {
            Self::Text(s) => Some(s.clone()),
            Self::Number(n) => Some(n.to_string()),
            Self::Timestamp(t) => Some(t.to_rfc3339()),
            Self::Null => None,
        }
    }

    /// Whether the upstream sent nothing for this field.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

/// Field id → value, as returned by a single quote query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldMatrix {
    values: HashMap<String, FieldValue>,
}

impl FieldMatrix {
    /// Insert or replace one field.
    pub fn insert(&mut self, fid: impl Into<String>, value: FieldValue) {
        self.values.insert(fid.into(), value);
    }

    /// Look up a field by id.
    #[must_use]
    pub fn get(&self, fid: &str) -> Option<&FieldValue> {
        self.values.get(fid)
    }

    /// Number of fields held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the matrix holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Requested ids the matrix does not contain.
    #[must_use]
    pub fn missing<'a>(&self, fids: &[&'a str]) -> Vec<&'a str> {
        fids.iter()
            .copied()
            .filter(|f| !self.values.contains_key(*f))
            .collect()
    }
}

/// A set of field ids fetched together in one request.
#[derive(Debug, PartialEq, Eq)]
pub struct FieldGroup {
    /// Short name, used in logs and errors.
    pub name: &'static str,
    /// Ordered field ids sent as the `fids` parameter.
    pub fids: &'static [&'static str],
}

/// Best bid and ask.
pub static PRICE_GROUP: FieldGroup = FieldGroup {
    name: "price",
    fids: &["q._BID", "q._ASK"],
};

/// Sizes at best bid and ask.
pub static SIZE_GROUP: FieldGroup = FieldGroup {
    name: "size",
    fids: &["q.BIDSIZE", "q.ASKSIZE"],
};

/// Descriptive and end-of-day instrument data.
pub static INSTRUMENT_GROUP: FieldGroup = FieldGroup {
    name: "instrument",
    fids: &[
        "x._TICKER",
        "x._DSPLY_NAME",
        "q._TRDPRC_1",
        "q._NETCHNG_1",
        "q._PCTCHNG",
        "q._COUNTRY",
        "q._TRADE_DATE",
        "q._TRDTIM_1",
        "x._LOCAL_ID",
        "q._OPEN_PRC",
        "q._HIGH_1",
        "q._LOW_1",
        "q._TURNOVER",
        "rkd.COMP_TAXONOMY_TRBC_CD_L1",
    ],
};

/// Every data point a [`Stock`](crate::Stock) exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Best bid price.
    BidPrice,
    /// Best ask price.
    AskPrice,
    /// Size at the best bid.
    BidSize,
    /// Size at the best ask.
    AskSize,
    /// Venue ticker.
    Ticker,
    /// Display name.
    DisplayName,
    /// Last traded price.
    LastPrice,
    /// Absolute change against the previous close.
    PriceChange,
    /// Percentage change against the previous close.
    PercentChange,
    /// Country code of the listing.
    Country,
    /// Date of the last trade (combined with [`Field::TradeTime`] into one timestamp).
    TradeDate,
    /// Time of the last trade, UTC.
    TradeTime,
    /// German securities identification number.
    Wkn,
    /// Opening price.
    OpenPrice,
    /// Session high.
    HighPrice,
    /// Session low.
    LowPrice,
    /// Session turnover.
    Turnover,
    /// Top-level TRBC economic sector.
    Taxonomy,
}

/// Property → (group, field id). Add a row here to expose a new field.
static FIELD_TABLE: &[(Field, &FieldGroup, &str)] = &[
    (Field::BidPrice, &PRICE_GROUP, "q._BID"),
    (Field::AskPrice, &PRICE_GROUP, "q._ASK"),
    (Field::BidSize, &SIZE_GROUP, "q.BIDSIZE"),
    (Field::AskSize, &SIZE_GROUP, "q.ASKSIZE"),
    (Field::Ticker, &INSTRUMENT_GROUP, "x._TICKER"),
    (Field::DisplayName, &INSTRUMENT_GROUP, "x._DSPLY_NAME"),
    (Field::LastPrice, &INSTRUMENT_GROUP, "q._TRDPRC_1"),
    (Field::PriceChange, &INSTRUMENT_GROUP, "q._NETCHNG_1"),
    (Field::PercentChange, &INSTRUMENT_GROUP, "q._PCTCHNG"),
    (Field::Country, &INSTRUMENT_GROUP, "q._COUNTRY"),
    (Field::TradeDate, &INSTRUMENT_GROUP, "q._TRADE_DATE"),
    (Field::TradeTime, &INSTRUMENT_GROUP, "q._TRDTIM_1"),
    (Field::Wkn, &INSTRUMENT_GROUP, "x._LOCAL_ID"),
    (Field::OpenPrice, &INSTRUMENT_GROUP, "q._OPEN_PRC"),
    (Field::HighPrice, &INSTRUMENT_GROUP, "q._HIGH_1"),
    (Field::LowPrice, &INSTRUMENT_GROUP, "q._LOW_1"),
    (Field::Turnover, &INSTRUMENT_GROUP, "q._TURNOVER"),
    (Field::Taxonomy, &INSTRUMENT_GROUP, "rkd.COMP_TAXONOMY_TRBC_CD_L1"),
];

impl Field {
    /// Every field, in table order.
    pub const ALL: [Self; 18] = [
        Self::BidPrice,
        Self::AskPrice,
        Self::BidSize,
        Self::AskSize,
        Self::Ticker,
        Self::DisplayName,
        Self::LastPrice,
        Self::PriceChange,
        Self::PercentChange,
        Self::Country,
        Self::TradeDate,
        Self::TradeTime,
        Self::Wkn,
        Self::OpenPrice,
        Self::HighPrice,
        Self::LowPrice,
        Self::Turnover,
        Self::Taxonomy,
    ];

    fn row(self) -> &'static (Self, &'static FieldGroup, &'static str) {
        FIELD_TABLE
            .iter()
            .find(|(f, _, _)| *f == self)
            .unwrap_or_else(|| unreachable!("every Field has a FIELD_TABLE row"))
    }

    /// The group fetched to read this field.
    #[must_use]
    pub fn group(self) -> &'static FieldGroup {
        self.row().1
    }

    /// The upstream field id.
    #[must_use]
    pub fn fid(self) -> &'static str {
        self.row().2
    }

    /// Reads this field from `matrix` as a number.
    pub(crate) fn number(self, matrix: &FieldMatrix) -> Result<f64, GxError> {
        let v = self.value(matrix)?;
        v.as_f64()
            .ok_or_else(|| GxError::Data(format!("{} is not numeric: {v:?}", self.fid())))
    }

    /// Reads this field from `matrix` as a non-negative whole number.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub(crate) fn size(self, matrix: &FieldMatrix) -> Result<u64, GxError> {
        let n = self.number(matrix)?;
        if n.is_finite() && n >= 0.0 && n.fract() == 0.0 {
            Ok(n as u64)
        } else {
            Err(GxError::Data(format!("{} is not a size: {n}", self.fid())))
        }
    }

    /// Reads this field from `matrix` as text.
    pub(crate) fn text(self, matrix: &FieldMatrix) -> Result<String, GxError> {
        let v = self.value(matrix)?;
        v.as_text()
            .ok_or_else(|| GxError::Data(format!("{} has no text: {v:?}", self.fid())))
    }

    pub(crate) fn value(self, matrix: &FieldMatrix) -> Result<&FieldValue, GxError> {
        let v = matrix
            .get(self.fid())
            .ok_or_else(|| GxError::QuoteFetch(format!("field {} missing", self.fid())))?;
        if v.is_null() {
            return Err(GxError::Data(format!("{} is empty", self.fid())));
        }
        Ok(v)
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d.%m.%Y", "%d %b %Y", "%Y%m%d"];
const TIME_FORMATS: &[&str] = &["%H:%M:%S%.f", "%H:%M:%S", "%H:%M"];

/// Combines the trade-date and trade-time fields into one UTC instant.
///
/// A full timestamp sent in the date field wins over the split fields.
pub(crate) fn trade_date_time(matrix: &FieldMatrix) -> Result<DateTime<Utc>, GxError> {
    if let FieldValue::Timestamp(t) = Field::TradeDate.value(matrix)? {
        return Ok(*t);
    }
    let date_s = Field::TradeDate.text(matrix)?;
    let time_s = Field::TradeTime.text(matrix)?;

    let date = parse_with(&date_s, DATE_FORMATS, NaiveDate::parse_from_str)
        .ok_or_else(|| GxError::Data(format!("unrecognized trade date: {date_s}")))?;
    let time = parse_with(&time_s, TIME_FORMATS, NaiveTime::parse_from_str)
        .ok_or_else(|| GxError::Data(format!("unrecognized trade time: {time_s}")))?;

    Ok(NaiveDateTime::new(date, time).and_utc())
}

fn parse_with<T>(
    s: &str,
    formats: &[&str],
    parse: fn(&str, &str) -> chrono::ParseResult<T>,
) -> Option<T> {
    let s = s.trim();
    formats.iter().find_map(|f| parse(s, f).ok())
}
