//! Decoding of `/rest/api/quote/info` payloads into a [`FieldMatrix`].
//!
//! The widget API has been seen answering in three layouts:
//!
//! - keyed: `{"TSLA.GTX": {"q._BID": 290.1, ...}}`, optionally under `data`;
//! - records: `[{"ric": "TSLA.GTX", "fids": {"q._BID": 290.1, ...}}]`, optionally under `data`;
//! - columnar: `{"rics": [...], "fids": [...], "values": [[...], ...]}`.
//!
//! Scalars may be bare or wrapped as `{"v": ...}` / `{"value": ...}`.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::core::{FieldMatrix, FieldValue, GxError};

const ENVELOPE_KEYS: &[&str] = &["data", "result", "results", "items"];
const RIC_KEYS: &[&str] = &["ric", "RIC", "x.RIC", "symbol"];
const FIELDS_KEYS: &[&str] = &["fids", "fields", "values"];
const WRAPPED_KEYS: &[&str] = &["v", "value", "val"];

/// Maps one JSON value to a typed field value.
pub(crate) fn to_field_value(v: &Value) -> FieldValue {
    match v {
        Value::Null => FieldValue::Null,
        Value::Number(n) => n
            .as_f64()
            .map_or_else(|| FieldValue::Text(n.to_string()), FieldValue::Number),
        Value::String(s) if s.is_empty() => FieldValue::Null,
        Value::String(s) => DateTime::parse_from_rfc3339(s).map_or_else(
            |_| FieldValue::Text(s.clone()),
            |t| FieldValue::Timestamp(t.with_timezone(&Utc)),
        ),
        Value::Bool(b) => FieldValue::Text(b.to_string()),
        Value::Object(map) => WRAPPED_KEYS
            .iter()
            .find_map(|k| map.get(*k))
            .map_or_else(|| FieldValue::Text(v.to_string()), to_field_value),
        Value::Array(_) => FieldValue::Text(v.to_string()),
    }
}

/// Decodes the fields returned for `symbol`.
pub(crate) fn parse_matrix(body: &str, symbol: &str) -> Result<FieldMatrix, GxError> {
    let root: Value = serde_json::from_str(body)
        .map_err(|e| GxError::QuoteFetch(format!("quote json parse: {e}")))?;

    let mut node = &root;
    while let Some(inner) = node
        .as_object()
        .and_then(|m| ENVELOPE_KEYS.iter().find_map(|k| m.get(*k)))
        .filter(|v| v.is_object() || v.is_array())
    {
        node = inner;
    }

    if let Some(m) = columnar(node, symbol)? {
        return Ok(m);
    }

    // A record naming another RIC is never a stand-in for the requested one.
    let record = match node {
        Value::Array(items) if items.iter().any(|it| record_ric(it).is_some()) => items
            .iter()
            .find(|it| record_ric(it) == Some(symbol)),
        Value::Array(items) => items.first(),
        Value::Object(map) => map
            .get(symbol)
            .or_else(|| record_ric(node).is_none_or(|r| r == symbol).then_some(node)),
        _ => None,
    }
    .and_then(Value::as_object)
    .ok_or_else(|| GxError::QuoteFetch(format!("no quote record for {symbol}")))?;

    let fields = FIELDS_KEYS
        .iter()
        .find_map(|k| record.get(*k).and_then(Value::as_object))
        .unwrap_or(record);

    Ok(from_object(fields))
}

fn record_ric(v: &Value) -> Option<&str> {
    let map = v.as_object()?;
    RIC_KEYS
        .iter()
        .find_map(|k| map.get(*k).and_then(Value::as_str))
}

fn from_object(map: &Map<String, Value>) -> FieldMatrix {
    let mut m = FieldMatrix::default();
    for (k, v) in map {
        if RIC_KEYS.contains(&k.as_str()) && v.is_string() {
            continue;
        }
        m.insert(k.clone(), to_field_value(v));
    }
    m
}

// `Ok(None)` when the node is not columnar at all.
fn columnar(node: &Value, symbol: &str) -> Result<Option<FieldMatrix>, GxError> {
    let Some((fids, rows)) = node.as_object().and_then(|map| {
        Some((
            map.get("fids")?.as_array()?,
            map.get("values")?.as_array()?,
        ))
    }) else {
        return Ok(None);
    };

    let row_idx = match node.get("rics").and_then(Value::as_array) {
        Some(rics) => rics
            .iter()
            .position(|r| r.as_str() == Some(symbol))
            .ok_or_else(|| GxError::QuoteFetch(format!("{symbol} not among returned rics")))?,
        None => 0,
    };
    let row = rows
        .get(row_idx)
        .and_then(Value::as_array)
        .ok_or_else(|| GxError::QuoteFetch(format!("no value row for {symbol}")))?;

    let mut m = FieldMatrix::default();
    for (fid, v) in fids.iter().zip(row) {
        if let Some(fid) = fid.as_str() {
            m.insert(fid, to_field_value(v));
        }
    }
    Ok(Some(m))
}
