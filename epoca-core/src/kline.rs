//! Decoding of positional kline rows into [`Candle`] records.
//!
//! The market-data API answers with an array of 12-element arrays. Every row is
//! checked field by field; any deviation is reported as [`EpocaError::Shape`].

use std::str::FromStr;

use epoca_types::{Candle, EpocaError};
use rust_decimal::Decimal;
use serde_json::Value;

/// Field names in positional order.
pub const KLINE_FIELDS: [&str; 12] = [
    "openTime",
    "open",
    "high",
    "low",
    "close",
    "volume",
    "closeTime",
    "quoteAssetVolume",
    "numberOfTrades",
    "takerBuyBaseVolume",
    "takerBuyQuoteVolume",
    "ignore",
];

/// Decode a raw response body.
///
/// # Errors
/// Returns `Shape` if the body is not JSON, is not an array, or any row is malformed.
pub fn parse_klines(body: &[u8]) -> Result<Vec<Candle>, EpocaError> {
    let value: Value = serde_json::from_slice(body)
        .map_err(|e| EpocaError::shape("kline response", e.to_string()))?;
    let Value::Array(rows) = value else {
        return Err(EpocaError::shape(
            "kline response",
            format!("expected an array, got {}", kind(&value)),
        ));
    };
    rows.iter()
        .enumerate()
        .map(|(i, row)| candle_from_row(row).map_err(|e| at_row(e, i)))
        .collect()
}

/// Map one positional row into a [`Candle`].
///
/// # Errors
/// Returns `Shape` if the row is not a 12-element array with the expected element
/// types, or if `openTime >= closeTime`.
pub fn candle_from_row(row: &Value) -> Result<Candle, EpocaError> {
    let Value::Array(fields) = row else {
        return Err(EpocaError::shape(
            "kline row",
            format!("expected an array, got {}", kind(row)),
        ));
    };
    if fields.len() != KLINE_FIELDS.len() {
        return Err(EpocaError::shape(
            "kline row",
            format!("expected {} fields, got {}", KLINE_FIELDS.len(), fields.len()),
        ));
    }

    let candle = Candle {
        open_time: millis(fields, 0)?,
        open: decimal(fields, 1)?,
        high: decimal(fields, 2)?,
        low: decimal(fields, 3)?,
        close: decimal(fields, 4)?,
        volume: decimal(fields, 5)?,
        close_time: millis(fields, 6)?,
        quote_asset_volume: decimal(fields, 7)?,
        number_of_trades: count(fields, 8)?,
        taker_buy_base_volume: decimal(fields, 9)?,
        taker_buy_quote_volume: decimal(fields, 10)?,
        ignore: text(fields, 11)?,
    };

    if candle.open_time >= candle.close_time {
        return Err(EpocaError::shape(
            "kline row",
            format!(
                "openTime {} is not before closeTime {}",
                candle.open_time, candle.close_time
            ),
        ));
    }
    Ok(candle)
}

fn at_row(e: EpocaError, i: usize) -> EpocaError {
    match e {
        EpocaError::Shape { what, detail } => EpocaError::shape(format!("{what} {i}"), detail),
        other => other,
    }
}

fn kind(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn mismatch(idx: usize, expected: &str, got: &Value) -> EpocaError {
    EpocaError::shape(
        "kline row",
        format!("{} (index {idx}): expected {expected}, got {}", KLINE_FIELDS[idx], kind(got)),
    )
}

fn millis(fields: &[Value], idx: usize) -> Result<i64, EpocaError> {
    let v = &fields[idx];
    v.as_i64()
        .filter(|ms| *ms >= 0)
        .ok_or_else(|| mismatch(idx, "a non-negative integer", v))
}

fn count(fields: &[Value], idx: usize) -> Result<u64, EpocaError> {
    let v = &fields[idx];
    v.as_u64()
        .ok_or_else(|| mismatch(idx, "a non-negative integer", v))
}

fn text(fields: &[Value], idx: usize) -> Result<String, EpocaError> {
    let v = &fields[idx];
    v.as_str()
        .map(str::to_string)
        .ok_or_else(|| mismatch(idx, "a string", v))
}

fn decimal(fields: &[Value], idx: usize) -> Result<String, EpocaError> {
    let s = text(fields, idx)?;
    if Decimal::from_str(&s).is_err() {
        return Err(EpocaError::shape(
            "kline row",
            format!("{} (index {idx}): '{s}' is not a decimal", KLINE_FIELDS[idx]),
        ));
    }
    Ok(s)
}
