use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;

use crate::model::{OptionChainRow, OptionLeg, OptionSide, RawSnapshot, StrikeRecord};

#[derive(Debug, Error)]
pub enum FlattenError {
    #[error("{symbol} {expiry_date} strike {strike_price} {side}: malformed leg: {source}")]
    MalformedLeg {
        symbol: String,
        expiry_date: String,
        strike_price: f64,
        side: OptionSide,
        #[source]
        source: serde_json::Error,
    },
}

/// Leg and orphan counts for a snapshot, computed without building rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlattenStats {
    /// Rows `flatten` will emit: CE + PE legs on listed expiries.
    pub legs: usize,
    /// Strike records whose expiry is not in `expiryDates`.
    pub orphan_strikes: usize,
}

pub fn count_legs(raw: &RawSnapshot) -> FlattenStats {
    let listed: HashSet<&str> = raw.records.expiry_dates.iter().map(String::as_str).collect();
    let mut stats = FlattenStats::default();
    for record in &raw.records.data {
        if listed.contains(record.expiry_date.as_str()) {
            stats.legs += usize::from(record.call.is_some()) + usize::from(record.put.is_some());
        } else {
            stats.orphan_strikes += 1;
        }
    }
    stats
}

/// Flatten one snapshot into output rows.
///
/// Rows are grouped by expiry in `expiryDates` order; within an expiry they
/// keep the arrival order of `records.data`, CE before PE for each strike.
/// Strike records on an expiry missing from `expiryDates` are dropped.
/// Every row carries `captured_at`.
pub fn flatten(
    raw: &RawSnapshot,
    symbol: &str,
    captured_at: NaiveDateTime,
) -> Result<Vec<OptionChainRow>, FlattenError> {
    let mut rows = Vec::with_capacity(count_legs(raw).legs);

    for expiry_date in &raw.records.expiry_dates {
        for record in raw.records.data.iter().filter(|r| &r.expiry_date == expiry_date) {
            for side in [OptionSide::Call, OptionSide::Put] {
                if let Some(value) = record.leg(side) {
                    let leg = parse_leg(value, record, side, symbol)?;
                    rows.push(to_row(leg, side, symbol, expiry_date, captured_at));
                }
            }
        }
    }

    Ok(rows)
}

fn parse_leg(
    value: &serde_json::Value,
    record: &StrikeRecord,
    side: OptionSide,
    symbol: &str,
) -> Result<OptionLeg, FlattenError> {
    OptionLeg::deserialize(value).map_err(|source| FlattenError::MalformedLeg {
        symbol: symbol.to_string(),
        expiry_date: record.expiry_date.clone(),
        strike_price: record.strike_price,
        side,
        source,
    })
}

fn to_row(
    leg: OptionLeg,
    side: OptionSide,
    symbol: &str,
    expiry_date: &str,
    captured_at: NaiveDateTime,
) -> OptionChainRow {
    OptionChainRow {
        timestamp: captured_at,
        symbol: symbol.to_string(),
        expiry_date: expiry_date.to_string(),
        option_type: side,
        strike_price: leg.strike_price,
        open_interest: leg.open_interest,
        change_in_open_interest: leg.change_in_open_interest,
        p_change_in_open_interest: leg.p_change_in_open_interest,
        total_traded_volume: leg.total_traded_volume,
        implied_volatility: leg.implied_volatility,
        last_price: leg.last_price,
        change: leg.change,
        p_change: leg.p_change,
        total_buy_quantity: leg.total_buy_quantity,
        total_sell_quantity: leg.total_sell_quantity,
        bid_qty: leg.bid_qty,
        bid_price: leg.bid_price,
        ask_qty: leg.ask_qty,
        ask_price: leg.ask_price,
        underlying_value: leg.underlying_value,
    }
}
