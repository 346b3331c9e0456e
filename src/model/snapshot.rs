use serde::{Deserialize, Serialize};

use super::row::OptionSide;

// ── Upstream response ────────────────────────────────────────────────

/// Option-chain response for one index symbol.
///
/// Only `records.expiryDates` and `records.data` are read; everything else
/// the provider sends (`filtered`, totals, strike list) is ignored.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawSnapshot {
    pub records: Records,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Records {
    /// Expiry dates in provider order. Output rows follow this order.
    #[serde(rename = "expiryDates")]
    pub expiry_dates: Vec<String>,
    /// One entry per (expiry, strike), in arrival order.
    pub data: Vec<StrikeRecord>,
}

/// A single strike of one expiry, with optional call and put legs.
///
/// Legs stay untyped until they are flattened, so a broken leg only fails
/// when it would actually produce a row.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StrikeRecord {
    #[serde(rename = "expiryDate")]
    pub expiry_date: String,
    #[serde(rename = "strikePrice")]
    pub strike_price: f64,
    #[serde(rename = "CE", default, skip_serializing_if = "Option::is_none")]
    pub call: Option<serde_json::Value>,
    #[serde(rename = "PE", default, skip_serializing_if = "Option::is_none")]
    pub put: Option<serde_json::Value>,
}

impl StrikeRecord {
    pub fn leg(&self, side: OptionSide) -> Option<&serde_json::Value> {
        match side {
            OptionSide::Call => self.call.as_ref(),
            OptionSide::Put => self.put.as_ref(),
        }
    }
}

/// Fields read from a `CE` / `PE` sub-record. All are required.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionLeg {
    pub strike_price: f64,
    pub open_interest: i64,
    #[serde(rename = "changeinOpenInterest")]
    pub change_in_open_interest: i64,
    #[serde(rename = "pchangeinOpenInterest")]
    pub p_change_in_open_interest: f64,
    pub total_traded_volume: i64,
    pub implied_volatility: f64,
    pub last_price: f64,
    pub change: f64,
    pub p_change: f64,
    pub total_buy_quantity: i64,
    pub total_sell_quantity: i64,
    pub bid_qty: i64,
    #[serde(rename = "bidprice")]
    pub bid_price: f64,
    pub ask_qty: i64,
    pub ask_price: f64,
    pub underlying_value: f64,
}
