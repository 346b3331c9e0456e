use std::fmt;

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Output columns, in file order. The CSV header is written from this list.
pub const COLUMNS: [&str; 20] = [
    "timestamp",
    "symbol",
    "expiry_date",
    "option_type",
    "strike_price",
    "open_interest",
    "change_in_open_interest",
    "p_change_in_open_interest",
    "total_traded_volume",
    "implied_volatility",
    "last_price",
    "change",
    "p_change",
    "total_buy_quantity",
    "total_sell_quantity",
    "bid_qty",
    "bid_price",
    "ask_qty",
    "ask_price",
    "underlying_value",
];

/// Call or put side of a strike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum OptionSide {
    #[serde(rename = "CE")]
    Call,
    #[serde(rename = "PE")]
    Put,
}

impl OptionSide {
    /// Upstream key for this side (`CE` / `PE`).
    pub fn code(self) -> &'static str {
        match self {
            OptionSide::Call => "CE",
            OptionSide::Put => "PE",
        }
    }
}

impl fmt::Display for OptionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One flattened option-chain observation.
///
/// Field order matches [`COLUMNS`]; the CSV sink relies on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptionChainRow {
    /// Capture instant, shared by every row of one snapshot.
    #[serde(with = "timestamp_format")]
    #[schemars(with = "String")]
    pub timestamp: NaiveDateTime,
    pub symbol: String,
    /// Expiry as the upstream writes it, e.g. `29-Dec-2022`.
    pub expiry_date: String,
    pub option_type: OptionSide,
    pub strike_price: f64,
    pub open_interest: i64,
    pub change_in_open_interest: i64,
    pub p_change_in_open_interest: f64,
    pub total_traded_volume: i64,
    pub implied_volatility: f64,
    pub last_price: f64,
    pub change: f64,
    pub p_change: f64,
    pub total_buy_quantity: i64,
    pub total_sell_quantity: i64,
    pub bid_qty: i64,
    pub bid_price: f64,
    pub ask_qty: i64,
    pub ask_price: f64,
    pub underlying_value: f64,
}

/// Wall-clock timestamp format used in the CSV file.
pub mod timestamp_format {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub const FORMAT: &str = "%Y-%m-%d %H:%M:%S%.6f";

    pub fn serialize<S: Serializer>(ts: &NaiveDateTime, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(&ts.format(FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(d)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT).map_err(serde::de::Error::custom)
    }
}
