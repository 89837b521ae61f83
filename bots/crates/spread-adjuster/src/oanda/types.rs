//! The subset of OANDA's v20 candlestick schema the price feed reads. Unknown fields are ignored.

use chrono::{
    DateTime,
    Utc,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use strum_macros::{
    AsRefStr,
    Display,
    EnumString,
};

/// Candle sizes short enough to refresh the paper mid price between ticks.
/// See: <https://developer.oanda.com/rest-live-v20/instrument-df/#CandlestickGranularity>
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Hash, EnumString, AsRefStr, Display)]
pub enum CandlestickGranularity {
    S5,
    S10,
    S15,
    S30,
    M1,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OandaCandlestickResponse {
    pub instrument: String,
    pub granularity: CandlestickGranularity,
    pub candles: Vec<OandaCandlestick>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct OandaCandlestick {
    pub time: DateTime<Utc>,
    /// Only present when midpoint candles were requested, which is the endpoint's default.
    pub mid: Option<MidClose>,
    pub complete: bool,
}

/// The closing midpoint of a candle. The open, high and low are not used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct MidClose {
    #[serde(
        rename = "c",
        deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize"
    )]
    pub close: Decimal,
}
