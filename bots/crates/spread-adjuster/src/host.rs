//! The narrow interfaces the controller needs from the host market-making engine. The host owns
//! price polling, balances, order placement, and user notifications; the controller only reads
//! through these traits and writes to [`crate::parameters::QuoteParameters`].

use std::{
    fmt::Display,
    str::FromStr,
};

use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Deserializer,
};
use strum_macros::Display;

use crate::volatility::MidPriceHistory;

/// A trading pair such as `BTC-USDT`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TradingPair {
    pub base: String,
    pub quote: String,
}

impl Display for TradingPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (base, quote) = (&self.base, &self.quote);
        write!(f, "{base}-{quote}")
    }
}

impl FromStr for TradingPair {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (base, quote) = s
            .split_once('-')
            .ok_or_else(|| anyhow::anyhow!("Invalid trading pair format: {s}"))?;

        if base.is_empty() || quote.is_empty() || quote.contains('-') {
            anyhow::bail!("Invalid trading pair format: {s}");
        }

        Ok(TradingPair {
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }
}

impl<'de> Deserialize<'de> for TradingPair {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// The market the controller is attached to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketInfo {
    pub exchange: String,
    pub trading_pair: TradingPair,
}

/// Read access to the host's price feed.
pub trait MarketDataProvider {
    /// The latest known mid price.
    fn mid_price(&self) -> Decimal;

    /// Mid-price samples at the host's fixed tick interval. The history may be arbitrarily short
    /// while the host is warming up.
    fn mid_price_history(&self) -> &MidPriceHistory;
}

/// Read access to the host's balances.
pub trait BalanceProvider {
    /// The available balance of `asset` on `exchange`, or `None` if the host hasn't seen the asset.
    fn available_balance(&self, exchange: &str, asset: &str) -> Option<Decimal>;
}

/// A fire-and-forget, user-facing notice.
pub trait Notifier {
    fn notify(&self, message: &str);
}

/// Everything the controller's handlers read from the host, bundled for a single handler call.
#[derive(Clone, Copy)]
pub struct Host<'a> {
    pub market: &'a dyn MarketDataProvider,
    pub balances: &'a dyn BalanceProvider,
    pub notifier: &'a dyn Notifier,
}

/// A completed order, delivered once per fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum FillEvent {
    BuyFilled,
    SellFilled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_trading_pair() {
        let pair: TradingPair = "BSV-USDT".parse().unwrap();
        assert_eq!(pair.base, "BSV");
        assert_eq!(pair.quote, "USDT");
        assert_eq!(pair.to_string(), "BSV-USDT");

        assert!("BSVUSDT".parse::<TradingPair>().is_err());
        assert!("-USDT".parse::<TradingPair>().is_err());
        assert!("BSV-".parse::<TradingPair>().is_err());
        assert!("A-B-C".parse::<TradingPair>().is_err());
    }

    #[test]
    fn deserialize_trading_pair() {
        let pair: TradingPair = serde_json::from_str("\"ETH-BTC\"").unwrap();
        assert_eq!(
            pair,
            TradingPair {
                base: "ETH".into(),
                quote: "BTC".into(),
            }
        );
        assert!(serde_json::from_str::<TradingPair>("\"ETHBTC\"").is_err());
    }

    #[test]
    fn fill_event_display() {
        assert_eq!(FillEvent::BuyFilled.to_string(), "BuyFilled");
        assert_eq!(FillEvent::SellFilled.to_string(), "SellFilled");
    }
}
