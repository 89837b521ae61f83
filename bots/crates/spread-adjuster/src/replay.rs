//! Offline replay of recorded mid prices through a [`PaperSession`], one sample per simulated
//! second.

use std::{
    fs::File,
    io::BufReader,
    path::Path,
};

use anyhow::Context;
use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use rust_decimal::Decimal;
use serde::{
    Deserialize,
    Deserializer,
};

use crate::{
    host::TradingPair,
    logs::fmt_pct,
    paper::PaperSession,
    print_kv,
    LogColor,
};

/// A recording of one mid-price sample per second, e.g.
///
/// ```json
/// { "trading_pair": "BSV-USDT", "mid_prices": [52.31, 52.30, 52.34] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReplayFile {
    pub trading_pair: TradingPair,
    #[serde(deserialize_with = "deserialize_prices")]
    pub mid_prices: Vec<Decimal>,
}

#[derive(Deserialize)]
struct ReplayPrice(
    #[serde(deserialize_with = "rust_decimal::serde::arbitrary_precision::deserialize")] Decimal,
);

fn deserialize_prices<'de, D>(deserializer: D) -> Result<Vec<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let prices = Vec::<ReplayPrice>::deserialize(deserializer)?;
    Ok(prices.into_iter().map(|ReplayPrice(p)| p).collect())
}

impl ReplayFile {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Couldn't open replay file {}", path.display()))?;
        let replay: Self = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Couldn't parse replay file {}", path.display()))?;

        if let Some(bad) = replay.mid_prices.iter().find(|p| **p <= Decimal::ZERO) {
            anyhow::bail!("Replay mid prices must be positive, found {bad}");
        }

        Ok(replay)
    }

    pub fn ensure_pair(&self, pair: &TradingPair) -> anyhow::Result<()> {
        let recorded = &self.trading_pair;
        if recorded != pair {
            anyhow::bail!("Replay and session trading pair don't match. {recorded} != {pair}");
        }

        Ok(())
    }
}

/// Feeds every recorded sample through the session, starting at `start` and advancing one second
/// per sample, then prints a summary.
pub fn run_replay(session: &mut PaperSession, replay: &ReplayFile, start: DateTime<Utc>) {
    for (i, mid_price) in replay.mid_prices.iter().enumerate() {
        let now = start + TimeDelta::seconds(i as i64);
        session.step(now, *mid_price);
    }

    let fills = session.controller.fills();
    let pair = &session.exchange.market().trading_pair;
    print_kv!("Replayed samples", replay.mid_prices.len(), LogColor::Header);
    print_kv!("Buy fills", fills.all_bid_completed);
    print_kv!("Sell fills", fills.all_ask_completed);
    print_kv!("Bid spread", fmt_pct(session.params.bid_spread()));
    print_kv!("Ask spread", fmt_pct(session.params.ask_spread()));
    print_kv!(
        "Order refresh tolerance",
        fmt_pct(session.params.order_refresh_tolerance_pct())
    );
    print_kv!(
        format!("{} balance", pair.base),
        session.exchange.total_balance(&pair.base)
    );
    print_kv!(
        format!("{} balance", pair.quote),
        session.exchange.total_balance(&pair.quote)
    );
}
