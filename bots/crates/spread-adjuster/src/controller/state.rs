use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use rust_decimal::Decimal;

use crate::{
    controller_parameters::{
        DUST_BALANCE,
        REBALANCE_WINDOW_SECS,
        STREAK_MIN_SESSION_FILLS,
        STREAK_THRESHOLD,
    },
    host::{
        BalanceProvider,
        MarketInfo,
    },
};

/// The bid and ask spreads the host was configured with, captured on the first tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalSpreads {
    pub bid_spread: Decimal,
    pub ask_spread: Decimal,
}

/// Counts of filled orders per side.
///
/// The `num_*` counters cover the current rebalancing window (or the time since the last streak
/// reaction, whichever is more recent). The `all_*` counters cover the whole session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FillCounters {
    pub num_bid_completed: u64,
    pub num_ask_completed: u64,
    pub all_bid_completed: u64,
    pub all_ask_completed: u64,
}

impl FillCounters {
    pub fn record_buy(&mut self) {
        self.num_bid_completed += 1;
        self.all_bid_completed += 1;
    }

    pub fn record_sell(&mut self) {
        self.num_ask_completed += 1;
        self.all_ask_completed += 1;
    }

    pub fn window_total(&self) -> u64 {
        self.num_bid_completed + self.num_ask_completed
    }

    pub fn reset_window(&mut self) {
        self.num_bid_completed = 0;
        self.num_ask_completed = 0;
    }

    /// Buy fills are outpacing sell fills, e.g. the bot keeps buying into a falling market.
    pub fn is_buy_streak(&self) -> bool {
        self.all_bid_completed >= STREAK_MIN_SESSION_FILLS
            && self.num_bid_completed.saturating_sub(self.num_ask_completed) >= STREAK_THRESHOLD
    }

    /// Sell fills are outpacing buy fills, e.g. the bot keeps selling into a rising market.
    pub fn is_sell_streak(&self) -> bool {
        self.all_ask_completed >= STREAK_MIN_SESSION_FILLS
            && self.num_ask_completed.saturating_sub(self.num_bid_completed) >= STREAK_THRESHOLD
    }

    /// Session-wide sell fills in excess of buy fills, zero if buys lead.
    pub fn session_sell_excess(&self) -> u64 {
        self.all_ask_completed.saturating_sub(self.all_bid_completed)
    }
}

/// Tracks when the current rebalancing window opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WindowTimer {
    last_window_time: Option<DateTime<Utc>>,
}

impl WindowTimer {
    pub fn last_window_time(&self) -> Option<DateTime<Utc>> {
        self.last_window_time
    }

    /// Opens the first window at `now`. Later calls have no effect.
    pub fn start(&mut self, now: DateTime<Utc>) {
        self.last_window_time.get_or_insert(now);
    }

    /// Whether a full window has elapsed as of `now`. Never true before [`Self::start`].
    pub fn is_window_closed(&self, now: DateTime<Utc>) -> bool {
        self.last_window_time
            .is_some_and(|last| now - last >= TimeDelta::seconds(REBALANCE_WINDOW_SECS))
    }

    pub fn restart(&mut self, now: DateTime<Utc>) {
        self.last_window_time = Some(now);
    }
}

/// The last observed available balances of the traded pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub available_base: Decimal,
    pub available_quote: Decimal,
}

impl BalanceSnapshot {
    /// Re-reads both balances, keeping the previous value of an asset the host hasn't seen.
    pub fn refresh(&mut self, balances: &dyn BalanceProvider, market: &MarketInfo) {
        let exchange = market.exchange.as_str();
        let pair = &market.trading_pair;

        if let Some(base) = balances.available_balance(exchange, &pair.base) {
            self.available_base = base;
        }
        if let Some(quote) = balances.available_balance(exchange, &pair.quote) {
            self.available_quote = quote;
        }
    }

    /// Whether there is capital on both sides to quote with.
    pub fn has_capital(&self) -> bool {
        self.available_base > DUST_BALANCE && self.available_quote > DUST_BALANCE
    }
}
