//! The volatility-responsive spread controller.
//!
//! The host calls [`SpreadController::on_tick`] once per tick and [`SpreadController::on_fill`]
//! once per completed order, strictly one after the other. Both handlers mutate the same
//! [`QuoteParameters`], so a host that delivers ticks and fills from different threads must
//! serialize access to the controller and parameters as a whole.

use chrono::{
    DateTime,
    Utc,
};
use rust_decimal::Decimal;

use crate::{
    host::{
        FillEvent,
        Host,
        MarketInfo,
    },
    logs::fmt_pct,
    parameters::QuoteParameters,
    volatility::VolatilityState,
};

pub mod fill_streak;
pub mod rebalance;
pub mod state;

pub use state::*;

#[derive(Debug, Clone)]
pub struct SpreadController {
    market: MarketInfo,
    volatility: VolatilityState,
    original_spreads: Option<OriginalSpreads>,
    fills: FillCounters,
    window: WindowTimer,
    balances: BalanceSnapshot,
    last_completed_price: Option<Decimal>,
}

impl SpreadController {
    pub fn new(market: MarketInfo) -> Self {
        Self {
            market,
            volatility: VolatilityState::default(),
            original_spreads: None,
            fills: FillCounters::default(),
            window: WindowTimer::default(),
            balances: BalanceSnapshot::default(),
            last_completed_price: None,
        }
    }

    pub fn market(&self) -> &MarketInfo {
        &self.market
    }

    pub fn volatility(&self) -> VolatilityState {
        self.volatility
    }

    /// See [`OriginalSpreads`].
    pub fn original_spreads(&self) -> Option<OriginalSpreads> {
        self.original_spreads
    }

    pub fn fills(&self) -> FillCounters {
        self.fills
    }

    pub fn window(&self) -> WindowTimer {
        self.window
    }

    pub fn balances(&self) -> BalanceSnapshot {
        self.balances
    }

    /// The mid price at the most recent streak reaction.
    pub fn last_completed_price(&self) -> Option<Decimal> {
        self.last_completed_price
    }

    /// The time-driven handler: refreshes balances and volatility, then closes the rebalancing
    /// window if it has elapsed.
    pub fn on_tick(&mut self, now: DateTime<Utc>, host: Host<'_>, params: &mut QuoteParameters) {
        self.balances.refresh(host.balances, &self.market);

        if self.original_spreads.is_none() {
            self.original_spreads = Some(OriginalSpreads {
                bid_spread: params.bid_spread(),
                ask_spread: params.ask_spread(),
            });
        }

        self.volatility.update(host.market.mid_price_history());

        self.window.start(now);
        self.rebalance(now, params, host.notifier);
    }

    /// The event-driven handler for a single completed order.
    pub fn on_fill(&mut self, event: FillEvent, host: Host<'_>, params: &mut QuoteParameters) {
        match event {
            FillEvent::BuyFilled => self.on_buy_order_completed(host, params),
            FillEvent::SellFilled => self.on_sell_order_completed(host, params),
        }
    }

    /// A one-line summary of the volatility estimates and current quoting parameters.
    pub fn status(&self, params: &QuoteParameters, mid_price: Option<Decimal>) -> String {
        let params_msg = format!(
            "bid_spread={}  ask_spread={}  order_refresh_tolerance_pct={}",
            fmt_pct(params.bid_spread()),
            fmt_pct(params.ask_spread()),
            fmt_pct(params.order_refresh_tolerance_pct()),
        );

        match (self.volatility.avg_short, self.volatility.median_long) {
            (Some(short), Some(long)) => {
                let mid_price_msg = mid_price
                    .map(|mid| format!("mid_price: {mid}  "))
                    .unwrap_or_default();
                format!(
                    "short_volatility: {}  long_volatility: {}  {mid_price_msg}{params_msg}",
                    fmt_pct(short),
                    fmt_pct(long),
                )
            }
            _ => format!("short_volatility: N/A  long_volatility: N/A  {params_msg}"),
        }
    }
}
