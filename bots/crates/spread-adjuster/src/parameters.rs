//! The live quoting parameters shared between the controller and the host's order placement.
//!
//! The controller never writes a field directly; every adjustment goes through one of the methods
//! below so the floors and ceilings in [`crate::controller_parameters`] are enforced in one place.

use rust_decimal::Decimal;

use crate::controller_parameters::*;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteParameters {
    bid_spread: Decimal,
    ask_spread: Decimal,
    order_refresh_tolerance_pct: Decimal,
    hanging_orders_enabled: bool,
    bid_levels: u32,
    ask_levels: u32,
}

impl QuoteParameters {
    /// Creates the parameter store from the host's configured values. Spread-like values are
    /// fractions of the mid price and must be non-negative.
    pub fn new(
        bid_spread: Decimal,
        ask_spread: Decimal,
        order_refresh_tolerance_pct: Decimal,
        hanging_orders_enabled: bool,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            !bid_spread.is_sign_negative(),
            "Bid spread can't be negative: {bid_spread}"
        );
        anyhow::ensure!(
            !ask_spread.is_sign_negative(),
            "Ask spread can't be negative: {ask_spread}"
        );
        anyhow::ensure!(
            !order_refresh_tolerance_pct.is_sign_negative(),
            "Order refresh tolerance can't be negative: {order_refresh_tolerance_pct}"
        );

        Ok(Self {
            bid_spread,
            ask_spread,
            order_refresh_tolerance_pct,
            hanging_orders_enabled,
            bid_levels: DEFAULT_BID_LEVELS,
            ask_levels: 1,
        })
    }

    pub fn bid_spread(&self) -> Decimal {
        self.bid_spread
    }

    pub fn ask_spread(&self) -> Decimal {
        self.ask_spread
    }

    pub fn order_refresh_tolerance_pct(&self) -> Decimal {
        self.order_refresh_tolerance_pct
    }

    pub fn hanging_orders_enabled(&self) -> bool {
        self.hanging_orders_enabled
    }

    pub fn bid_levels(&self) -> u32 {
        self.bid_levels
    }

    pub fn ask_levels(&self) -> u32 {
        self.ask_levels
    }

    pub fn set_bid_levels(&mut self, levels: u32) {
        self.bid_levels = levels;
    }

    /// Loosens quoting after a window where the bot had capital but nothing filled: spreads tighten
    /// by one step down to [`IDLE_SPREAD_FLOOR`] and the refresh tolerance grows by one step,
    /// then is kept within `[max(IDLE_TOLERANCE_FLOOR, bid, ask), IDLE_TOLERANCE_CEILING]`.
    ///
    /// The ceiling wins over the spread-derived floor.
    pub fn apply_idle_adjustment(&mut self) {
        self.bid_spread = (self.bid_spread - REBALANCE_STEP).max(IDLE_SPREAD_FLOOR);
        self.ask_spread = (self.ask_spread - REBALANCE_STEP).max(IDLE_SPREAD_FLOOR);

        let tolerance = self.order_refresh_tolerance_pct + REBALANCE_STEP;
        self.order_refresh_tolerance_pct = IDLE_TOLERANCE_FLOOR
            .max(self.bid_spread)
            .max(self.ask_spread)
            .max(tolerance)
            .min(IDLE_TOLERANCE_CEILING);
    }

    /// Tightens quoting after a window with many fills: spreads widen by one step up to
    /// [`ACTIVE_SPREAD_CAP`] and the refresh tolerance shrinks by one step, then is kept within
    /// `[ACTIVE_TOLERANCE_FLOOR, min(bid, ask)]`.
    ///
    /// The floor wins over the spread-derived ceiling.
    pub fn apply_active_adjustment(&mut self) {
        self.bid_spread = (self.bid_spread + REBALANCE_STEP).min(ACTIVE_SPREAD_CAP);
        self.ask_spread = (self.ask_spread + REBALANCE_STEP).min(ACTIVE_SPREAD_CAP);

        let tolerance = self.order_refresh_tolerance_pct - REBALANCE_STEP;
        self.order_refresh_tolerance_pct = tolerance
            .min(self.bid_spread)
            .min(self.ask_spread)
            .max(ACTIVE_TOLERANCE_FLOOR);
    }

    /// Widens quotes after a run of buy fills, i.e. the market is likely falling through our bids.
    ///
    /// Without a volatility estimate the bid spread widens by a flat step. Otherwise both spreads
    /// double (the bid capped at [`STREAK_BID_SPREAD_CAP`]) and the ask additionally widens by the
    /// short-term volatility.
    pub fn widen_after_buy_streak(&mut self, avg_short_volatility: Option<Decimal>) {
        match avg_short_volatility {
            None => self.bid_spread += STREAK_FLAT_WIDENING,
            Some(volatility) => {
                self.bid_spread = (self.bid_spread * Decimal::TWO).min(STREAK_BID_SPREAD_CAP);
                self.ask_spread = self.ask_spread * Decimal::TWO + volatility;
            }
        }
    }

    /// Widens quotes after a run of sell fills, i.e. the market is likely rising through our asks.
    ///
    /// Mirrors [`Self::widen_after_buy_streak`] except that the ask spread is not capped.
    pub fn widen_after_sell_streak(&mut self, avg_short_volatility: Option<Decimal>) {
        match avg_short_volatility {
            None => self.ask_spread += STREAK_FLAT_WIDENING,
            Some(volatility) => {
                self.ask_spread *= Decimal::TWO;
                self.bid_spread = self.bid_spread * Decimal::TWO + volatility;
            }
        }
    }
}
