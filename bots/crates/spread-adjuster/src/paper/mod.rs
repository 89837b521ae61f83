//! A minimal paper-trading host that the controller can run against: one bid and one ask quoted
//! around the mid price, filled when the mid price crosses them.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::{
    host::{
        BalanceProvider,
        FillEvent,
        MarketDataProvider,
        MarketInfo,
    },
    parameters::QuoteParameters,
    volatility::MidPriceHistory,
};

pub mod session;

pub use session::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaperOrder {
    pub is_bid: bool,
    pub price: Decimal,
    /// Size in base units.
    pub size: Decimal,
}

impl PaperOrder {
    fn is_crossed_by(&self, mid_price: Decimal) -> bool {
        if self.is_bid {
            mid_price <= self.price
        } else {
            mid_price >= self.price
        }
    }

    fn fill_event(&self) -> FillEvent {
        if self.is_bid {
            FillEvent::BuyFilled
        } else {
            FillEvent::SellFilled
        }
    }
}

#[derive(Debug, Clone)]
pub struct PaperExchange {
    market: MarketInfo,
    mid_price: Decimal,
    history: MidPriceHistory,
    /// Total balances per asset, including amounts locked in resting orders.
    balances: HashMap<String, Decimal>,
    order_size: Decimal,
    /// The current bid/ask quote.
    active: Vec<PaperOrder>,
    /// Orders left resting after their counterpart filled.
    hanging: Vec<PaperOrder>,
    /// The mid price the active orders were quoted around.
    quoted_mid: Option<Decimal>,
    filled_since_quote: bool,
}

impl PaperExchange {
    pub fn new(
        market: MarketInfo,
        order_size: Decimal,
        base_balance: Decimal,
        quote_balance: Decimal,
        initial_mid_price: Decimal,
    ) -> anyhow::Result<Self> {
        anyhow::ensure!(
            order_size > Decimal::ZERO,
            "Order size must be positive: {order_size}"
        );
        anyhow::ensure!(
            initial_mid_price > Decimal::ZERO,
            "Mid price must be positive: {initial_mid_price}"
        );

        let balances = HashMap::from([
            (market.trading_pair.base.clone(), base_balance),
            (market.trading_pair.quote.clone(), quote_balance),
        ]);

        Ok(Self {
            market,
            mid_price: initial_mid_price,
            history: MidPriceHistory::default(),
            balances,
            order_size,
            active: vec![],
            hanging: vec![],
            quoted_mid: None,
            filled_since_quote: false,
        })
    }

    pub fn market(&self) -> &MarketInfo {
        &self.market
    }

    pub fn active_orders(&self) -> &[PaperOrder] {
        &self.active
    }

    pub fn hanging_orders(&self) -> &[PaperOrder] {
        &self.hanging
    }

    pub fn total_balance(&self, asset: &str) -> Decimal {
        self.balances.get(asset).copied().unwrap_or_default()
    }

    /// Updates the latest mid price without recording a history sample. Non-positive prices are
    /// ignored.
    pub fn set_mid_price(&mut self, mid_price: Decimal) {
        if mid_price > Decimal::ZERO {
            self.mid_price = mid_price;
        }
    }

    /// Records the latest mid price as this tick's history sample.
    pub fn record_sample(&mut self) {
        self.history.push(self.mid_price);
    }

    fn locked(&self, asset: &str) -> Decimal {
        let pair = &self.market.trading_pair;
        self.active
            .iter()
            .chain(self.hanging.iter())
            .map(|o| match o.is_bid {
                true if asset == pair.quote => o.price * o.size,
                false if asset == pair.base => o.size,
                _ => Decimal::ZERO,
            })
            .sum()
    }

    fn available(&self, asset: &str) -> Decimal {
        self.total_balance(asset) - self.locked(asset)
    }

    fn settle(&mut self, order: &PaperOrder) {
        let pair = self.market.trading_pair.clone();
        let notional = order.price * order.size;
        let (base_delta, quote_delta) = if order.is_bid {
            (order.size, -notional)
        } else {
            (-order.size, notional)
        };

        *self.balances.entry(pair.base).or_default() += base_delta;
        *self.balances.entry(pair.quote).or_default() += quote_delta;
    }

    /// Fills every resting order the current mid price has crossed, moves the balances, and
    /// returns one event per fill.
    pub fn match_orders(&mut self) -> Vec<FillEvent> {
        let mid = self.mid_price;
        let (filled_active, active): (Vec<_>, Vec<_>) = std::mem::take(&mut self.active)
            .into_iter()
            .partition(|o| o.is_crossed_by(mid));
        let (filled_hanging, hanging): (Vec<_>, Vec<_>) = std::mem::take(&mut self.hanging)
            .into_iter()
            .partition(|o| o.is_crossed_by(mid));
        self.active = active;
        self.hanging = hanging;

        if !filled_active.is_empty() {
            self.filled_since_quote = true;
        }

        filled_active
            .iter()
            .chain(filled_hanging.iter())
            .map(|order| {
                self.settle(order);
                order.fill_event()
            })
            .collect()
    }

    /// Re-quotes around the current mid price when one side of the quote filled or the mid price
    /// drifted past the refresh tolerance.
    ///
    /// After a fill, the unfilled side is kept as a hanging order if hanging orders are enabled and
    /// canceled otherwise.
    pub fn refresh_orders(&mut self, params: &QuoteParameters) {
        let mid = self.mid_price;
        let drifted = match self.quoted_mid {
            None => true,
            Some(quoted) => (mid - quoted).abs() / quoted > params.order_refresh_tolerance_pct(),
        };

        if self.filled_since_quote {
            let remaining = std::mem::take(&mut self.active);
            if params.hanging_orders_enabled() {
                self.hanging.extend(remaining);
            }
        } else if drifted {
            self.active.clear();
        } else {
            return;
        }

        let pair = self.market.trading_pair.clone();
        let size = self.order_size;

        if params.bid_levels() > 0 {
            let price = mid * (Decimal::ONE - params.bid_spread());
            if price > Decimal::ZERO && self.available(&pair.quote) >= price * size {
                self.active.push(PaperOrder {
                    is_bid: true,
                    price,
                    size,
                });
            }
        }

        if params.ask_levels() > 0 {
            let price = mid * (Decimal::ONE + params.ask_spread());
            if self.available(&pair.base) >= size {
                self.active.push(PaperOrder {
                    is_bid: false,
                    price,
                    size,
                });
            }
        }

        self.quoted_mid = Some(mid);
        self.filled_since_quote = false;
    }
}

impl MarketDataProvider for PaperExchange {
    fn mid_price(&self) -> Decimal {
        self.mid_price
    }

    fn mid_price_history(&self) -> &MidPriceHistory {
        &self.history
    }
}

impl BalanceProvider for PaperExchange {
    fn available_balance(&self, exchange: &str, asset: &str) -> Option<Decimal> {
        if exchange != self.market.exchange || !self.balances.contains_key(asset) {
            return None;
        }
        Some(self.available(asset))
    }
}
