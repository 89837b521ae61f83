use chrono::{
    DateTime,
    TimeDelta,
    Utc,
};
use rust_decimal::Decimal;

use crate::{
    controller::SpreadController,
    host::{
        FillEvent,
        Host,
        MarketDataProvider,
        Notifier,
    },
    paper::PaperExchange,
    parameters::QuoteParameters,
    LogColor,
};

/// How often the session prints the controller's status line.
const STATUS_INTERVAL_SECS: i64 = 5 * 60;

/// Wires a [`SpreadController`] to a [`PaperExchange`]. The session is the single owner of the
/// controller, exchange and parameters, so ticks and fills are always handled one at a time.
pub struct PaperSession {
    pub controller: SpreadController,
    pub exchange: PaperExchange,
    pub params: QuoteParameters,
    notifier: Box<dyn Notifier>,
    last_status: Option<DateTime<Utc>>,
}

impl PaperSession {
    pub fn new(
        exchange: PaperExchange,
        params: QuoteParameters,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        Self {
            controller: SpreadController::new(exchange.market().clone()),
            exchange,
            params,
            notifier,
            last_status: None,
        }
    }

    /// Records this tick's mid-price sample and returns the fills it caused. The fills are not
    /// delivered to the controller yet; see [`Self::deliver_fill`].
    pub fn sample(&mut self, mid_price: Decimal) -> Vec<FillEvent> {
        self.exchange.set_mid_price(mid_price);
        self.exchange.record_sample();
        self.exchange.match_orders()
    }

    pub fn deliver_fill(&mut self, event: FillEvent) {
        let host = Host {
            market: &self.exchange,
            balances: &self.exchange,
            notifier: self.notifier.as_ref(),
        };
        self.controller.on_fill(event, host, &mut self.params);
    }

    /// Runs the controller's tick and then lets the exchange re-quote with the updated parameters.
    pub fn tick(&mut self, now: DateTime<Utc>) {
        let host = Host {
            market: &self.exchange,
            balances: &self.exchange,
            notifier: self.notifier.as_ref(),
        };
        self.controller.on_tick(now, host, &mut self.params);
        self.exchange.refresh_orders(&self.params);

        let status_due = self
            .last_status
            .map_or(true, |last| now - last >= TimeDelta::seconds(STATUS_INTERVAL_SECS));
        if status_due {
            self.print_status();
            self.last_status = Some(now);
        }
    }

    /// One full host cycle: sample, deliver the resulting fills, then tick.
    pub fn step(&mut self, now: DateTime<Utc>, mid_price: Decimal) {
        for event in self.sample(mid_price) {
            self.deliver_fill(event);
        }
        self.tick(now);
    }

    /// The controller's status around the most recently sampled mid price.
    pub fn status_line(&self) -> String {
        let mid_price = self.exchange.mid_price_history().latest();
        self.controller.status(&self.params, mid_price)
    }

    pub fn print_status(&self) {
        crate::print_kv!("Status", self.status_line(), LogColor::Header);
    }
}
