use crate::{
    controller::SpreadController,
    controller_parameters::{
        DEFAULT_BID_LEVELS,
        HANGING_BID_EXCESS,
    },
    host::Host,
    parameters::QuoteParameters,
};

impl SpreadController {
    /// Reacts to a filled buy order. Once buys outpace sells the market is likely falling through
    /// our bids, so quotes widen immediately instead of waiting for the rebalancing window.
    pub fn on_buy_order_completed(&mut self, host: Host<'_>, params: &mut QuoteParameters) {
        self.fills.record_buy();

        if self.fills.is_buy_streak() {
            self.last_completed_price = Some(host.market.mid_price());
            params.widen_after_buy_streak(self.volatility.ready_avg_short());
            host.notifier.notify(&format!(
                "Buy streak, the market is falling. Updated bid_spread={}",
                params.bid_spread()
            ));
            self.fills.reset_window();
        }
    }

    /// Reacts to a filled sell order. Mirrors [`Self::on_buy_order_completed`] for a rising market.
    ///
    /// Additionally, with hanging orders enabled, a session-wide excess of sell fills leaves bids
    /// resting that never get matched, so new bids stop until the excess shrinks.
    pub fn on_sell_order_completed(&mut self, host: Host<'_>, params: &mut QuoteParameters) {
        self.fills.record_sell();

        if self.fills.is_sell_streak() {
            self.last_completed_price = Some(host.market.mid_price());
            params.widen_after_sell_streak(self.volatility.ready_avg_short());
            host.notifier.notify(&format!(
                "Sell streak, the market is rising. Updated ask_spread={}",
                params.ask_spread()
            ));
            self.fills.reset_window();
        }

        if params.hanging_orders_enabled() && self.fills.session_sell_excess() >= HANGING_BID_EXCESS
        {
            params.set_bid_levels(0);
            host.notifier.notify("Too many hanging buy orders, pausing new buy orders");
        } else {
            params.set_bid_levels(DEFAULT_BID_LEVELS);
            host.notifier.notify("Restored the normal number of buy orders");
        }
    }
}
