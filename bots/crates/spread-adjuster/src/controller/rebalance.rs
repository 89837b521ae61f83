use chrono::{
    DateTime,
    Utc,
};

use crate::{
    controller::SpreadController,
    controller_parameters::ACTIVE_WINDOW_FILLS,
    host::Notifier,
    logs::fmt_pct,
    parameters::QuoteParameters,
};

impl SpreadController {
    /// Nudges spreads and refresh tolerance once per rebalancing window based on how many orders
    /// filled during it.
    ///
    /// An idle window (no fills while holding capital on both sides) means quotes are too far from
    /// the mid price; an active window means they're too close. Every closed window resets the
    /// window fill counters and reports its fill count, even when neither check applies.
    pub(super) fn rebalance(
        &mut self,
        now: DateTime<Utc>,
        params: &mut QuoteParameters,
        notifier: &dyn Notifier,
    ) {
        if !self.window.is_window_closed(now) {
            return;
        }

        let window_fills = self.fills.window_total();

        if window_fills == 0 && self.balances.has_capital() {
            params.apply_idle_adjustment();
            notifier.notify(&format!(
                "No fills for 30 minutes, tightening spreads and raising the order refresh \
                 tolerance: {}",
                spreads_msg(params)
            ));
        }

        if window_fills >= ACTIVE_WINDOW_FILLS {
            params.apply_active_adjustment();
            notifier.notify(&format!(
                "Multiple fills within 30 minutes, widening spreads and lowering the order \
                 refresh tolerance: {}",
                spreads_msg(params)
            ));
        }

        notifier.notify(&format!("Fills over the last 30 minutes: {window_fills}"));

        self.fills.reset_window();
        self.window.restart(now);
    }
}

fn spreads_msg(params: &QuoteParameters) -> String {
    format!(
        "bid_spread={}, ask_spread={}, order_refresh_tolerance_pct={}",
        fmt_pct(params.bid_spread()),
        fmt_pct(params.ask_spread()),
        fmt_pct(params.order_refresh_tolerance_pct()),
    )
}
