use std::path::PathBuf;

use clap::{
    Parser,
    Subcommand,
};
use rust_decimal::Decimal;

use crate::{
    host::{
        MarketInfo,
        TradingPair,
    },
    notify::{
        ConsoleNotifier,
        ScriptLogNotifier,
        TeeNotifier,
    },
    paper::{
        PaperExchange,
        PaperSession,
    },
    parameters::QuoteParameters,
};

#[derive(Parser, Debug)]
#[command(name = "spread-adjuster", version, about)]
pub struct CliArgs {
    /// The trading pair as a string. The format is `{BASE}-{QUOTE}`; e.g. `EUR-USD`.
    #[arg(short = 'p', long)]
    pub pair: TradingPair,

    /// The exchange name balances are reported under.
    #[arg(long, default_value = "paper")]
    pub exchange: String,

    /// The initial bid spread as a fraction of the mid price.
    #[arg(long, default_value = "0.01")]
    pub bid_spread: Decimal,

    /// The initial ask spread as a fraction of the mid price.
    #[arg(long, default_value = "0.01")]
    pub ask_spread: Decimal,

    /// The initial mid-price drift, as a fraction, tolerated before orders are re-quoted.
    #[arg(long, default_value = "0.01")]
    pub order_refresh_tolerance: Decimal,

    /// Keep the unfilled side of a quote resting after the other side fills.
    #[arg(long)]
    pub hanging_orders: bool,

    /// The starting paper balance of the base asset.
    #[arg(long, default_value = "1")]
    pub base_balance: Decimal,

    /// The starting paper balance of the quote asset.
    #[arg(long, default_value = "100")]
    pub quote_balance: Decimal,

    /// The size of each paper order in base units.
    #[arg(long, default_value = "0.1")]
    pub order_size: Decimal,

    /// Also append notices to this file.
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub mode: Mode,
}

#[derive(Subcommand, Debug)]
pub enum Mode {
    /// Quote against live OANDA mid prices. Requires the `OANDA_AUTH` environment variable.
    Live {
        /// How often to poll the price feed, in milliseconds.
        #[arg(long, default_value_t = 5000)]
        poll_interval_ms: u64,
    },
    /// Replay recorded one-second mid-price samples from a JSON file.
    Replay {
        path: PathBuf,
    },
}

impl CliArgs {
    pub fn market_info(&self) -> MarketInfo {
        MarketInfo {
            exchange: self.exchange.clone(),
            trading_pair: self.pair.clone(),
        }
    }

    pub fn quote_parameters(&self) -> anyhow::Result<QuoteParameters> {
        QuoteParameters::new(
            self.bid_spread,
            self.ask_spread,
            self.order_refresh_tolerance,
            self.hanging_orders,
        )
    }

    pub fn notifier(&self) -> TeeNotifier {
        let notifier = TeeNotifier::default().with(ConsoleNotifier);
        match &self.log_file {
            Some(path) => notifier.with(ScriptLogNotifier::new(path)),
            None => notifier,
        }
    }

    /// Builds a paper session quoting around `initial_mid_price`.
    pub fn paper_session(&self, initial_mid_price: Decimal) -> anyhow::Result<PaperSession> {
        let exchange = PaperExchange::new(
            self.market_info(),
            self.order_size,
            self.base_balance,
            self.quote_balance,
            initial_mid_price,
        )?;

        Ok(PaperSession::new(
            exchange,
            self.quote_parameters()?,
            Box::new(self.notifier()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    #[test]
    fn parses_replay_args() {
        let args = CliArgs::try_parse_from([
            "spread-adjuster",
            "--pair",
            "BSV-USDT",
            "--bid-spread",
            "0.008",
            "--hanging-orders",
            "replay",
            "recording.json",
        ])
        .unwrap();

        assert_eq!(args.pair.to_string(), "BSV-USDT");
        assert_eq!(args.bid_spread, dec!(0.008));
        assert_eq!(args.ask_spread, dec!(0.01));
        assert!(args.hanging_orders);
        assert!(matches!(
            args.mode,
            Mode::Replay { ref path } if path == &PathBuf::from("recording.json")
        ));

        let params = args.quote_parameters().unwrap();
        assert!(params.hanging_orders_enabled());
        assert_eq!(params.bid_levels(), 1);
    }

    #[test]
    fn parses_live_args() {
        let args =
            CliArgs::try_parse_from(["spread-adjuster", "-p", "EUR-USD", "live"]).unwrap();

        assert!(matches!(args.mode, Mode::Live { poll_interval_ms: 5000 }));
        assert_eq!(args.market_info().exchange, "paper");
    }

    #[test]
    fn rejects_bad_pair_and_negative_spread() {
        assert!(CliArgs::try_parse_from(["spread-adjuster", "-p", "EURUSD", "live"]).is_err());

        let args = CliArgs::try_parse_from([
            "spread-adjuster",
            "-p",
            "EUR-USD",
            "--ask-spread=-0.01",
            "live",
        ])
        .unwrap();
        assert!(args.quote_parameters().is_err());
        assert!(args.paper_session(dec!(1.08)).is_err());
    }
}
