//! Runs the spread controller against a paper exchange, fed by live OANDA prices or a replay file.

use chrono::Utc;
use clap::Parser;
use spread_adjuster::{
    cli::{
        CliArgs,
        Mode,
    },
    live::{
        fetch_mid_price,
        run_live,
    },
    load_env,
    oanda::{
        instrument_for,
        CandlestickGranularity,
        OandaArgs,
    },
    print_kv,
    replay::{
        run_replay,
        ReplayFile,
    },
    LogColor,
};

const GRANULARITY: CandlestickGranularity = CandlestickGranularity::S5;
const NUM_CANDLES: u64 = 1;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    print_kv!("Trading pair", &args.pair, LogColor::Header);

    match &args.mode {
        Mode::Replay { path } => {
            let replay = ReplayFile::load(path)?;
            replay.ensure_pair(&args.pair)?;
            let initial_mid_price = replay
                .mid_prices
                .first()
                .copied()
                .ok_or_else(|| anyhow::anyhow!("Replay file has no mid prices"))?;

            let mut session = args.paper_session(initial_mid_price)?;
            run_replay(&mut session, &replay, Utc::now());
        }
        Mode::Live { poll_interval_ms } => {
            let oanda_args = OandaArgs {
                auth_token: load_env::oanda_auth_token()?,
                instrument: instrument_for(&args.pair),
                granularity: GRANULARITY,
                num_candles: NUM_CANDLES,
            };
            let client = reqwest::Client::new();

            let initial_mid_price = fetch_mid_price(&oanda_args, &client).await?;
            print_kv!("Initial mid price", initial_mid_price);

            let session = args.paper_session(initial_mid_price)?;
            run_live(session, oanda_args, client, *poll_interval_ms).await?;
        }
    }

    Ok(())
}
