//! The live paper-trading loop: OANDA mid prices drive a [`PaperSession`] in real time.

use std::{
    cell::RefCell,
    rc::Rc,
    time::Duration,
};

use chrono::{
    DateTime,
    Utc,
};
use rust_decimal::Decimal;
use tokio::sync::mpsc;

use crate::{
    host::{
        FillEvent,
        MarketDataProvider,
    },
    logs::timestamp,
    oanda::{
        latest_mid_close,
        query_price_feed,
        OandaArgs,
    },
    paper::PaperSession,
    print_kv,
    LogColor,
};

/// The host samples the mid price and ticks the controller once per second.
const TICK_INTERVAL_MS: u64 = 1000;

/// Work for the session's single consumer. A sample's fills are always queued ahead of the tick
/// that follows them, so the controller reacts to a fill before orders are re-quoted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostEvent {
    Fill(FillEvent),
    Tick(DateTime<Utc>),
}

/// Polls the price feed once and returns its latest mid close.
pub async fn fetch_mid_price(
    oanda_args: &OandaArgs,
    client: &reqwest::Client,
) -> anyhow::Result<Decimal> {
    let response = query_price_feed(oanda_args, client).await?;
    latest_mid_close(response, &oanda_args.instrument)
}

/// Runs the price poller, the tick loop, and the event consumer until one of them fails.
pub async fn run_live(
    session: PaperSession,
    oanda_args: OandaArgs,
    client: reqwest::Client,
    poll_interval_ms: u64,
) -> anyhow::Result<()> {
    let session = Rc::new(RefCell::new(session));
    let (sender, receiver) = mpsc::unbounded_channel();

    tokio::select! {
        r1 = poll_price_feed(session.clone(), client, oanda_args, poll_interval_ms) => {
            println!("Price feed poll loop terminated: {r1:#?}");
        },
        r2 = tick_loop(session.clone(), sender) => {
            println!("Tick loop terminated: {r2:#?}");
        },
        r3 = consume_events(session.clone(), receiver) => {
            println!("Event consumer terminated: {r3:#?}");
        }
    }

    Ok(())
}

/// The indefinite task loop for polling the price feed endpoint. Each response only updates the
/// latest mid price; samples are recorded by [`tick_loop`].
async fn poll_price_feed(
    session: Rc<RefCell<PaperSession>>,
    client: reqwest::Client,
    oanda_args: OandaArgs,
    poll_interval_ms: u64,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(Duration::from_millis(poll_interval_ms));

    loop {
        interval.tick().await;

        match fetch_mid_price(&oanda_args, &client).await {
            Ok(mid_price) => session
                .try_borrow_mut()?
                .exchange
                .set_mid_price(mid_price),
            Err(e) => eprintln!(
                "{}",
                crate::fmt_kv!(format!("[{}] Price feed error", timestamp()), e, LogColor::Error)
            ),
        }
    }
}

/// Records this tick's sample and queues its fills followed by the tick itself.
fn queue_tick(
    session: &mut PaperSession,
    now: DateTime<Utc>,
    sender: &mpsc::UnboundedSender<HostEvent>,
) -> anyhow::Result<()> {
    let mid_price = session.exchange.mid_price();
    for event in session.sample(mid_price) {
        print_kv!(format!("[{}] Paper fill", timestamp()), event, LogColor::Warning);
        sender.send(HostEvent::Fill(event))?;
    }
    sender.send(HostEvent::Tick(now))?;

    Ok(())
}

fn handle_event(session: &mut PaperSession, event: HostEvent) {
    match event {
        HostEvent::Fill(fill) => session.deliver_fill(fill),
        HostEvent::Tick(now) => session.tick(now),
    }
}

/// The indefinite task loop that samples the mid price and matches paper orders once per second.
async fn tick_loop(
    session: Rc<RefCell<PaperSession>>,
    sender: mpsc::UnboundedSender<HostEvent>,
) -> anyhow::Result<()> {
    let mut interval = tokio::time::interval(Duration::from_millis(TICK_INTERVAL_MS));

    loop {
        interval.tick().await;
        queue_tick(&mut *session.try_borrow_mut()?, Utc::now(), &sender)?;
    }
}

/// The single consumer of host events. Each event is handled to completion before the next one
/// is received.
async fn consume_events(
    session: Rc<RefCell<PaperSession>>,
    mut receiver: mpsc::UnboundedReceiver<HostEvent>,
) -> anyhow::Result<()> {
    while let Some(event) = receiver.recv().await {
        handle_event(&mut *session.try_borrow_mut()?, event);
    }

    anyhow::bail!("Host event channel closed")
}

#[cfg(test)]
mod tests {
    use chrono::{
        TimeDelta,
        TimeZone,
    };
    use rust_decimal::dec;

    use super::*;
    use crate::{
        host::MarketInfo,
        notify::RecordingNotifier,
        paper::PaperExchange,
        parameters::QuoteParameters,
    };

    fn session() -> PaperSession {
        let market = MarketInfo {
            exchange: "paper".into(),
            trading_pair: "BSV-USDT".parse().unwrap(),
        };
        let exchange =
            PaperExchange::new(market, dec!(1), dec!(10), dec!(1000), dec!(100)).unwrap();
        let params = QuoteParameters::new(dec!(0.01), dec!(0.01), dec!(0.01), false).unwrap();
        PaperSession::new(exchange, params, Box::new(RecordingNotifier::default()))
    }

    /// Two buys already filled and the session quoting a 99 bid around a mid price of 100.
    fn session_one_buy_from_streak(start: DateTime<Utc>) -> PaperSession {
        let mut s = session();
        s.deliver_fill(FillEvent::BuyFilled);
        s.deliver_fill(FillEvent::BuyFilled);
        s.tick(start);
        assert_eq!(s.exchange.active_orders()[0].price, dec!(99));
        s
    }

    fn resting_bid(s: &PaperSession) -> Option<Decimal> {
        s.exchange
            .active_orders()
            .iter()
            .find(|o| o.is_bid)
            .map(|o| o.price)
    }

    #[test]
    fn fills_are_queued_ahead_of_their_tick() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let now = start + TimeDelta::seconds(1);
        let mut s = session_one_buy_from_streak(start);
        let (sender, mut receiver) = mpsc::unbounded_channel();

        s.exchange.set_mid_price(dec!(98.5));
        queue_tick(&mut s, now, &sender).unwrap();

        let mut events = vec![];
        while let Ok(event) = receiver.try_recv() {
            events.push(event);
        }
        assert_eq!(
            events,
            vec![HostEvent::Fill(FillEvent::BuyFilled), HostEvent::Tick(now)]
        );

        events.into_iter().for_each(|event| handle_event(&mut s, event));

        // The streak widened the bid before the re-quote, just like a replay step.
        let mut stepped = session_one_buy_from_streak(start);
        stepped.step(now, dec!(98.5));

        assert_eq!(s.params.bid_spread(), dec!(0.02));
        assert_eq!(resting_bid(&s), Some(dec!(96.53)));
        assert_eq!(resting_bid(&s), resting_bid(&stepped));
        assert_eq!(s.controller.fills(), stepped.controller.fills());
    }

    #[tokio::test]
    async fn consumer_handles_queued_events_in_order() {
        let start = Utc.with_ymd_and_hms(2026, 3, 1, 0, 0, 0).unwrap();
        let session = Rc::new(RefCell::new(session_one_buy_from_streak(start)));
        let (sender, receiver) = mpsc::unbounded_channel();

        {
            let mut guard = session.borrow_mut();
            guard.exchange.set_mid_price(dec!(98.5));
            queue_tick(&mut guard, start + TimeDelta::seconds(1), &sender).unwrap();
        }
        drop(sender);

        assert!(consume_events(session.clone(), receiver).await.is_err());

        let s = session.borrow();
        assert_eq!(s.controller.fills().all_bid_completed, 3);
        assert_eq!(resting_bid(&s), Some(dec!(96.53)));
    }
}
