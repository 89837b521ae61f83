//! A volatility-responsive spread controller for a market-making bot.
//!
//! The controller watches recent mid-price volatility and fill frequency and nudges the host's bid
//! spread, ask spread and order-refresh tolerance. See [`controller::SpreadController`] for the
//! entry points and [`controller_parameters`] for the tuning knobs.
//!
//! The [`paper`], [`oanda`], [`replay`] and [`live`] modules provide a small host engine to run the
//! controller without a real exchange.

pub mod controller;
pub mod controller_parameters;
pub mod host;
pub mod logs;
pub mod notify;
pub mod parameters;
pub mod volatility;

pub mod live;
pub mod oanda;
pub mod paper;
pub mod replay;

pub mod cli;
pub mod load_env;

pub use logs::LogColor;
