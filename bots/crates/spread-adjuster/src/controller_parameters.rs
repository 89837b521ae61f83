//! The knobs in this file define how aggressively the controller reacts to volatility and fill
//! frequency. Spread-like values are fractions of the mid price, e.g. `0.005` is 0.5%.

use rust_decimal::{
    dec,
    Decimal,
};

/// Number of mid-price samples between two volatility samples. The host records one mid-price
/// sample per tick and ticks once per second, so this is also the interval in seconds.
pub const SAMPLE_INTERVAL: usize = 60;

/// How many [`SAMPLE_INTERVAL`]s the short-term average volatility covers.
pub const SHORT_PERIOD: usize = 5;

/// How many [`SAMPLE_INTERVAL`]s the long-term median volatility covers.
pub const LONG_PERIOD: usize = 30;

/// Length of one periodic rebalancing window, in seconds.
pub const REBALANCE_WINDOW_SECS: i64 = 30 * 60;

/// The amount spreads and refresh tolerance move by at the close of a rebalancing window.
pub const REBALANCE_STEP: Decimal = dec!(0.001);

/// Idle windows never tighten a spread below this value.
pub const IDLE_SPREAD_FLOOR: Decimal = dec!(0.005);

/// Lower bound of the refresh tolerance after an idle window. The tolerance is also never allowed
/// below either spread after an idle window.
pub const IDLE_TOLERANCE_FLOOR: Decimal = dec!(0.01);

/// Upper bound of the refresh tolerance after an idle window.
pub const IDLE_TOLERANCE_CEILING: Decimal = dec!(0.02);

/// Active windows never widen a spread above this value.
pub const ACTIVE_SPREAD_CAP: Decimal = dec!(0.015);

/// Lower bound of the refresh tolerance after an active window.
pub const ACTIVE_TOLERANCE_FLOOR: Decimal = dec!(0.002);

/// A window with at least this many fills counts as active.
pub const ACTIVE_WINDOW_FILLS: u64 = 3;

/// Both available balances must exceed this amount for an empty window to count as idle, i.e. the
/// bot had capital to quote with and still didn't get filled.
pub const DUST_BALANCE: Decimal = dec!(0.1);

/// Fills of one side in excess of the other side (since the last reset) that count as a streak.
pub const STREAK_THRESHOLD: u64 = 2;

/// Fills of one side across the whole session required before a streak on that side can fire.
pub const STREAK_MIN_SESSION_FILLS: u64 = 3;

/// Flat widening applied to the streak side when volatility isn't known yet.
pub const STREAK_FLAT_WIDENING: Decimal = dec!(0.01);

/// A buy streak never doubles the bid spread past this value.
pub const STREAK_BID_SPREAD_CAP: Decimal = dec!(0.2);

/// Session-wide sell fills in excess of buy fills at which new buy orders stop being placed while
/// hanging orders are enabled.
pub const HANGING_BID_EXCESS: u64 = 2;

/// Bid levels restored once the sell excess falls back under [`HANGING_BID_EXCESS`].
pub const DEFAULT_BID_LEVELS: u32 = 1;
