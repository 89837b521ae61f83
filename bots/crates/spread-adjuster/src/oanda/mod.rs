//! Mid prices from OANDA's candlestick endpoint, used as the paper host's live price feed.

pub mod price_feed;
pub mod types;

pub use price_feed::*;
pub use types::*;
