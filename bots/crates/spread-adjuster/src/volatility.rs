//! Volatility estimation from the host's mid-price history.
//!
//! Volatility here is the unsigned fractional change between two consecutive samples; e.g. a move
//! from 100 to 97 and a move from 97 to 100 both count as roughly 3%. The short-term estimate is
//! the average of those changes to catch recent sudden moves, and the long-term estimate is their
//! median so that a single spike doesn't shift the market's "normal" volatility.

use std::collections::VecDeque;

use itertools::Itertools;
use rust_decimal::{
    dec,
    Decimal,
};

use crate::controller_parameters::{
    LONG_PERIOD,
    SAMPLE_INTERVAL,
    SHORT_PERIOD,
};

/// A bounded rolling buffer of mid-price samples, one per host tick. The newest sample is at the
/// front.
#[derive(Debug, Clone)]
pub struct MidPriceHistory {
    samples: VecDeque<Decimal>,
    capacity: usize,
}

impl Default for MidPriceHistory {
    /// Enough capacity to cover the long period.
    fn default() -> Self {
        Self::with_capacity(SAMPLE_INTERVAL * LONG_PERIOD + 1)
    }
}

impl MidPriceHistory {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Records the latest mid price, evicting the oldest sample once the buffer is full.
    pub fn push(&mut self, mid_price: Decimal) {
        if self.samples.len() == self.capacity {
            self.samples.pop_back();
        }
        self.samples.push_front(mid_price);
    }

    pub fn latest(&self) -> Option<Decimal> {
        self.samples.front().copied()
    }

    /// Iterates over the samples, most recent first.
    pub fn iter_recent_first(&self) -> impl Iterator<Item = &Decimal> {
        self.samples.iter()
    }

    /// Picks `count` samples spaced `interval` ticks apart, starting at the latest sample and
    /// walking back in time. The picks are returned in chronological order.
    ///
    /// Returns `None` until the history holds enough samples to make every pick.
    pub fn take_samples(&self, interval: usize, count: usize) -> Option<Vec<Decimal>> {
        if count == 0 {
            return Some(vec![]);
        }

        let mut picks = self
            .iter_recent_first()
            .step_by(interval.max(1))
            .take(count)
            .copied()
            .collect_vec();

        if picks.len() < count {
            return None;
        }

        picks.reverse();
        Some(picks)
    }
}

/// The unsigned fractional changes between consecutive samples taken `interval` ticks apart.
/// `length` changes require `length + 1` samples.
///
/// A non-positive sample can't produce a meaningful ratio, so it makes the whole result absent.
fn price_changes(
    history: &MidPriceHistory,
    interval: usize,
    length: usize,
) -> Option<Vec<Decimal>> {
    let samples = history.take_samples(interval, length + 1)?;

    samples
        .iter()
        .tuple_windows()
        .map(|(prev, next)| {
            let (low, high) = ((*prev).min(*next), (*prev).max(*next));
            if low <= Decimal::ZERO {
                return None;
            }
            high.checked_div(low).map(|ratio| ratio - Decimal::ONE)
        })
        .collect()
}

fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len()))
}

fn median(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }

    let sorted = values.iter().copied().sorted().collect_vec();
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / dec!(2))
    } else {
        Some(sorted[mid])
    }
}

/// The average volatility over the last `length` intervals.
pub fn avg_price_volatility(
    history: &MidPriceHistory,
    interval: usize,
    length: usize,
) -> Option<Decimal> {
    mean(&price_changes(history, interval, length)?)
}

/// The median volatility over the last `length` intervals.
pub fn median_price_volatility(
    history: &MidPriceHistory,
    interval: usize,
    length: usize,
) -> Option<Decimal> {
    median(&price_changes(history, interval, length)?)
}

/// The controller's current view of market volatility. Both values stay `None` until the host's
/// history covers their window; `None` means "not enough data", never "zero volatility".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VolatilityState {
    pub avg_short: Option<Decimal>,
    pub median_long: Option<Decimal>,
}

impl VolatilityState {
    /// Recomputes both estimates from `history`.
    pub fn update(&mut self, history: &MidPriceHistory) {
        self.avg_short = avg_price_volatility(history, SAMPLE_INTERVAL, SHORT_PERIOD);
        self.median_long = median_price_volatility(history, SAMPLE_INTERVAL, LONG_PERIOD);
    }

    pub fn is_ready(&self) -> bool {
        self.avg_short.is_some() && self.median_long.is_some()
    }

    /// The short-term average, only once both estimates are available.
    pub fn ready_avg_short(&self) -> Option<Decimal> {
        if self.is_ready() {
            self.avg_short
        } else {
            None
        }
    }
}

/// A full default-capacity history, one sample per tick, whose price alternates between 100 and
/// 101 at every sampling interval so each short and long period change is exactly 1%.
#[cfg(test)]
pub(crate) fn history_with_one_percent_moves() -> MidPriceHistory {
    let mut history = MidPriceHistory::default();
    for i in 0..=(SAMPLE_INTERVAL * LONG_PERIOD) {
        let step = i / SAMPLE_INTERVAL;
        history.push(if step % 2 == 0 { dec!(100) } else { dec!(101) });
    }
    history
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;

    use super::*;

    fn history_of(prices: &[Decimal]) -> MidPriceHistory {
        let mut history = MidPriceHistory::with_capacity(prices.len());
        prices.iter().for_each(|p| history.push(*p));
        history
    }

    #[test]
    fn take_samples_walks_back_from_latest() {
        let prices = (1..=10).map(Decimal::from).collect_vec();
        let history = history_of(&prices);

        assert_eq!(
            history.take_samples(3, 4),
            Some(vec![dec!(1), dec!(4), dec!(7), dec!(10)])
        );
        assert_eq!(history.take_samples(3, 5), None);
        assert_eq!(history.take_samples(1, 2), Some(vec![dec!(9), dec!(10)]));
    }

    #[test]
    fn history_evicts_oldest() {
        let mut history = MidPriceHistory::with_capacity(3);
        for p in [dec!(1), dec!(2), dec!(3), dec!(4)] {
            history.push(p);
        }

        assert_eq!(history.latest(), Some(dec!(4)));
        assert_eq!(
            history.iter_recent_first().copied().collect_vec(),
            vec![dec!(4), dec!(3), dec!(2)]
        );
    }

    #[test]
    fn volatility_is_unsigned() {
        // Up 2% then back down by the same ratio.
        let history = history_of(&[dec!(100), dec!(102), dec!(100)]);

        assert_eq!(avg_price_volatility(&history, 1, 2), Some(dec!(0.02)));
    }

    #[test]
    fn insufficient_history_is_absent() {
        let history = history_of(&[dec!(100), dec!(101)]);

        assert_eq!(avg_price_volatility(&history, 1, 2), None);
        assert_eq!(median_price_volatility(&history, 1, 2), None);

        let mut state = VolatilityState::default();
        state.update(&history);
        assert!(!state.is_ready());
        assert_eq!(state.ready_avg_short(), None);
    }

    #[test]
    fn non_positive_sample_is_absent() {
        let history = history_of(&[dec!(100), dec!(0), dec!(100)]);

        assert_eq!(avg_price_volatility(&history, 1, 2), None);
    }

    #[test]
    fn median_ignores_single_spike() {
        // 31 samples alternating between 100 and 100.1 give 30 changes of exactly 0.1%.
        let mut prices = (0..31)
            .map(|i| if i % 2 == 0 { dec!(100) } else { dec!(100.1) })
            .collect_vec();
        // A single 50% spike.
        prices[15] = dec!(150);
        let history = history_of(&prices);

        let median = median_price_volatility(&history, 1, 30).unwrap();
        let mean = avg_price_volatility(&history, 1, 30).unwrap();

        assert_eq!(median, dec!(0.001));
        assert!(mean > dec!(0.03));
    }

    #[test]
    fn median_of_even_count_averages_middle_values() {
        assert_eq!(
            median(&[dec!(0.4), dec!(0.1), dec!(0.3), dec!(0.2)]),
            Some(dec!(0.25))
        );
        assert_eq!(median(&[dec!(0.3), dec!(0.1), dec!(0.2)]), Some(dec!(0.2)));
    }

    #[test]
    fn state_uses_sampling_interval() {
        let history = history_with_one_percent_moves();

        let mut state = VolatilityState::default();
        state.update(&history);

        assert_eq!(state.avg_short, Some(dec!(0.01)));
        assert_eq!(state.median_long, Some(dec!(0.01)));
        assert_eq!(state.ready_avg_short(), Some(dec!(0.01)));
    }
}
