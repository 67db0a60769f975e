//! Interstitial pacing between matches.

use rand::Rng;
use rand::rngs::StdRng;
use tracing::{debug, info, instrument};

/// Decides after which finished matches an interstitial is due.
///
/// The threshold is drawn uniformly from `[min, max]` and redrawn each time
/// it is reached.
#[derive(Debug, Clone)]
pub struct AdPacing {
    min: u32,
    max: u32,
    finished: u32,
    threshold: u32,
    rng: StdRng,
}

impl AdPacing {
    /// Creates pacing over `[min, max]`. Bounds are normalised so that
    /// `1 <= min <= max`.
    #[instrument(skip(rng))]
    pub fn new(min: u32, max: u32, mut rng: StdRng) -> Self {
        let min = min.max(1);
        let max = max.max(min);
        let threshold = rng.gen_range(min..=max);
        debug!(threshold, "Ad threshold drawn");
        Self {
            min,
            max,
            finished: 0,
            threshold,
            rng,
        }
    }

    /// Counts one finished match. Returns true when an interstitial is due.
    #[instrument(skip(self), fields(finished = self.finished, threshold = self.threshold))]
    pub fn notify_match_finished(&mut self) -> bool {
        self.finished += 1;
        if self.finished < self.threshold {
            return false;
        }
        self.finished = 0;
        self.threshold = self.rng.gen_range(self.min..=self.max);
        info!(next_threshold = self.threshold, "Interstitial due");
        true
    }

    /// Matches counted since the last interstitial.
    pub fn finished(&self) -> u32 {
        self.finished
    }

    /// Matches needed for the next interstitial.
    pub fn threshold(&self) -> u32 {
        self.threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_fixed_threshold() {
        let mut pacing = AdPacing::new(2, 2, StdRng::seed_from_u64(1));
        let due: Vec<bool> = (0..6).map(|_| pacing.notify_match_finished()).collect();
        assert_eq!(due, vec![false, true, false, true, false, true]);
    }

    #[test]
    fn test_threshold_stays_in_range() {
        let mut pacing = AdPacing::new(2, 3, StdRng::seed_from_u64(9));
        let mut since = 0;
        for _ in 0..200 {
            assert!((2..=3).contains(&pacing.threshold()));
            since += 1;
            if pacing.notify_match_finished() {
                assert!((2..=3).contains(&since));
                since = 0;
            }
        }
    }

    #[test]
    fn test_bounds_normalised() {
        let pacing = AdPacing::new(0, 0, StdRng::seed_from_u64(3));
        assert_eq!(pacing.threshold(), 1);
    }
}
