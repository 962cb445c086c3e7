//! Scheduler model parameters

use serde::{Deserialize, Serialize};

/// Exponent of the power-law forgetting curve
pub const DECAY: f64 = -0.5;

/// Chosen so that retrievability is exactly the target retention (0.9)
/// when elapsed time equals the stability: R(S) = (1 + F)^C = 0.9
pub const FACTOR: f64 = 19.0 / 81.0;

/// Default model weights (FSRS-5).
///
/// w[0..4]  initial stability per first rating (Again..Easy)
/// w[4..8]  initial difficulty and its mean reversion
/// w[8..11] recall stability growth
/// w[11..15] post-lapse stability
/// w[15]    hard penalty, w[16] easy bonus
/// w[17..19] short-term (learning step) stability
pub const DEFAULT_WEIGHTS: [f64; 19] = [
    0.40255, 1.18385, 3.173, 15.69105, 7.1949, 0.5345, 1.4604, 0.0046, 1.54575, 0.1192, 1.01925,
    1.9395, 0.11, 0.29605, 2.2698, 0.2315, 2.9898, 0.51655, 0.6621,
];

/// Tunable parameters for the scheduler.
///
/// Interval fuzz is disabled by default so that review outcomes are
/// reproducible; enabling it requires an explicit seed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulerParams {
    pub weights: [f64; 19],
    /// Target recall probability at the scheduled due instant
    pub request_retention: f64,
    /// Hard cap on the scheduled interval, in days
    pub maximum_interval: i64,
    /// Seed for interval randomization; None disables fuzz
    #[serde(default)]
    pub fuzz_seed: Option<u64>,
}

impl Default for SchedulerParams {
    fn default() -> Self {
        Self {
            weights: DEFAULT_WEIGHTS,
            request_retention: 0.9,
            maximum_interval: 365,
            fuzz_seed: None,
        }
    }
}

impl SchedulerParams {
    /// Enable interval fuzz with an explicit seed
    pub fn with_fuzz_seed(mut self, seed: u64) -> Self {
        self.fuzz_seed = Some(seed);
        self
    }
}
