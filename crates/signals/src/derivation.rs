//! Signal derivation engine
//!
//! Maps one raw reading to a classified signal. The function is total: bad
//! numeric input degrades to `None` fields instead of an error, because the
//! vendor feed is unreliable and an upstream label is still worth keeping.

use crate::thresholds::{
    BBWP_CLASSES, CENTER_ZONE_POINTS, COMPRESSION_POINTS, DEFAULT_FIB_LEVEL,
    EXTREME_COMPRESSION_MAX_RANGE, FIB_CUTTING_POINTS, FIB_LADDER, FIB_ZONES,
    PERFECT_SETUP_MAX_CENTER, SIGNAL_TIERS, SLOPE_POINTS, SidePoints,
};
use jewel_core::{DerivedSignal, Reading, SignalSide, SignalType};

/// Accumulated buy and sell scores (each 0..=100)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Scores {
    pub buy: u8,
    pub sell: u8,
}

impl Scores {
    fn add(&mut self, points: SidePoints) {
        self.buy += points.buy;
        self.sell += points.sell;
    }

    /// Side with the strictly greater score, with that score
    pub fn winner(&self) -> Option<(SignalSide, u8)> {
        if self.buy > self.sell {
            Some((SignalSide::Buy, self.buy))
        } else if self.sell > self.buy {
            Some((SignalSide::Sell, self.sell))
        } else {
            None
        }
    }
}

/// Derive a classified signal from a reading
pub fn derive(reading: &Reading) -> DerivedSignal {
    let bbwp_value = reading.bbwp.filter(|v| v.is_finite());
    let bbwp_classification = bbwp_value.map(|v| BBWP_CLASSES.classify(v));

    let Some(lines) = reading.jewel_lines() else {
        return DerivedSignal {
            compression_range: None,
            compression_center: None,
            fib_zone: None,
            nearest_fib_level: DEFAULT_FIB_LEVEL,
            buy_score: None,
            sell_score: None,
            signal_type: reading.prior_signal_type.clone(),
            signal_strength: reading.prior_signal_strength,
            fib_cutting: false,
            bbwp_value,
            bbwp_classification,
            extreme_compression: false,
            perfect_setup: false,
        };
    };

    let min = lines.iter().copied().fold(f64::INFINITY, f64::min);
    let max = lines.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let range = max - min;
    let center = lines.iter().sum::<f64>() / 3.0;

    let fib_cutting = reading
        .fib
        .is_some_and(|fib| fib.is_finite() && fib > min && fib < max);
    let extreme_compression = range <= EXTREME_COMPRESSION_MAX_RANGE;
    let perfect_setup = extreme_compression && center < PERFECT_SETUP_MAX_CENTER;

    let mut scores = Scores::default();
    scores.add(COMPRESSION_POINTS.classify(range));
    scores.add(CENTER_ZONE_POINTS.classify(center));
    if let Some(slope) = reading.slope_fast.filter(|s| s.is_finite()) {
        scores.add(SLOPE_POINTS.classify(slope));
    }
    if fib_cutting {
        scores.add(FIB_CUTTING_POINTS);
    }

    // Inconclusive engine output keeps the upstream label
    let (signal_type, signal_strength) = match classify(scores) {
        Some((label, strength)) => (Some(label), Some(strength)),
        None => match &reading.prior_signal_type {
            Some(prior) => (Some(prior.clone()), reading.prior_signal_strength),
            None => (None, None),
        },
    };

    DerivedSignal {
        compression_range: Some(range),
        compression_center: Some(center),
        fib_zone: Some(FIB_ZONES.classify(center)),
        nearest_fib_level: nearest_fib_level(center),
        buy_score: Some(scores.buy),
        sell_score: Some(scores.sell),
        signal_type,
        signal_strength,
        fib_cutting,
        bbwp_value,
        bbwp_classification,
        extreme_compression,
        perfect_setup,
    }
}

/// Fresh label and strength for a pair of scores
///
/// Ties (including 0/0) and winners below 30 produce no label.
pub fn classify(scores: Scores) -> Option<(SignalType, u8)> {
    let (side, score) = scores.winner()?;
    let tier = SIGNAL_TIERS.classify(f64::from(score))?;
    Some((SignalType::fresh(side, tier), tier.strength()))
}

/// Closest ladder level to `center`; the lower level wins an exact tie
pub fn nearest_fib_level(center: f64) -> f64 {
    if !center.is_finite() {
        return DEFAULT_FIB_LEVEL;
    }

    let mut nearest = DEFAULT_FIB_LEVEL;
    let mut best = f64::INFINITY;
    for level in FIB_LADDER {
        let distance = (center - level).abs();
        if distance < best {
            best = distance;
            nearest = level;
        }
    }
    nearest
}
