//! Threshold tables
//!
//! Every table is an ordered list of `(bound, value)` pairs evaluated
//! first-match-in-order, with a fallback for values no band claims.
//! Order matters: the fib zone table checks `> 80` before `> 60`, which is
//! what makes exactly 60 "Mid" and exactly 80 "High".

use jewel_core::{BbwpClass, FibZone, SignalTier};

/// One side of a band
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// `value < x`
    Below(f64),
    /// `value <= x`
    AtMost(f64),
    /// `value > x`
    Above(f64),
    /// `value >= x`
    AtLeast(f64),
}

impl Bound {
    /// NaN never matches any bound
    pub fn contains(&self, value: f64) -> bool {
        match *self {
            Bound::Below(x) => value < x,
            Bound::AtMost(x) => value <= x,
            Bound::Above(x) => value > x,
            Bound::AtLeast(x) => value >= x,
        }
    }
}

/// Ordered band table
#[derive(Debug)]
pub struct BandTable<T: 'static> {
    bands: &'static [(Bound, T)],
    otherwise: T,
}

impl<T: Copy> BandTable<T> {
    pub const fn new(bands: &'static [(Bound, T)], otherwise: T) -> Self {
        BandTable { bands, otherwise }
    }

    /// Value of the first band containing `value`, else the fallback
    pub fn classify(&self, value: f64) -> T {
        self.bands
            .iter()
            .find(|(bound, _)| bound.contains(value))
            .map(|(_, v)| *v)
            .unwrap_or(self.otherwise)
    }
}

/// Points added to the buy and sell scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SidePoints {
    pub buy: u8,
    pub sell: u8,
}

impl SidePoints {
    pub const NONE: SidePoints = SidePoints { buy: 0, sell: 0 };

    pub const fn buy(points: u8) -> Self {
        SidePoints { buy: points, sell: 0 }
    }

    pub const fn sell(points: u8) -> Self {
        SidePoints { buy: 0, sell: points }
    }

    pub const fn both(points: u8) -> Self {
        SidePoints {
            buy: points,
            sell: points,
        }
    }
}

/// Fibonacci retracement ladder the compression center snaps to
pub const FIB_LADDER: [f64; 7] = [0.0, 23.6, 38.2, 50.0, 61.8, 76.4, 100.0];

/// Level reported when the center cannot be computed
pub const DEFAULT_FIB_LEVEL: f64 = 50.0;

/// `range <= 4` is extreme compression
pub const EXTREME_COMPRESSION_MAX_RANGE: f64 = 4.0;

/// Extreme compression with `center < 30` is a perfect setup
pub const PERFECT_SETUP_MAX_CENTER: f64 = 30.0;

/// Added to both sides when the fib line cuts through the jewel band
pub const FIB_CUTTING_POINTS: SidePoints = SidePoints::both(10);

pub static FIB_ZONES: BandTable<FibZone> = BandTable::new(
    &[
        (Bound::Below(25.0), FibZone::ExtremeLow),
        (Bound::Below(40.0), FibZone::Low),
        (Bound::Above(80.0), FibZone::ExtremeHigh),
        (Bound::Above(60.0), FibZone::High),
    ],
    FibZone::Mid,
);

pub static BBWP_CLASSES: BandTable<BbwpClass> = BandTable::new(
    &[
        (Bound::Below(20.0), BbwpClass::ExtremeLow),
        (Bound::Below(40.0), BbwpClass::Low),
        (Bound::Below(70.0), BbwpClass::Normal),
        (Bound::Below(85.0), BbwpClass::High),
    ],
    BbwpClass::ExtremeHigh,
);

/// Compression points, added to both sides
pub static COMPRESSION_POINTS: BandTable<SidePoints> = BandTable::new(
    &[
        (Bound::AtMost(2.0), SidePoints::both(40)),
        (Bound::AtMost(4.0), SidePoints::both(35)),
        (Bound::AtMost(6.0), SidePoints::both(30)),
        (Bound::AtMost(10.0), SidePoints::both(20)),
        (Bound::AtMost(15.0), SidePoints::both(10)),
    ],
    SidePoints::NONE,
);

/// Center-zone points; [40, 60] scores nothing
pub static CENTER_ZONE_POINTS: BandTable<SidePoints> = BandTable::new(
    &[
        (Bound::Below(25.0), SidePoints::buy(30)),
        (Bound::Below(40.0), SidePoints::buy(25)),
        (Bound::Above(75.0), SidePoints::sell(30)),
        (Bound::Above(60.0), SidePoints::sell(25)),
    ],
    SidePoints::NONE,
);

/// Fast-slope points; a flat or missing slope scores nothing
pub static SLOPE_POINTS: BandTable<SidePoints> = BandTable::new(
    &[
        (Bound::Above(2.0), SidePoints::buy(20)),
        (Bound::Above(1.0), SidePoints::buy(15)),
        (Bound::Above(0.5), SidePoints::buy(10)),
        (Bound::Above(0.0), SidePoints::buy(5)),
        (Bound::Below(-2.0), SidePoints::sell(20)),
        (Bound::Below(-1.0), SidePoints::sell(15)),
        (Bound::Below(-0.5), SidePoints::sell(10)),
        (Bound::Below(0.0), SidePoints::sell(5)),
    ],
    SidePoints::NONE,
);

/// Tier of the winning score; below 30 there is no label
pub static SIGNAL_TIERS: BandTable<Option<SignalTier>> = BandTable::new(
    &[
        (Bound::AtLeast(80.0), Some(SignalTier::God)),
        (Bound::AtLeast(65.0), Some(SignalTier::Ultra)),
        (Bound::AtLeast(50.0), Some(SignalTier::Strong)),
        (Bound::AtLeast(30.0), Some(SignalTier::Plain)),
    ],
    None,
);
