//! Multi-timeframe confluence scoring
//!
//! Scores the latest stored record of each timeframe and fuses the
//! contributions into one score and recommendation. Flags are read from the
//! persisted record fields, never recomputed from the raw jewel lines.
//!
//! A timeframe contributes at most 85 points; the recommendation thresholds
//! (70/50) are tuned against that ceiling.

use indexmap::IndexMap;
use jewel_core::{
    ConfluenceResult, Recommendation, SignalRecord, SlopeDirection, TimeframeConfluence, Timestamp,
};

/// Timeframes queried when the caller names none
pub const DEFAULT_TIMEFRAMES: [&str; 3] = ["15m", "2h", "4h"];

/// Lookback window applied when the caller gives none
pub const DEFAULT_LOOKBACK_MINUTES: i64 = 120;

/// Stored range strictly below this counts as compressed.
/// Deliberately `<`, unlike the engine's `<= 4` extreme compression.
pub const COMPRESSED_BELOW_RANGE: f64 = 4.0;

/// Stored center outside [20, 80] counts as an extreme zone
pub const EXTREME_ZONE_LOW: f64 = 20.0;
pub const EXTREME_ZONE_HIGH: f64 = 80.0;

const COMPRESSED_POINTS: u32 = 25;
const EXTREME_ZONE_POINTS: u32 = 20;
const STEEP_SLOPE_ABOVE: f64 = 1.0;
const STEEP_SLOPE_POINTS: u32 = 15;
const BUY_SIGNAL_POINTS: u32 = 15;
const LOW_BBWP_BELOW: f64 = 30.0;
const LOW_BBWP_POINTS: u32 = 10;

const STRONG_MIN_SCORE: u32 = 70;
const STRONG_MIN_TIMEFRAMES: usize = 2;
const MODERATE_MIN_SCORE: u32 = 50;

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn is_compressed(record: &SignalRecord) -> bool {
    finite(record.compression_total_range).is_some_and(|range| range < COMPRESSED_BELOW_RANGE)
}

fn is_extreme_zone(record: &SignalRecord) -> bool {
    finite(record.compression_center)
        .is_some_and(|center| center < EXTREME_ZONE_LOW || center > EXTREME_ZONE_HIGH)
}

fn slope_direction(record: &SignalRecord) -> SlopeDirection {
    match finite(record.slope_fast) {
        Some(slope) if slope > 0.0 => SlopeDirection::Bullish,
        Some(slope) if slope < 0.0 => SlopeDirection::Bearish,
        _ => SlopeDirection::Neutral,
    }
}

/// Contribution of one stored record to the fused score (0..=85)
pub fn timeframe_score(record: &SignalRecord) -> u32 {
    let mut score = 0;
    if is_compressed(record) {
        score += COMPRESSED_POINTS;
    }
    if is_extreme_zone(record) {
        score += EXTREME_ZONE_POINTS;
    }
    if finite(record.slope_fast).is_some_and(|slope| slope > STEEP_SLOPE_ABOVE) {
        score += STEEP_SLOPE_POINTS;
    }
    if record.signal_type.as_ref().is_some_and(|t| t.is_buy()) {
        score += BUY_SIGNAL_POINTS;
    }
    if finite(record.bbwp_value).is_some_and(|bbwp| bbwp < LOW_BBWP_BELOW) {
        score += LOW_BBWP_POINTS;
    }
    score
}

/// Whole minutes between the record timestamp and `now`, halves rounded up
/// so future-dated records round toward zero
fn age_minutes(record: &SignalRecord, now: Timestamp) -> i64 {
    let elapsed_ms = (now - record.timestamp).num_milliseconds();
    (elapsed_ms as f64 / 60_000.0 + 0.5).floor() as i64
}

/// Flags, age and score for the latest record of one timeframe
pub fn assess_timeframe(record: SignalRecord, now: Timestamp) -> TimeframeConfluence {
    let age_minutes = age_minutes(&record, now);
    TimeframeConfluence {
        compressed: is_compressed(&record),
        extreme_zone: is_extreme_zone(&record),
        slope_direction: slope_direction(&record),
        age_minutes,
        age: format!("{} min ago", age_minutes),
        score: timeframe_score(&record),
        signal: record,
    }
}

/// Rounded mean of the contributions; 0 when no timeframe is active
pub fn fused_score(contributions: &[u32]) -> u32 {
    if contributions.is_empty() {
        return 0;
    }
    let total: u32 = contributions.iter().sum();
    (f64::from(total) / contributions.len() as f64).round() as u32
}

/// Recommendation tier; the strong tier needs at least two active timeframes
pub fn recommend(score: u32, active_timeframes: usize) -> Recommendation {
    if score >= STRONG_MIN_SCORE && active_timeframes >= STRONG_MIN_TIMEFRAMES {
        Recommendation::StrongBuy
    } else if score >= MODERATE_MIN_SCORE {
        Recommendation::Moderate
    } else {
        Recommendation::Weak
    }
}

/// Fuse the active timeframes of a symbol into one result
pub fn fuse(
    symbol: impl Into<String>,
    timeframes: IndexMap<String, TimeframeConfluence>,
) -> ConfluenceResult {
    let contributions: Vec<u32> = timeframes.values().map(|tf| tf.score).collect();
    let confluence_score = fused_score(&contributions);
    let active_timeframes = timeframes.len();

    ConfluenceResult {
        symbol: symbol.into(),
        timeframes,
        confluence_score,
        active_timeframes,
        recommendation: recommend(confluence_score, active_timeframes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use jewel_core::SignalType;

    fn now() -> Timestamp {
        Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap()
    }

    fn record(timeframe: &str, minutes_ago: i64) -> SignalRecord {
        SignalRecord::new(
            "BTCUSDT",
            timeframe,
            15.0,
            now() - Duration::minutes(minutes_ago),
        )
    }

    /// Record hitting every scoring condition
    fn full_record(timeframe: &str) -> SignalRecord {
        let mut r = record(timeframe, 5);
        r.compression_total_range = Some(2.0);
        r.compression_center = Some(15.0);
        r.slope_fast = Some(1.5);
        r.signal_type = Some(SignalType::GodBuy);
        r.bbwp_value = Some(12.0);
        r
    }

    #[test]
    fn test_full_record_scores_85() {
        let assessed = assess_timeframe(full_record("15m"), now());
        assert!(assessed.compressed);
        assert!(assessed.extreme_zone);
        assert_eq!(assessed.slope_direction, SlopeDirection::Bullish);
        assert_eq!(assessed.score, 85);
        assert_eq!(assessed.age_minutes, 5);
        assert_eq!(assessed.age, "5 min ago");
    }

    #[test]
    fn test_age_rounds_halves_up() {
        let mut r = record("15m", 0);
        r.timestamp = now() - Duration::seconds(150);
        assert_eq!(assess_timeframe(r.clone(), now()).age_minutes, 3);

        r.timestamp = now() + Duration::seconds(150);
        let skewed = assess_timeframe(r, now());
        assert_eq!(skewed.age_minutes, -2);
        assert_eq!(skewed.age, "-2 min ago");
    }

    #[test]
    fn test_empty_record_scores_zero() {
        let assessed = assess_timeframe(record("2h", 0), now());
        assert!(!assessed.compressed);
        assert!(!assessed.extreme_zone);
        assert_eq!(assessed.slope_direction, SlopeDirection::Neutral);
        assert_eq!(assessed.score, 0);
    }

    #[test]
    fn test_compressed_is_strict() {
        let mut r = record("15m", 1);
        r.compression_total_range = Some(4.0);
        assert!(!assess_timeframe(r.clone(), now()).compressed);

        r.compression_total_range = Some(3.99);
        assert!(assess_timeframe(r, now()).compressed);
    }

    #[test]
    fn test_extreme_zone_bounds() {
        let mut r = record("15m", 1);
        for (center, expected) in [(19.9, true), (20.0, false), (80.0, false), (80.1, true)] {
            r.compression_center = Some(center);
            assert_eq!(assess_timeframe(r.clone(), now()).extreme_zone, expected);
        }
    }

    #[test]
    fn test_slope_direction_and_steep_slope() {
        let mut r = record("4h", 1);
        r.slope_fast = Some(-0.3);
        assert_eq!(
            assess_timeframe(r.clone(), now()).slope_direction,
            SlopeDirection::Bearish
        );

        // Bullish but not steep: no points
        r.slope_fast = Some(1.0);
        let assessed = assess_timeframe(r.clone(), now());
        assert_eq!(assessed.slope_direction, SlopeDirection::Bullish);
        assert_eq!(assessed.score, 0);

        r.slope_fast = Some(0.0);
        assert_eq!(
            assess_timeframe(r, now()).slope_direction,
            SlopeDirection::Neutral
        );
    }

    #[test]
    fn test_buy_substring_scores_for_external_labels() {
        let mut r = record("15m", 1);
        r.signal_type = Some(SignalType::from("REBUY"));
        assert_eq!(timeframe_score(&r), 15);

        r.signal_type = Some(SignalType::UltraSell);
        assert_eq!(timeframe_score(&r), 0);
    }

    #[test]
    fn test_fused_score_rounds_mean() {
        assert_eq!(fused_score(&[]), 0);
        assert_eq!(fused_score(&[60, 45]), 53);
        assert_eq!(fused_score(&[85, 85, 85]), 85);
        assert_eq!(fused_score(&[10, 20, 25]), 18);
    }

    #[test]
    fn test_recommendation_tiers() {
        assert_eq!(recommend(70, 2), Recommendation::StrongBuy);
        assert_eq!(recommend(85, 3), Recommendation::StrongBuy);
        assert_eq!(recommend(85, 1), Recommendation::Moderate);
        assert_eq!(recommend(69, 3), Recommendation::Moderate);
        assert_eq!(recommend(50, 1), Recommendation::Moderate);
        assert_eq!(recommend(49, 3), Recommendation::Weak);
        assert_eq!(recommend(0, 0), Recommendation::Weak);
    }

    #[test]
    fn test_single_timeframe_never_strong() {
        for score in 0..=100 {
            assert_ne!(recommend(score, 1), Recommendation::StrongBuy);
            assert_ne!(recommend(score, 0), Recommendation::StrongBuy);
        }
    }

    #[test]
    fn test_fuse_two_active_timeframes() {
        // 15m: compressed + extreme zone + buy = 60
        let mut fifteen = record("15m", 3);
        fifteen.compression_total_range = Some(3.0);
        fifteen.compression_center = Some(18.0);
        fifteen.signal_type = Some(SignalType::Buy);

        // 2h: extreme zone + steep slope + low bbwp = 45
        let mut two_hour = record("2h", 40);
        two_hour.compression_center = Some(85.0);
        two_hour.slope_fast = Some(2.0);
        two_hour.bbwp_value = Some(25.0);

        let mut timeframes = IndexMap::new();
        timeframes.insert("15m".to_string(), assess_timeframe(fifteen, now()));
        timeframes.insert("2h".to_string(), assess_timeframe(two_hour, now()));

        let result = fuse("BTCUSDT", timeframes);
        assert_eq!(result.timeframes["15m"].score, 60);
        assert_eq!(result.timeframes["2h"].score, 45);
        assert_eq!(result.active_timeframes, 2);
        assert_eq!(result.confluence_score, 53);
        assert_eq!(result.recommendation, Recommendation::Moderate);
    }

    #[test]
    fn test_fuse_nothing_active() {
        let result = fuse("ETHUSDT", IndexMap::new());
        assert_eq!(result.confluence_score, 0);
        assert_eq!(result.active_timeframes, 0);
        assert_eq!(result.recommendation, Recommendation::Weak);
    }

    #[test]
    fn test_fused_score_stays_in_range() {
        let mut timeframes = IndexMap::new();
        for tf in DEFAULT_TIMEFRAMES {
            timeframes.insert(tf.to_string(), assess_timeframe(full_record(tf), now()));
        }
        let result = fuse("BTCUSDT", timeframes);
        assert!(result.confluence_score <= 100);
        assert_eq!(result.confluence_score, 85);
        assert_eq!(result.recommendation, Recommendation::StrongBuy);
    }
}
