//! Network quality classification.
//!
//! The media-quality collaborator reports a raw 0-6 tier each sampling
//! period. Display only distinguishes five buckets, so tiers 1/2 and 4/5
//! collapse onto shared entries. The mapping is deliberately non-monotonic
//! and must stay exactly as the display table defines it.

use serde::Serialize;

/// Raw quality tier as reported by the media engine.
pub type QualityTier = i32;

/// Displayable quality bucket with style hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QualityBucket {
    /// Short status label.
    pub label: &'static str,
    /// Foreground color hint.
    pub color: &'static str,
    /// Background color hint.
    pub bg_color: &'static str,
}

/// Tier 0 or anything out of range.
pub const UNKNOWN: QualityBucket =
    QualityBucket { label: "unknown", color: "#000", bg_color: "#FFF" };

/// Tiers 1 and 2.
pub const GOOD: QualityBucket =
    QualityBucket { label: "good", color: "#7ED321", bg_color: "#B8E986" };

/// Tier 3.
pub const POOR: QualityBucket =
    QualityBucket { label: "poor", color: "#F5A623", bg_color: "#F8E71C" };

/// Tiers 4 and 5.
pub const BAD: QualityBucket = QualityBucket { label: "bad", color: "#FF4D89", bg_color: "#FF9EBF" };

/// Tier 6: link is down.
pub const DOWN: QualityBucket =
    QualityBucket { label: "down", color: "#4A90E2", bg_color: "#86D9E9" };

/// Map a raw tier onto its display bucket.
///
/// Total over all of `i32`: negative and unrecognized tiers classify as
/// [`UNKNOWN`].
pub fn classify(tier: QualityTier) -> QualityBucket {
    match tier {
        1 | 2 => GOOD,
        3 => POOR,
        4 | 5 => BAD,
        6 => DOWN,
        _ => UNKNOWN,
    }
}
