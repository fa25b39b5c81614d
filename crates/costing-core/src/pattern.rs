//! # Pattern Repeat Engine
//!
//! Works out how an ordered color sequence (one *repeat*) fills a fabric of
//! a given thread count, and how the yarn weight splits between colors.
//!
//! ## Walkthrough
//! ```text
//! Repeat:  [ Red 10 | Blue 5 | Green 3 ]      unit_sum = 18
//! Target:  100 threads
//!
//! full repeats     = 100 / 18 = 5             → 90 threads
//! partial repeat   : Red 10 → 100 ≥ 100, stop at index 0
//!                    remainder = 100 - 100 = 0, adjusted = 10
//!
//! ┌────────┬──────────────┬──────────┬────────┐
//! │ color  │ 5 × per rep  │ partial  │ final  │
//! ├────────┼──────────────┼──────────┼────────┤
//! │ Red    │     50       │   10     │   60   │
//! │ Blue   │     25       │    0     │   25   │
//! │ Green  │     15       │    0     │   15   │
//! └────────┴──────────────┴──────────┴────────┘   Σ = 100 = target
//! ```
//!
//! ## Exact Multiples
//! When the target is an exact multiple of the repeat there is no partial
//! repeat. The truncation segment is then the last segment of the final
//! full repeat (the last segment with threads), with a remainder of 0 and
//! its full original count. A target of 0 is treated the same way.
//!
//! ## Failure Modes
//! - Repeat with no threads: [`CoreError::EmptyRepeat`]
//! - Walk that never reaches the target: [`CoreError::TruncationNotFound`]
//!
//! Neither returns an empty result, and no division by zero can happen.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::PatternSegment;
use crate::weight::target_thread_count;

// =============================================================================
// Repeat Info
// =============================================================================

/// Where the pattern stops across the fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RepeatInfo {
    /// Number of complete repeats that fit.
    pub full_repeat_count: u32,

    /// Index of the segment at which the pattern is cut.
    pub truncation_index: usize,

    /// Color of that segment.
    pub truncation_color: String,

    /// Thread count of that segment in a full repeat.
    pub original_segment_count: u32,

    /// Threads of that segment that actually make it onto the fabric.
    pub adjusted_segment_count: u32,

    /// `original_segment_count - adjusted_segment_count`.
    pub remainder_difference: u32,

    /// `false` when the target is an exact multiple of the repeat.
    pub partial_repeat: bool,
}

/// Finds how many repeats fit into `target` threads and where the last one
/// is cut.
///
/// ## Example
/// ```rust
/// use costing_core::pattern::find_repeat_info;
/// use costing_core::types::PatternSegment;
///
/// let segments = [
///     PatternSegment::new("Red", 10),
///     PatternSegment::new("Blue", 5),
///     PatternSegment::new("Green", 3),
/// ];
///
/// let info = find_repeat_info(100, &segments).unwrap();
/// assert_eq!(info.full_repeat_count, 5);
/// assert_eq!(info.truncation_color, "Red");
/// assert_eq!(info.adjusted_segment_count, 10);
/// assert_eq!(info.remainder_difference, 0);
///
/// let info = find_repeat_info(93, &segments).unwrap();
/// assert_eq!(info.truncation_index, 0);
/// assert_eq!(info.adjusted_segment_count, 3);
/// assert_eq!(info.remainder_difference, 7);
/// ```
pub fn find_repeat_info(target: u32, segments: &[PatternSegment]) -> CoreResult<RepeatInfo> {
    let unit_sum: u64 = segments.iter().map(|s| u64::from(s.thread_count)).sum();
    if unit_sum == 0 {
        return Err(CoreError::EmptyRepeat {
            segments: segments.len(),
        });
    }

    let target_threads = u64::from(target);
    let full_repeat_count = target_threads / unit_sum;
    let mut cumulative = full_repeat_count * unit_sum;
    let full_repeat_count = full_repeat_count as u32;

    if cumulative == target_threads {
        // Exact multiple: stop at the end of the last complete repeat
        let (index, segment) = segments
            .iter()
            .enumerate()
            .rev()
            .find(|(_, s)| s.thread_count > 0)
            .ok_or_else(|| not_found(target, unit_sum))?;

        return Ok(RepeatInfo {
            full_repeat_count,
            truncation_index: index,
            truncation_color: segment.color.clone(),
            original_segment_count: segment.thread_count,
            adjusted_segment_count: segment.thread_count,
            remainder_difference: 0,
            partial_repeat: false,
        });
    }

    for (index, segment) in segments.iter().enumerate() {
        cumulative += u64::from(segment.thread_count);
        if cumulative >= target_threads {
            let remainder = (cumulative - target_threads) as u32;
            return Ok(RepeatInfo {
                full_repeat_count,
                truncation_index: index,
                truncation_color: segment.color.clone(),
                original_segment_count: segment.thread_count,
                adjusted_segment_count: segment.thread_count - remainder,
                remainder_difference: remainder,
                partial_repeat: true,
            });
        }
    }

    Err(not_found(target, unit_sum))
}

fn not_found(target: u32, unit_sum: u64) -> CoreError {
    CoreError::TruncationNotFound {
        target,
        unit_sum: unit_sum.min(u64::from(u32::MAX)) as u32,
    }
}

// =============================================================================
// Final Thread Summary
// =============================================================================

/// Total threads of one color across the whole fabric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ColorThreadCount {
    pub color: String,
    pub final_count: u32,
}

/// Per-color thread totals, in order of first appearance in the repeat.
///
/// Colors are matched by exact string. The totals sum to the target the
/// [`RepeatInfo`] was computed for.
pub fn final_thread_summary(segments: &[PatternSegment], info: &RepeatInfo) -> Vec<ColorThreadCount> {
    let mut totals: Vec<(String, u64)> = Vec::new();

    let mut add = |color: &str, threads: u64| {
        match totals.iter().position(|(c, _)| c.as_str() == color) {
            Some(index) => totals[index].1 += threads,
            None => totals.push((color.to_string(), threads)),
        }
    };

    let repeats = u64::from(info.full_repeat_count);
    for segment in segments {
        add(segment.color.as_str(), u64::from(segment.thread_count) * repeats);
    }

    if info.partial_repeat {
        for segment in segments.iter().take(info.truncation_index) {
            add(segment.color.as_str(), u64::from(segment.thread_count));
        }
        add(info.truncation_color.as_str(), u64::from(info.adjusted_segment_count));
    }

    totals
        .into_iter()
        .map(|(color, count)| ColorThreadCount {
            color,
            final_count: count.min(u64::from(u32::MAX)) as u32,
        })
        .collect()
}

// =============================================================================
// Weight Distribution
// =============================================================================

/// One color's share of the yarn weight of a direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ThreadWeight {
    pub color: String,
    pub thread_count: u32,
    /// Share of the lot weight, kg.
    pub weight: f64,
    /// `weight × total_order_width`, kg.
    pub total_weight: f64,
    /// Share of the threads, 0-100.
    pub percentage: f64,
}

/// Splits `total_weight` between colors in proportion to their threads.
///
/// A target of 0 yields zero shares for every color.
///
/// ## Example
/// ```rust
/// use costing_core::pattern::{thread_weights, ColorThreadCount};
///
/// let summary = [
///     ColorThreadCount { color: "Red".into(), final_count: 75 },
///     ColorThreadCount { color: "Blue".into(), final_count: 25 },
/// ];
/// let shares = thread_weights(&summary, 100, 4.0, 10.0);
/// assert_eq!(shares[0].weight, 3.0);
/// assert_eq!(shares[0].total_weight, 30.0);
/// assert_eq!(shares[1].percentage, 25.0);
/// ```
pub fn thread_weights(
    summary: &[ColorThreadCount],
    target: u32,
    total_weight: f64,
    total_order_width: f64,
) -> Vec<ThreadWeight> {
    summary
        .iter()
        .map(|entry| {
            let fraction = if target == 0 {
                0.0
            } else {
                f64::from(entry.final_count) / f64::from(target)
            };
            let weight = total_weight * fraction;
            ThreadWeight {
                color: entry.color.clone(),
                thread_count: entry.final_count,
                weight,
                total_weight: weight * total_order_width,
                percentage: fraction * 100.0,
            }
        })
        .collect()
}

// =============================================================================
// Report
// =============================================================================

fn default_order_width() -> f64 {
    1.0
}

/// Input of a pattern session for one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatternRequest {
    pub target_thread_count: u32,
    pub segments: Vec<PatternSegment>,

    /// Summed weight of all lots of the direction, kg.
    #[serde(default)]
    pub total_weight: f64,

    /// Order-level width multiplier, distinct from the fabric width.
    #[serde(default = "default_order_width")]
    pub total_order_width: f64,
}

impl PatternRequest {
    /// Builds a request whose target is `round(width × reed_or_pick)`.
    pub fn for_fabric(
        width: f64,
        reed_or_pick: f64,
        segments: Vec<PatternSegment>,
        total_weight: f64,
        total_order_width: f64,
    ) -> Self {
        PatternRequest {
            target_thread_count: target_thread_count(width, reed_or_pick),
            segments,
            total_weight,
            total_order_width,
        }
    }
}

/// Everything a design sheet needs for one direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PatternReport {
    pub target_thread_count: u32,
    pub segments: Vec<PatternSegment>,
    pub repeat_info: RepeatInfo,
    pub final_thread_summary: Vec<ColorThreadCount>,
    pub thread_weights: Vec<ThreadWeight>,
}

/// Runs the repeat walk, the summary and the weight split.
pub fn build_report(request: &PatternRequest) -> CoreResult<PatternReport> {
    let repeat_info = find_repeat_info(request.target_thread_count, &request.segments)?;
    let final_thread_summary = final_thread_summary(&request.segments, &repeat_info);
    let thread_weights = thread_weights(
        &final_thread_summary,
        request.target_thread_count,
        request.total_weight,
        request.total_order_width,
    );

    Ok(PatternReport {
        target_thread_count: request.target_thread_count,
        segments: request.segments.clone(),
        repeat_info,
        final_thread_summary,
        thread_weights,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
