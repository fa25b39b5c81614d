//! # Yarn Reference Resolver
//!
//! Looks up hank weight and unit price for a count label, and orders
//! count labels for dropdowns.
//!
//! ## Resolution Up Front
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  costing-db                     costing-core                            │
//! │  ──────────                     ────────────                            │
//! │  YarnRepository::list() ──────► YarnCatalog (in-memory snapshot)        │
//! │        (async, once)                 │                                  │
//! │                                      ▼                                  │
//! │                              catalog.lookup("40s")   (sync, pure)       │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │                              weights → costs → total                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Unknown Labels
//! A label missing from the master list resolves to hank weight `0` and
//! price `0`, so it contributes nothing downstream. That is deliberate
//! policy, but the lookup says so (`resolved == false`) and the pipeline
//! surfaces those labels instead of silently costing them at zero.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::YarnCount;

// =============================================================================
// Lookup
// =============================================================================

/// Result of looking up one count label.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YarnLookup {
    pub hank_weight: f64,
    pub unit_price: f64,
    /// `false` when the label is not in the master list.
    pub resolved: bool,
}

impl YarnLookup {
    /// The zero-valued fallback for unknown labels.
    pub const fn unresolved() -> Self {
        YarnLookup {
            hank_weight: 0.0,
            unit_price: 0.0,
            resolved: false,
        }
    }
}

/// In-memory snapshot of the yarn master list.
///
/// Matching is by exact label.
#[derive(Debug, Clone, Default)]
pub struct YarnCatalog {
    by_label: HashMap<String, YarnCount>,
}

impl YarnCatalog {
    pub fn new() -> Self {
        YarnCatalog::default()
    }

    /// Adds or replaces a yarn count.
    pub fn insert(&mut self, yarn: YarnCount) {
        self.by_label.insert(yarn.label.clone(), yarn);
    }

    /// Looks up a label, falling back to zeros.
    ///
    /// ## Example
    /// ```rust
    /// use costing_core::types::YarnCount;
    /// use costing_core::yarn::YarnCatalog;
    ///
    /// let catalog = YarnCatalog::from_iter([YarnCount::new("40s", 0.4, 250.0)]);
    ///
    /// let hit = catalog.lookup("40s");
    /// assert!(hit.resolved);
    /// assert_eq!(hit.hank_weight, 0.4);
    ///
    /// let miss = catalog.lookup("80s");
    /// assert!(!miss.resolved);
    /// assert_eq!(miss.hank_weight, 0.0);
    /// ```
    pub fn lookup(&self, label: &str) -> YarnLookup {
        match self.by_label.get(label) {
            Some(yarn) => YarnLookup {
                hank_weight: yarn.hank_weight,
                unit_price: yarn.unit_price,
                resolved: true,
            },
            None => YarnLookup::unresolved(),
        }
    }

    pub fn get(&self, label: &str) -> Option<&YarnCount> {
        self.by_label.get(label)
    }

    pub fn len(&self) -> usize {
        self.by_label.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_label.is_empty()
    }

    /// All labels in dropdown order (see [`sort_count_labels`]).
    pub fn sorted_labels(&self) -> Vec<String> {
        sort_count_labels(self.by_label.keys())
    }
}

impl FromIterator<YarnCount> for YarnCatalog {
    fn from_iter<I: IntoIterator<Item = YarnCount>>(iter: I) -> Self {
        let mut catalog = YarnCatalog::new();
        for yarn in iter {
            catalog.insert(yarn);
        }
        catalog
    }
}

// =============================================================================
// Count Label Ordering
// =============================================================================

/// Sort key of a count label.
///
/// Plain counts sort before plied counts; within each group by the
/// derived numeric weight, then by label text so ties are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CountGroup {
    Plain,
    Plied,
}

fn count_weight(label: &str) -> (CountGroup, u64) {
    match label.split_once('/') {
        Some((prefix, base)) => (
            CountGroup::Plied,
            leading_integer(prefix).saturating_mul(leading_integer(base)),
        ),
        None => (CountGroup::Plain, leading_integer(label)),
    }
}

/// Integer value of the numeral prefix ("40s" → 40, " 2" → 2, "s" → 0).
fn leading_integer(text: &str) -> u64 {
    text.trim()
        .chars()
        .take_while(|c| c.is_ascii_digit())
        .fold(0_u64, |acc, c| {
            acc.saturating_mul(10)
                .saturating_add(u64::from(c as u8 - b'0'))
        })
}

/// Orders count labels for presentation.
///
/// 1. Plain labels (no `/`) ascending by their numeral (`"40s"` → 40).
/// 2. Then plied labels (`prefix/base`) ascending by `prefix × base`.
///
/// ## Example
/// ```rust
/// use costing_core::yarn::sort_count_labels;
///
/// let sorted = sort_count_labels(["40s", "20s", "2/40s", "1/60s"]);
/// assert_eq!(sorted, vec!["20s", "40s", "1/60s", "2/40s"]);
/// ```
pub fn sort_count_labels<I, S>(labels: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut keyed: Vec<((CountGroup, u64), String)> = labels
        .into_iter()
        .map(|label| {
            let label = label.as_ref().to_string();
            (count_weight(&label), label)
        })
        .collect();

    keyed.sort_by(|(key_a, label_a), (key_b, label_b)| match key_a.cmp(key_b) {
        Ordering::Equal => label_a.cmp(label_b),
        other => other,
    });

    keyed.into_iter().map(|(_, label)| label).collect()
}

// =============================================================================
// Unit Tests
// =============================================================================
