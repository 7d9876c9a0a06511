use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use tracing::debug;

use crate::fmt::modified_display;
use crate::models::{Action, ChangelogEntry, MovementPair, ProcessedEntry};

pub const DEFAULT_MOVEMENT_WINDOW_MINUTES: f64 = 10.0;

/// Stable sort by timestamp; same-second entries keep their input order.
fn sorted_by_time(entries: &[ChangelogEntry]) -> Vec<&ChangelogEntry> {
    let mut sorted: Vec<&ChangelogEntry> = entries.iter().collect();
    sorted.sort_by_key(|e| e.timestamp);
    sorted
}

fn within_window(a: &ChangelogEntry, b: &ChangelogEntry, window_minutes: f64) -> bool {
    a.timestamp.abs_diff(b.timestamp) as f64 / 60.0 <= window_minutes
}

fn is_movement(a: &ChangelogEntry, b: &ChangelogEntry) -> bool {
    a.action.is_opposite(&b.action) && a.number == b.number
}

// ---------------------------------------------------------------------------
// Pass 1: movement cancellation
// ---------------------------------------------------------------------------

/// Greedy forward scan per `(account, item)` group over a time-sorted slice.
/// Returns matched index pairs `(earlier, later)` ordered by the earlier index.
fn match_movements(sorted: &[&ChangelogEntry], window_minutes: f64) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    if window_minutes.is_nan() || window_minutes <= 0.0 {
        return pairs;
    }

    let mut groups: HashMap<(&str, &str), Vec<usize>> = HashMap::new();
    for (idx, entry) in sorted.iter().enumerate() {
        groups
            .entry((entry.account_name.as_str(), entry.item_name.as_str()))
            .or_default()
            .push(idx);
    }

    let mut matched = vec![false; sorted.len()];
    for group in groups.values() {
        if group.len() < 2 {
            continue;
        }
        for (pos, &i) in group.iter().enumerate() {
            if matched[i] {
                continue;
            }
            let current = sorted[i];
            for &j in &group[pos + 1..] {
                if matched[j] {
                    continue;
                }
                let other = sorted[j];
                // group is time-ordered, nothing later can be closer
                if !within_window(current, other, window_minutes) {
                    break;
                }
                if is_movement(current, other) {
                    matched[i] = true;
                    matched[j] = true;
                    pairs.push((i, j));
                    break;
                }
            }
        }
    }

    pairs.sort_unstable();
    pairs
}

/// Every `added`/`removed` pair judged to be a transfer rather than a real
/// gain or loss, earliest pair first.
pub fn find_movements(entries: &[ChangelogEntry], window_minutes: f64) -> Vec<MovementPair> {
    let sorted = sorted_by_time(entries);
    match_movements(&sorted, window_minutes)
        .into_iter()
        .map(|(i, j)| MovementPair {
            first: sorted[i].clone(),
            second: sorted[j].clone(),
        })
        .collect()
}

/// Drop cancelled movement pairs. The survivors come back in stable
/// timestamp order.
pub fn cancel_movements(entries: &[ChangelogEntry], window_minutes: f64) -> Vec<ChangelogEntry> {
    let sorted = sorted_by_time(entries);
    let mut cancelled = vec![false; sorted.len()];
    for (i, j) in match_movements(&sorted, window_minutes) {
        cancelled[i] = true;
        cancelled[j] = true;
    }
    sorted
        .into_iter()
        .zip(cancelled)
        .filter(|(_, gone)| !gone)
        .map(|(entry, _)| entry.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Pass 2: running quantities
// ---------------------------------------------------------------------------

/// Running quantity per `(stash, item)`, replayed one entry at a time.
#[derive(Default)]
struct QuantityTracker<'a> {
    running: HashMap<(&'a str, &'a str), i64>,
}

impl<'a> QuantityTracker<'a> {
    /// Apply one entry and return its display value.
    fn apply(&mut self, entry: &'a ChangelogEntry) -> String {
        let current = self
            .running
            .entry((entry.stash_name.as_str(), entry.item_name.as_str()))
            .or_insert(0);
        match entry.action {
            Action::Added => {
                *current = current.saturating_add(entry.number);
                entry.number.to_string()
            }
            Action::Removed => {
                *current = current.saturating_sub(entry.number);
                entry.number.to_string()
            }
            Action::Modified => {
                let previous = *current;
                *current = entry.number;
                modified_display(entry.number, entry.number.saturating_sub(previous))
            }
        }
    }
}

/// Annotate each entry with its display quantity. Walks the entries in
/// timestamp order, so the result is already globally sorted.
pub fn annotate_quantities(entries: &[ChangelogEntry]) -> Vec<ProcessedEntry> {
    let mut tracker = QuantityTracker::default();
    sorted_by_time(entries)
        .into_iter()
        .map(|entry| ProcessedEntry {
            display_number: tracker.apply(entry),
            original_number: entry.number,
            entry: entry.clone(),
        })
        .collect()
}

/// Final reconstructed quantity for every `(stash, item)` seen.
pub fn running_quantities(entries: &[ChangelogEntry]) -> BTreeMap<(String, String), i64> {
    let mut tracker = QuantityTracker::default();
    for entry in sorted_by_time(entries) {
        tracker.apply(entry);
    }
    tracker
        .running
        .into_iter()
        .map(|((stash, item), qty)| ((stash.to_string(), item.to_string()), qty))
        .collect()
}

/// Cancel movements, then annotate the remainder with running quantities.
pub fn reconcile(entries: &[ChangelogEntry], window_minutes: f64) -> Vec<ProcessedEntry> {
    let start = Instant::now();
    let unmatched = cancel_movements(entries, window_minutes);
    let processed = annotate_quantities(&unmatched);
    debug!(
        total = entries.len(),
        cancelled = entries.len() - unmatched.len(),
        elapsed_ms = start.elapsed().as_secs_f64() * 1000.0,
        "filtered movements"
    );
    processed
}
