use crate::engines::generation::gene::Gene;
use rand::Rng;

/// Probability that a single ranked gene is picked during a selection scan
pub const SCAN_PICK_PROBABILITY: f64 = 0.4;

/// Consecutive empty scans tolerated before falling back to a deterministic pick
pub const MAX_EMPTY_SCANS: usize = 32;

/// Rank-biased selection over a fitness-ranked slice.
///
/// Walks `ranked` from the fittest gene, flipping a coin per gene, and
/// returns the index of the first gene whose flip succeeds. Fitter genes are
/// seen first, so they are picked more often without a hard rank cutoff.
/// After `max_scans` empty scans the gene at `fallback_cursor` is returned
/// and the cursor advances round-robin, so selection always terminates.
pub fn weighted_scan_selection<R: Rng + ?Sized>(
    ranked: &[Gene],
    probability: f64,
    max_scans: usize,
    fallback_cursor: &mut usize,
    rng: &mut R,
) -> Option<usize> {
    if ranked.is_empty() {
        return None;
    }

    for _ in 0..max_scans {
        for idx in 0..ranked.len() {
            if rng.gen::<f64>() < probability {
                return Some(idx);
            }
        }
    }

    let idx = *fallback_cursor % ranked.len();
    *fallback_cursor = fallback_cursor.wrapping_add(1);
    log::debug!("Selection scans exhausted, taking rank {}", idx);
    Some(idx)
}

/// Uniform pick from a slice
pub fn random_choice<'a, T, R: Rng + ?Sized>(items: &'a [T], rng: &mut R) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    Some(&items[rng.gen_range(0..items.len())])
}

/// Number of slots filled by elites plus weighted selection: ceil(0.4 * count)
pub fn selection_quota(count: usize) -> usize {
    (count * 2 + 4) / 5
}
