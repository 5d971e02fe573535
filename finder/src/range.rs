//! Binary-search narrowing of sorted entries whose keys are expensive to read.
//!
//! The same routine narrows sessions and, inside the chosen sessions, files.

use crate::lazy::LazyKeyedSequence;

/// Entries kept before the first entry at or after the lower bound.
///
/// The entry just before the first match may have started before the window
/// while still recording into it, so it is kept. The margin is skipped when
/// the search lands on either end of the sequence: nothing precedes index 0,
/// and a lower bound past every entry selects nothing in [`select_range`]
/// while [`select_spans`] keeps the last entry.
pub const BACKWARD_INCLUSION: usize = 1;

/// First index whose value is `>= target`.
pub fn bisect_left<K, V, E, F>(seq: &mut LazyKeyedSequence<K, V, F>, target: &V) -> Result<usize, E>
where
    V: Ord,
    F: FnMut(&K) -> Result<V, E>,
{
    let (mut lo, mut hi) = (0, seq.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if seq.get(mid)? < target {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    Ok(lo)
}

/// First index whose value is `> target`, i.e. the count of values `<= target`.
pub fn bisect_right<K, V, E, F>(seq: &mut LazyKeyedSequence<K, V, F>, target: &V) -> Result<usize, E>
where
    V: Ord,
    F: FnMut(&K) -> Result<V, E>,
{
    let (mut lo, mut hi) = (0, seq.len());
    while lo < hi {
        let mid = lo + (hi - lo) / 2;
        if target < seq.get(mid)? {
            hi = mid;
        } else {
            lo = mid + 1;
        }
    }
    Ok(lo)
}

/// Returns the contiguous run of `entries` whose extracted values fall in
/// `[lower, upper]`, widened by [`BACKWARD_INCLUSION`] on the lower side.
///
/// `entries` must be sorted so that extracted values are non-decreasing.
/// Without an extractor nothing can be compared and `entries` is returned
/// unchanged. Only the entries probed by the binary searches are extracted,
/// and none at all when both bounds are absent.
pub fn select_range<K, V, E, F>(
    entries: Vec<K>,
    extractor: Option<F>,
    lower: Option<&V>,
    upper: Option<&V>,
) -> Result<Vec<K>, E>
where
    V: Ord,
    F: FnMut(&K) -> Result<V, E>,
{
    select_with(entries, extractor, lower, upper, PastLast::Nothing)
}

/// Like [`select_range`], for entries that each start a span running until
/// the next entry, such as recording sessions keyed by their first file.
///
/// A lower bound past every start still falls inside the last span, so the
/// last entry is kept instead of selecting nothing.
pub fn select_spans<K, V, E, F>(
    entries: Vec<K>,
    extractor: Option<F>,
    lower: Option<&V>,
    upper: Option<&V>,
) -> Result<Vec<K>, E>
where
    V: Ord,
    F: FnMut(&K) -> Result<V, E>,
{
    select_with(entries, extractor, lower, upper, PastLast::KeepLast)
}

/// What a lower bound past every entry selects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PastLast {
    Nothing,
    KeepLast,
}

fn select_with<K, V, E, F>(
    entries: Vec<K>,
    extractor: Option<F>,
    lower: Option<&V>,
    upper: Option<&V>,
    past_last: PastLast,
) -> Result<Vec<K>, E>
where
    V: Ord,
    F: FnMut(&K) -> Result<V, E>,
{
    let Some(extractor) = extractor else {
        return Ok(entries);
    };
    if lower.is_none() && upper.is_none() {
        return Ok(entries);
    }

    let mut seq = LazyKeyedSequence::new(entries, extractor);
    let len = seq.len();

    let start = match lower {
        Some(lower) => {
            let i = bisect_left(&mut seq, lower)?;
            if i == len && past_last == PastLast::KeepLast {
                len.saturating_sub(1)
            } else if i != 0 && i != len {
                i.saturating_sub(BACKWARD_INCLUSION)
            } else {
                i
            }
        }
        None => 0,
    };
    let end = match upper {
        Some(upper) => bisect_right(&mut seq, upper)?.min(len),
        None => len,
    };

    let mut entries = seq.into_keys();
    if start >= end {
        return Ok(Vec::new());
    }
    entries.truncate(end);
    entries.drain(..start);
    Ok(entries)
}
