//! Per-second normalisation of monotonic counters.
//!
//! Elapsed time is measured in whole seconds, truncated from the millisecond
//! timestamps of the two samples. A pair of samples less than one second
//! apart (or out of order) cannot be rated and yields `None`.

use super::{Sample, SampleStore};

/// Whole seconds between two samples, if strictly positive
pub fn elapsed_secs<T>(previous: &Sample<T>, current: &Sample<T>) -> Option<i64> {
    let secs = (current.timestamp_ms - previous.timestamp_ms) / 1000;
    (secs > 0).then_some(secs)
}

/// Integer rate for counters measured in whole units.
///
/// Division truncates toward zero. A counter that went backwards produces a
/// negative rate.
pub fn per_second(previous: u64, current: u64, secs: i64) -> i64 {
    (current as i64 - previous as i64) / secs
}

/// Fractional rate, e.g. requests per second
pub fn per_second_f64(previous: f64, current: f64, secs: i64) -> f64 {
    (current - previous) / secs as f64
}

/// Apply `rate` to a pair of samples when the elapsed time allows it
pub fn normalize<T, R>(
    previous: &Sample<T>,
    current: &Sample<T>,
    rate: impl FnOnce(&T, &T, i64) -> R,
) -> Option<R> {
    elapsed_secs(previous, current).map(|secs| rate(&previous.value, &current.value, secs))
}

/// Rate `current` against the key's previous sample, then make `current`
/// the previous sample.
///
/// The first sighting of a key only seeds the store.
pub fn track<T, R>(
    store: &mut SampleStore<T>,
    key: impl Into<String>,
    current: Sample<T>,
    rate: impl FnOnce(&T, &T, i64) -> R,
) -> Option<R> {
    let key = key.into();
    let previous = store.replace(key.clone(), current)?;
    store
        .get(&key)
        .and_then(|current| normalize(&previous, current, rate))
}
