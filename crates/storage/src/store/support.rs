#![forbid(unsafe_code)]

use ct_core::Quarter;
use time::OffsetDateTime;

pub(crate) fn now_ms() -> i64 {
    let nanos = OffsetDateTime::now_utc().unix_timestamp_nanos();
    let ms = nanos / 1_000_000i128;
    if ms <= 0 {
        0
    } else if ms >= i64::MAX as i128 {
        i64::MAX
    } else {
        ms as i64
    }
}

/// The quarter the audit cadence considers "live" right now.
pub(crate) fn current_quarter() -> Quarter {
    Quarter::from_month(u8::from(OffsetDateTime::now_utc().month()))
}

pub(crate) fn next_id(seq: &mut i64, prefix: &str) -> String {
    *seq += 1;
    format!("{prefix}-{:06}", *seq)
}

/// Semicolon-joined list cells: joined with "; " on export, split on ';'
/// with trimming on import. Empty entries are dropped.
pub(crate) fn join_list<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn split_list(value: &str) -> Vec<String> {
    value
        .split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

/// First-seen-order dedupe; repeated aggregation over the same inputs must
/// not flap.
pub(crate) fn dedupe_preserving_order<T: Clone + PartialEq>(values: &mut Vec<T>) {
    let mut seen: Vec<T> = Vec::with_capacity(values.len());
    values.retain(|value| {
        if seen.contains(value) {
            false
        } else {
            seen.push(value.clone());
            true
        }
    });
}
