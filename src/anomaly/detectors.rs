use std::collections::HashMap;

use crate::config::{DetectionConfig, WindowMode};
use crate::normalize::TransactionRecord;

// ============================================================
// Shared statistics over the canonical sequence
// ============================================================

/// Trailing-window burst count for each record, inclusive of itself.
///
/// `Rolling` counts records in the left-open window `(t - window, t]`
/// ending at each record's own timestamp. `Bucketed` approximates this
/// with fixed calendar buckets of the window size; every record in a
/// bucket shares that bucket's count. The two disagree near bucket
/// boundaries, so a run uses exactly one mode.
pub fn rolling_counts(
    records: &[TransactionRecord],
    window_secs: u64,
    mode: WindowMode,
) -> Vec<u32> {
    match mode {
        WindowMode::Rolling => trailing_counts(records, window_secs),
        WindowMode::Bucketed => bucket_counts(records, window_secs),
    }
}

fn trailing_counts(records: &[TransactionRecord], window_secs: u64) -> Vec<u32> {
    let window = chrono::Duration::seconds(window_secs as i64);
    let mut counts = Vec::with_capacity(records.len());
    let mut start = 0usize;

    for (i, record) in records.iter().enumerate() {
        // Input is sorted ascending, so the window start only moves forward.
        while records[start].confirmed <= record.confirmed - window {
            start += 1;
        }
        counts.push((i - start + 1) as u32);
    }

    counts
}

fn bucket_counts(records: &[TransactionRecord], window_secs: u64) -> Vec<u32> {
    let mut per_bucket: HashMap<i64, u32> = HashMap::new();
    let bucket_of = |record: &TransactionRecord| record.confirmed.timestamp().div_euclid(window_secs as i64);

    for record in records {
        *per_bucket.entry(bucket_of(record)).or_insert(0) += 1;
    }

    records
        .iter()
        .map(|record| per_bucket[&bucket_of(record)])
        .collect()
}

/// Seconds between each record and its predecessor. The first record gets
/// 0.0 as a "no prior interval" sentinel, not a real zero-length gap.
pub fn interval_seconds(records: &[TransactionRecord]) -> Vec<f64> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            if i == 0 {
                0.0
            } else {
                let gap = record.confirmed - records[i - 1].confirmed;
                gap.num_milliseconds() as f64 / 1000.0
            }
        })
        .collect()
}

/// Population z-score of each record's value. Returns None when the series
/// is degenerate (fewer than two records, or zero standard deviation) —
/// a constant series must never be flagged, and nothing here divides by
/// zero.
pub fn z_scores(records: &[TransactionRecord]) -> Option<Vec<f64>> {
    if records.len() < 2 {
        return None;
    }

    let n = records.len() as f64;
    let mean = records.iter().map(|r| r.value_btc).sum::<f64>() / n;
    let variance = records
        .iter()
        .map(|r| (r.value_btc - mean).powi(2))
        .sum::<f64>()
        / n;
    let std = variance.sqrt();

    if std == 0.0 || !std.is_finite() {
        return None;
    }

    Some(
        records
            .iter()
            .map(|r| (r.value_btc - mean) / std)
            .collect(),
    )
}

// ============================================================
// Detectors
// ============================================================

/// Flag records whose trailing-window burst count strictly exceeds the
/// configured threshold.
pub fn detect_high_frequency(
    records: &[TransactionRecord],
    config: &DetectionConfig,
) -> Vec<bool> {
    rolling_counts(records, config.freq_window_secs, config.freq_window_mode)
        .into_iter()
        .map(|count| count > config.freq_threshold)
        .collect()
}

/// Flag records whose value is a statistical outlier (|z| above the
/// threshold). A degenerate series flags nothing.
pub fn detect_high_amount(records: &[TransactionRecord], config: &DetectionConfig) -> Vec<bool> {
    match z_scores(records) {
        Some(zs) => zs
            .into_iter()
            .map(|z| z.abs() > config.amount_z_threshold)
            .collect(),
        None => vec![false; records.len()],
    }
}

/// Flag high-value transfers arriving atypically close in time to another.
///
/// A weak proxy for mixing-service behavior; any legitimately brisk
/// high-value wallet will trip it. Kept intentionally simple.
pub fn detect_tumbler(records: &[TransactionRecord], config: &DetectionConfig) -> Vec<bool> {
    let intervals = interval_seconds(records);
    records
        .iter()
        .zip(&intervals)
        .map(|(record, interval)| {
            record.value_btc > config.tumbler_min_value
                && interval.abs() > config.tumbler_min_interval_secs
        })
        .collect()
}

/// Flag records following a silence longer than the configured gap. The
/// first record's interval sentinel is 0, so it is never flagged.
pub fn detect_extortion(records: &[TransactionRecord], config: &DetectionConfig) -> Vec<bool> {
    interval_seconds(records)
        .into_iter()
        .map(|interval| interval > config.extortion_gap_secs)
        .collect()
}
