use crate::config::{ClassifierConfig, WindowMode};
use crate::normalize::TransactionRecord;

use super::detectors::{interval_seconds, rolling_counts, z_scores};
use super::types::PatternKind;

/// Burst window for the sextortion rule. Fixed at one minute; the rule is
/// defined in terms of it rather than the detector window.
const BURST_WINDOW_SECS: u64 = 60;

/// Ransomware-like: a value outlier (z above threshold) arriving in a
/// tight cluster after the previous record. The first record has no prior
/// interval and is never flagged; a degenerate value series flags nothing.
pub fn classify_ransomware(
    records: &[TransactionRecord],
    config: &ClassifierConfig,
) -> Vec<bool> {
    let zs = match z_scores(records) {
        Some(zs) => zs,
        None => return vec![false; records.len()],
    };
    let intervals = interval_seconds(records);

    zs.iter()
        .zip(&intervals)
        .enumerate()
        .map(|(i, (z, interval))| {
            i > 0 && *z > config.ransomware_z && interval / 60.0 < config.ransomware_gap_mins
        })
        .collect()
}

/// Sextortion-like: generally sparse traffic (mean real gap at or above the
/// threshold) punctuated by a burst (trailing 1-minute count at or above
/// the burst count). The mean excludes the first record's sentinel.
pub fn classify_sextortion(
    records: &[TransactionRecord],
    config: &ClassifierConfig,
    mode: WindowMode,
) -> Vec<bool> {
    if records.len() < 2 {
        return vec![false; records.len()];
    }

    let intervals = interval_seconds(records);
    let real_gaps = &intervals[1..];
    let mean_gap_mins = real_gaps.iter().sum::<f64>() / real_gaps.len() as f64 / 60.0;

    if mean_gap_mins < config.sextortion_mean_gap_mins {
        return vec![false; records.len()];
    }

    rolling_counts(records, BURST_WINDOW_SECS, mode)
        .into_iter()
        .map(|count| count >= config.sextortion_burst_count)
        .collect()
}

/// Hit counts for the four named patterns, used only for the descriptive
/// "most similar pattern" label.
#[derive(Debug, Clone, Copy, Default)]
pub struct PatternHits {
    pub ransomware: usize,
    pub sextortion: usize,
    pub tumbler: usize,
    pub extortion: usize,
}

impl PatternHits {
    fn count(&self, kind: PatternKind) -> usize {
        match kind {
            PatternKind::Ransomware => self.ransomware,
            PatternKind::Sextortion => self.sextortion,
            PatternKind::Tumbler => self.tumbler,
            PatternKind::Extortion => self.extortion,
        }
    }

    /// The pattern with the highest non-zero hit count. Ties resolve by
    /// `PatternKind::PRIORITY`; all-zero yields no label.
    pub fn most_similar(&self) -> Option<PatternKind> {
        let mut best: Option<(PatternKind, usize)> = None;
        for kind in PatternKind::PRIORITY {
            let count = self.count(kind);
            if count == 0 {
                continue;
            }
            // Strictly greater, so earlier priority wins ties.
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((kind, count));
            }
        }
        best.map(|(kind, _)| kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::detectors::tests::{record, spaced};

    #[test]
    fn test_ransomware_outlier_in_tight_cluster() {
        // Steady dust flow, then a large payment 2 minutes after the
        // previous record.
        let mut records = spaced(9, 60, 0.01);
        records.push(record("2024-03-01T10:10:00Z", 40.0));
        let flags = classify_ransomware(&records, &ClassifierConfig::default());
        assert!(flags[9]);
        assert!(flags[..9].iter().all(|f| !f));
    }

    #[test]
    fn test_ransomware_first_record_never_flagged() {
        // The outlier sits first; no prior interval means no flag.
        let mut records = vec![record("2024-03-01T09:00:00Z", 40.0)];
        records.extend(spaced(9, 60, 0.01));
        let flags = classify_ransomware(&records, &ClassifierConfig::default());
        assert!(!flags[0]);
    }

    #[test]
    fn test_ransomware_slow_outlier_not_flagged() {
        // Outlier arrives an hour after the previous record.
        let mut records = spaced(9, 60, 0.01);
        records.push(record("2024-03-01T11:08:00Z", 40.0));
        let flags = classify_ransomware(&records, &ClassifierConfig::default());
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn test_sextortion_sparse_then_burst() {
        // Records 2 hours apart, then 5 within 40 seconds.
        let mut records = spaced(4, 7200, 0.01);
        for i in 0..5 {
            let ts = format!("2024-03-01T18:00:{:02}Z", i * 10);
            records.push(record(&ts, 0.02));
        }
        let flags = classify_sextortion(
            &records,
            &ClassifierConfig::default(),
            WindowMode::Rolling,
        );
        // Only the record completing the 5-strong burst qualifies.
        assert!(flags[8]);
        assert!(flags[..8].iter().all(|f| !f));
    }

    #[test]
    fn test_sextortion_dense_traffic_never_flagged() {
        // Burst exists but overall traffic is brisk: mean gap condition
        // fails for the whole sequence.
        let records = spaced(20, 30, 0.01);
        let flags = classify_sextortion(
            &records,
            &ClassifierConfig::default(),
            WindowMode::Rolling,
        );
        assert!(flags.iter().all(|f| !f));
    }

    #[test]
    fn test_most_similar_picks_highest() {
        let hits = PatternHits {
            ransomware: 1,
            sextortion: 0,
            tumbler: 4,
            extortion: 2,
        };
        assert_eq!(hits.most_similar(), Some(PatternKind::Tumbler));
    }

    #[test]
    fn test_most_similar_tie_breaks_by_priority() {
        let hits = PatternHits {
            ransomware: 0,
            sextortion: 3,
            tumbler: 3,
            extortion: 3,
        };
        assert_eq!(hits.most_similar(), Some(PatternKind::Sextortion));
    }

    #[test]
    fn test_most_similar_all_zero_is_none() {
        assert_eq!(PatternHits::default().most_similar(), None);
    }
}
