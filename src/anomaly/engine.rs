use crate::config::{ClassifierConfig, DetectionConfig};
use crate::normalize::TransactionRecord;

use super::classify::{self, PatternHits};
use super::detectors;
use super::score::score_category;
use super::types::{AnnotatedRecord, AnomalyFlags, CategoryScores, PatternKind};

/// What the engine produces for one canonical sequence: annotated records,
/// the four bounded category scores, the capped total, and the auxiliary
/// pattern label.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    pub records: Vec<AnnotatedRecord>,
    pub scores: CategoryScores,
    pub total_score: u8,
    pub likely_pattern: Option<PatternKind>,
}

/// Runs the four scored detectors, the scorer, and the auxiliary
/// classifier over one canonical sequence. Stateless between calls: the
/// same sequence always yields the same outcome.
pub struct AnomalyEngine {
    detection: DetectionConfig,
    classifier: ClassifierConfig,
}

impl AnomalyEngine {
    pub fn new(detection: DetectionConfig, classifier: ClassifierConfig) -> Self {
        Self {
            detection,
            classifier,
        }
    }

    pub fn analyze(&self, records: &[TransactionRecord]) -> AnalysisOutcome {
        // The four scored detectors are independent and run over the same
        // immutable sequence.
        let high_freq = detectors::detect_high_frequency(records, &self.detection);
        let high_amount = detectors::detect_high_amount(records, &self.detection);
        let tumbler = detectors::detect_tumbler(records, &self.detection);
        let extortion = detectors::detect_extortion(records, &self.detection);

        let scores = CategoryScores {
            high_freq: score_category(&high_freq),
            high_amount: score_category(&high_amount),
            tumbler: score_category(&tumbler),
            extortion: score_category(&extortion),
        };

        // Auxiliary labeling only; never part of the score.
        let ransomware = classify::classify_ransomware(records, &self.classifier);
        let sextortion = classify::classify_sextortion(
            records,
            &self.classifier,
            self.detection.freq_window_mode,
        );

        let hits = PatternHits {
            ransomware: count_flags(&ransomware),
            sextortion: count_flags(&sextortion),
            tumbler: count_flags(&tumbler),
            extortion: count_flags(&extortion),
        };

        let rolling = detectors::rolling_counts(
            records,
            self.detection.freq_window_secs,
            self.detection.freq_window_mode,
        );
        let intervals = detectors::interval_seconds(records);
        let zs = detectors::z_scores(records);

        let annotated = records
            .iter()
            .enumerate()
            .map(|(i, record)| AnnotatedRecord {
                record: record.clone(),
                rolling_count: rolling[i],
                z_score: zs.as_ref().map(|zs| zs[i]),
                interval_secs: intervals[i],
                flags: AnomalyFlags {
                    high_freq: high_freq[i],
                    high_amount: high_amount[i],
                    tumbler: tumbler[i],
                    extortion: extortion[i],
                    ransomware: ransomware[i],
                    sextortion: sextortion[i],
                },
            })
            .collect();

        AnalysisOutcome {
            records: annotated,
            total_score: scores.total(),
            scores,
            likely_pattern: hits.most_similar(),
        }
    }
}

fn count_flags(flags: &[bool]) -> usize {
    flags.iter().filter(|f| **f).count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anomaly::detectors::tests::spaced;

    fn engine() -> AnomalyEngine {
        AnomalyEngine::new(DetectionConfig::default(), ClassifierConfig::default())
    }

    #[test]
    fn test_empty_sequence_scores_zero() {
        let outcome = engine().analyze(&[]);
        assert_eq!(outcome.scores, CategoryScores::default());
        assert_eq!(outcome.total_score, 0);
        assert_eq!(outcome.likely_pattern, None);
        assert!(outcome.records.is_empty());
    }

    #[test]
    fn test_burst_scenario_scores() {
        // 10 records within a 30-second span at a constant dust value:
        // high-frequency flags 8 of 10 (floor(0.8 * 25) = 20), high-amount
        // flags nothing on the constant series.
        let records = spaced(10, 3, 0.01);
        let outcome = engine().analyze(&records);
        assert_eq!(outcome.scores.high_freq, 20);
        assert_eq!(outcome.scores.high_amount, 0);
        assert_eq!(outcome.scores.extortion, 0);
        assert_eq!(outcome.total_score, outcome.scores.total());
    }

    #[test]
    fn test_gap_scenario_overlapping_patterns() {
        // 3 records at value 1.0 spaced 200 seconds apart: extortion and
        // tumbler both flag 2 of 3 by their literal rules, and the label
        // tie-break prefers tumbler.
        let records = spaced(3, 200, 1.0);
        let outcome = engine().analyze(&records);
        assert_eq!(outcome.scores.extortion, 16); // floor(2/3 * 25)
        assert_eq!(outcome.scores.tumbler, 16);
        assert_eq!(outcome.likely_pattern, Some(PatternKind::Tumbler));
        assert!(!outcome.records[0].flags.extortion);
        assert!(outcome.records[1].flags.extortion);
        assert_eq!(outcome.records[0].interval_secs, 0.0);
    }

    #[test]
    fn test_idempotent() {
        let records = spaced(10, 40, 0.5);
        let first = engine().analyze(&records);
        let second = engine().analyze(&records);
        assert_eq!(first.scores, second.scores);
        assert_eq!(first.total_score, second.total_score);
        assert_eq!(first.likely_pattern, second.likely_pattern);
        for (a, b) in first.records.iter().zip(&second.records) {
            assert_eq!(a.flags, b.flags);
            assert_eq!(a.rolling_count, b.rolling_count);
        }
    }
}
