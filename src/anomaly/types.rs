use serde::Serialize;

use crate::normalize::TransactionRecord;

/// Named behavioral patterns the classifier can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternKind {
    Ransomware,
    Sextortion,
    Tumbler,
    Extortion,
}

impl PatternKind {
    /// Tie-break order for the "most similar pattern" label. Fixed and
    /// explicit; equal hit counts resolve to the earlier entry.
    pub const PRIORITY: [PatternKind; 4] = [
        Self::Ransomware,
        Self::Sextortion,
        Self::Tumbler,
        Self::Extortion,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ransomware => "ransomware",
            Self::Sextortion => "sextortion",
            Self::Tumbler => "tumbler",
            Self::Extortion => "extortion",
        }
    }
}

/// Per-transaction boolean annotations. Independent of each other: one
/// record may carry any subset. Computed fresh per analysis run, never
/// persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AnomalyFlags {
    pub high_freq: bool,
    pub high_amount: bool,
    pub tumbler: bool,
    pub extortion: bool,
    pub ransomware: bool,
    pub sextortion: bool,
}

/// A canonical record plus the derived columns the detectors computed for
/// it, ready for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub record: TransactionRecord,
    /// Trailing-window burst count (inclusive of this record).
    pub rolling_count: u32,
    /// Value z-score; None when the series is degenerate (std of zero or
    /// fewer than two records).
    pub z_score: Option<f64>,
    /// Seconds since the previous record; 0.0 is the "no prior interval"
    /// sentinel on the first record.
    pub interval_secs: f64,
    pub flags: AnomalyFlags,
}

/// Bounded per-category contributions to the total score, each in [0, 25].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryScores {
    pub high_freq: u8,
    pub high_amount: u8,
    pub tumbler: u8,
    pub extortion: u8,
}

impl CategoryScores {
    /// Combined score, capped at 100. Four maxed categories hit the cap
    /// exactly.
    pub fn total(&self) -> u8 {
        let sum = self.high_freq as u32
            + self.high_amount as u32
            + self.tumbler as u32
            + self.extortion as u32;
        sum.min(100) as u8
    }
}

/// How the analysis obtained (or failed to obtain) its input data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DataState {
    /// Transactions were fetched and analyzed.
    Analyzed,
    /// Fetch failed or returned nothing; scores are all zero, not an error.
    NoData,
    /// Address is on the sanctions list; the pipeline never ran.
    Sanctioned,
}

/// Full analysis result for one address.
#[derive(Debug, Clone, Serialize)]
pub struct AddressReport {
    pub address: String,
    pub sanctioned: bool,
    pub data_state: DataState,
    pub tx_count: usize,
    pub scores: CategoryScores,
    pub total_score: u8,
    pub likely_pattern: Option<PatternKind>,
    pub records: Vec<AnnotatedRecord>,
}

impl AddressReport {
    /// Short-circuit report for a sanctioned address: maximum score, no
    /// detector output.
    pub fn sanctioned(address: &str) -> Self {
        Self {
            address: address.to_string(),
            sanctioned: true,
            data_state: DataState::Sanctioned,
            tx_count: 0,
            scores: CategoryScores::default(),
            total_score: 100,
            likely_pattern: None,
            records: Vec::new(),
        }
    }

    /// Report for an address whose history could not be fetched or was
    /// empty. The worst user-visible outcome of any upstream failure.
    pub fn no_data(address: &str) -> Self {
        Self {
            address: address.to_string(),
            sanctioned: false,
            data_state: DataState::NoData,
            tx_count: 0,
            scores: CategoryScores::default(),
            total_score: 0,
            likely_pattern: None,
            records: Vec::new(),
        }
    }
}
