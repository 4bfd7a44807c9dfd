use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::fetch::types::AddressHistory;

/// Satoshis per BTC; raw ledger amounts are in the smallest unit.
const SATOSHI_DIVISOR: f64 = 1e8;

/// One canonical transfer event. Sequences of these are always sorted
/// ascending by `confirmed` (stable, so ties keep arrival order), and a
/// record only exists if its timestamp parsed — detectors never see a
/// missing timestamp.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionRecord {
    pub tx_hash: Option<String>,
    pub confirmed: DateTime<Utc>,
    pub value_btc: f64,
    pub input_count: Option<i64>,
    pub output_count: Option<i64>,
    pub spent_by: Option<String>,
    /// Destination address, known only for full-graph outputs.
    pub address: Option<String>,
}

/// Parse the timestamp formats the upstream emits: RFC 3339 (trailing `Z`
/// or numeric offset, optional fractional seconds) plus bare date-times
/// interpreted as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(naive.and_utc());
        }
    }
    None
}

/// Convert a raw address history into the canonical ordered sequence.
///
/// Flat transfer refs map one-to-one; full transactions fan out into one
/// record per output, sharing the parent hash and timestamp. Records with
/// unparseable timestamps and outputs with missing or non-numeric values
/// are dropped individually, never failing the batch.
pub fn normalize(history: &AddressHistory) -> Vec<TransactionRecord> {
    let mut records = Vec::with_capacity(history.entry_count());
    let mut dropped = 0usize;

    for txref in &history.txrefs {
        let confirmed = match txref.confirmed.as_deref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                dropped += 1;
                continue;
            }
        };
        let value = match txref.value {
            Some(v) => v,
            None => {
                dropped += 1;
                continue;
            }
        };

        records.push(TransactionRecord {
            tx_hash: txref.tx_hash.clone(),
            confirmed,
            value_btc: value as f64 / SATOSHI_DIVISOR,
            input_count: txref.tx_input_n,
            output_count: txref.tx_output_n,
            spent_by: txref.spent_by.clone(),
            address: None,
        });
    }

    for tx in &history.txs {
        let confirmed = match tx.confirmed.as_deref().and_then(parse_timestamp) {
            Some(ts) => ts,
            None => {
                dropped += 1;
                continue;
            }
        };

        for output in &tx.outputs {
            let value = match output.value_satoshis() {
                Some(v) => v,
                None => {
                    dropped += 1;
                    continue;
                }
            };

            records.push(TransactionRecord {
                tx_hash: tx.hash.clone(),
                confirmed,
                value_btc: value as f64 / SATOSHI_DIVISOR,
                input_count: Some(tx.inputs.len() as i64),
                output_count: Some(tx.outputs.len() as i64),
                spent_by: None,
                address: output.addresses.first().cloned(),
            });
        }
    }

    if dropped > 0 {
        tracing::debug!(dropped, kept = records.len(), "Dropped malformed entries");
    }

    // Stable: equal timestamps keep their arrival order.
    records.sort_by_key(|r| r.confirmed);
    records
}
