use crate::anomaly::engine::AnomalyEngine;
use crate::anomaly::types::{AddressReport, DataState};
use crate::config::Config;
use crate::fetch::client::LedgerClient;
use crate::normalize;
use crate::sanctions::SanctionSet;

/// Orchestrates one analysis request:
/// 1. Sanctions gate (short-circuits to score 100)
/// 2. Fetch raw history (failure recovered to "no data")
/// 3. Normalize into the canonical sequence
/// 4. Detect, score, classify
///
/// All state is loaded once at startup and passed in explicitly; requests
/// share nothing mutable.
pub struct AnalysisPipeline {
    sanctions: SanctionSet,
    client: LedgerClient,
    engine: AnomalyEngine,
}

impl AnalysisPipeline {
    pub fn init(config: &Config) -> eyre::Result<Self> {
        let sanctions = SanctionSet::load(&config.sanctions.list_path);
        let client = LedgerClient::new(&config.fetch, config.api_token())?;
        let engine = AnomalyEngine::new(config.detection.clone(), config.classifier.clone());

        Ok(Self {
            sanctions,
            client,
            engine,
        })
    }

    #[cfg(test)]
    pub fn with_parts(sanctions: SanctionSet, client: LedgerClient, engine: AnomalyEngine) -> Self {
        Self {
            sanctions,
            client,
            engine,
        }
    }

    /// Number of addresses on the loaded sanctions list.
    pub fn sanction_count(&self) -> usize {
        self.sanctions.len()
    }

    /// Analyze one address. Never fails for data reasons: acquisition
    /// failures and empty histories come back as a `NoData` report.
    pub async fn analyze(&self, address: &str) -> AddressReport {
        if self.sanctions.contains(address) {
            tracing::warn!(address, "Address is on the sanctions list");
            return AddressReport::sanctioned(address);
        }

        let history = match self.client.address_history(address).await {
            Ok(history) => history,
            Err(e) => {
                tracing::warn!(address, error = %e, "History fetch failed, reporting no data");
                return AddressReport::no_data(address);
            }
        };

        let records = normalize::normalize(&history);
        if records.is_empty() {
            tracing::info!(address, "No usable transactions for address");
            return AddressReport::no_data(address);
        }

        let outcome = self.engine.analyze(&records);
        tracing::info!(
            address,
            tx_count = records.len(),
            total_score = outcome.total_score,
            likely_pattern = outcome.likely_pattern.map(|p| p.as_str()),
            "Analysis complete"
        );

        AddressReport {
            address: address.to_string(),
            sanctioned: false,
            data_state: DataState::Analyzed,
            tx_count: records.len(),
            total_score: outcome.total_score,
            scores: outcome.scores,
            likely_pattern: outcome.likely_pattern,
            records: outcome.records,
        }
    }
}
