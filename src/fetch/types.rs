use serde::Deserialize;
use serde_json::Value as JsonValue;

/// Response body of the address-history endpoint. The upstream serves two
/// shapes depending on query parameters: flat transfer references in
/// `txrefs`, or full transaction objects in `txs`. Either list may be
/// missing; both may appear in one response.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AddressHistory {
    pub address: Option<String>,
    pub n_tx: Option<u64>,
    #[serde(default)]
    pub txrefs: Vec<TxRef>,
    #[serde(default)]
    pub txs: Vec<FullTx>,
}

impl AddressHistory {
    pub fn is_empty(&self) -> bool {
        self.txrefs.is_empty() && self.txs.is_empty()
    }

    pub fn entry_count(&self) -> usize {
        self.txrefs.len() + self.txs.len()
    }
}

/// Flat transfer reference: one input or output of one transaction as seen
/// from the queried address. Every field can be absent upstream, so none
/// default to zero.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct TxRef {
    pub tx_hash: Option<String>,
    /// Confirmation time as an RFC 3339 string; unconfirmed refs omit it.
    pub confirmed: Option<String>,
    /// Amount in satoshis.
    pub value: Option<i64>,
    pub tx_input_n: Option<i64>,
    pub tx_output_n: Option<i64>,
    pub spent_by: Option<String>,
}

/// Full transaction object with its output graph.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FullTx {
    pub hash: Option<String>,
    pub confirmed: Option<String>,
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TxInput {
    #[serde(default)]
    pub addresses: Vec<String>,
    pub output_value: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct TxOutput {
    /// Amount in satoshis. Kept as raw JSON because a malformed upstream
    /// value must skip this single output, not fail the whole transaction.
    pub value: Option<JsonValue>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

impl TxOutput {
    /// The output amount in satoshis, if present and numeric.
    pub fn value_satoshis(&self) -> Option<i64> {
        self.value.as_ref().and_then(|v| v.as_i64())
    }
}
