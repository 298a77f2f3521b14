use async_trait::async_trait;
use thiserror::Error;

use utxo_tx::Utxo;

use crate::types::{FeeEstimates, Transaction};

/// Errors thrown by providers.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Networking failure
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),

    /// The API returned a body that did not parse
    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// The API rejected a request
    #[error("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body, usually a plain-text reason
        message: String,
    },
}

/// A read/broadcast connection to a blockchain index.
///
/// Implementations are injected into the wallet workflow explicitly; nothing
/// in this workspace holds a process-wide provider. All calls are
/// at-most-once: no retries are issued here or by callers.
#[async_trait]
pub trait BtcProvider: Sync + Send {
    /// Fetch a transaction record. `Ok(None)` if the index has no record of
    /// the txid.
    async fn get_tx(&self, txid: &str) -> Result<Option<Transaction>, ProviderError>;

    /// Fetch the UTXOs of an address, each enriched with its script pubkey
    /// via a follow-up transaction lookup. An enrichment failure leaves that
    /// UTXO's script unset rather than failing the listing.
    async fn get_address_utxos(&self, address: &str) -> Result<Vec<Utxo>, ProviderError>;

    /// Fetch the recommended fee rates.
    async fn recommended_fees(&self) -> Result<FeeEstimates, ProviderError>;

    /// Broadcast a raw transaction, resolving to its txid.
    async fn broadcast(&self, tx_hex: &str) -> Result<String, ProviderError>;

    /// Fetch the current chain tip height.
    async fn tip_height(&self) -> Result<u64, ProviderError>;
}
