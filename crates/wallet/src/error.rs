use thiserror::Error;

use utxo_provider::ProviderError;
use utxo_psbt::PsbtError;
use utxo_tx::TxError;

/// Errors surfaced by the build and fee-bump workflows.
///
/// Every variant is terminal for the attempt that produced it; nothing here
/// is retried. Signer and broadcaster failures carry the external message
/// verbatim.
#[derive(Debug, Error)]
pub enum WalletError {
    /// Bubbled up from the assembler
    #[error(transparent)]
    Tx(#[from] TxError),

    /// Bubbled up from artifact encoding
    #[error(transparent)]
    Psbt(#[from] PsbtError),

    /// Bubbled up from the data source
    #[error(transparent)]
    Provider(#[from] ProviderError),

    /// The data source has no record of the referenced transaction
    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    /// Confirmed transactions can never be replaced
    #[error("Cannot replace confirmed transaction {0}")]
    AlreadyConfirmed(String),

    /// The proposed replacement fee is below the BIP-125 floor
    #[error("Fee too low. Minimum required: {minimum_fee} sats ({minimum_rate} sat/vB)")]
    FeeTooLow {
        /// Minimum acceptable replacement fee in sats
        minimum_fee: u64,
        /// The corresponding rate in sat/vB, rounded up
        minimum_rate: u64,
    },

    /// The external signer refused or failed; message passed through
    #[error("Signer error: {0}")]
    Signer(String),

    /// The external broadcaster refused or failed; message passed through
    #[error("Broadcast error: {0}")]
    Broadcast(String),
}
