use thiserror::Error;

/// Errors produced while assembling an unsigned transaction.
#[derive(Debug, Error)]
pub enum TxError {
    /// The builder was asked to build with no inputs.
    #[error("Transaction has no inputs")]
    NoInputs,

    /// The builder was asked to build with no outputs.
    #[error("Transaction has no outputs")]
    NoOutputs,

    /// The target fee rate was zero, negative, or not a number.
    #[error("Invalid fee rate: {0} sat/vB")]
    InvalidFeeRate(f64),

    /// An input is missing the script pubkey of the output it spends. The
    /// artifact format requires the spent script and value so the signer can
    /// verify amounts, so this is fatal to the build.
    #[error("Missing scriptPubKey for input {txid}:{vout}")]
    MissingScript {
        /// Txid of the funding transaction
        txid: String,
        /// Index of the spent output
        vout: u32,
    },

    /// The selected inputs cannot cover the requested outputs plus the fee.
    #[error("Insufficient funds: {total_input} sats in, {required} sats needed (short {shortfall})")]
    InsufficientFunds {
        /// Sum of the selected input values
        total_input: u64,
        /// Outputs plus fee
        required: u64,
        /// Exactly how many sats are missing
        shortfall: u64,
    },

    /// An output value is below the spendable minimum of 546 sats.
    #[error("Output of {value} sats is below the dust limit (546 sats)")]
    DustOutput {
        /// The offending output value
        value: u64,
    },
}
