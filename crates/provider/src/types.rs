//! Response shapes of the esplora/mempool HTTP API.

use serde::{Deserialize, Serialize};

use utxo_tx::Utxo;

/// A transaction as recorded by the index.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Transaction {
    /// Txid, big-endian display hex
    pub txid: String,
    /// Transaction version
    pub version: u32,
    /// Locktime
    pub locktime: u32,
    /// Inputs
    pub vin: Vec<Vin>,
    /// Outputs
    pub vout: Vec<Prevout>,
    /// Serialized size in bytes
    pub size: u64,
    /// Weight in weight units
    pub weight: u64,
    /// Fee paid, in sats
    pub fee: u64,
    /// Confirmation status
    pub status: TxStatus,
}

impl Transaction {
    /// Virtual size in vBytes, `ceil(weight / 4)`.
    pub fn vsize(&self) -> u64 {
        self.weight.div_ceil(4)
    }
}

/// A transaction input with the output it spends.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Vin {
    /// Txid of the funding transaction
    pub txid: String,
    /// Index of the spent output
    pub vout: u32,
    /// The spent output; absent for coinbase inputs
    #[serde(default)]
    pub prevout: Option<Prevout>,
    /// Sequence number as recorded on chain
    pub sequence: u32,
    /// True for coinbase inputs
    #[serde(default)]
    pub is_coinbase: bool,
}

/// A transaction output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Prevout {
    /// Hex script pubkey
    pub scriptpubkey: String,
    /// Decoded destination, if the script has an address form
    #[serde(default)]
    pub scriptpubkey_address: Option<String>,
    /// Value in sats
    pub value: u64,
}

/// Confirmation status of a transaction.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct TxStatus {
    /// Whether the transaction is confirmed
    pub confirmed: bool,
    /// Height of the confirming block
    #[serde(default)]
    pub block_height: Option<u64>,
    /// Hash of the confirming block
    #[serde(default)]
    pub block_hash: Option<String>,
    /// Timestamp of the confirming block
    #[serde(default)]
    pub block_time: Option<u64>,
}

/// Recommended fee rates in sat/vB, camelCase on the wire.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FeeEstimates {
    /// Next-block rate
    pub fastest_fee: f64,
    /// ~30 minute rate
    pub half_hour_fee: f64,
    /// ~1 hour rate
    pub hour_fee: f64,
    /// Low-priority rate
    pub economy_fee: f64,
    /// Relay floor
    pub minimum_fee: f64,
}

/// A row of `/address/{addr}/utxo`. Carries no script pubkey; listings are
/// enriched with a follow-up transaction lookup.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub(crate) struct AddressUtxo {
    pub txid: String,
    pub vout: u32,
    pub value: u64,
    pub status: TxStatus,
}

impl AddressUtxo {
    pub(crate) fn into_utxo(self) -> Utxo {
        Utxo::new(self.txid, self.vout, self.value, self.status.confirmed)
    }
}
