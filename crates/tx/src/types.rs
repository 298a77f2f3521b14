//! Data model for UTXO selection and unsigned transaction artifacts.

use serde::{Deserialize, Serialize};

/// Satoshis per bitcoin.
pub const SATS_PER_BTC: u64 = 100_000_000;

/// Minimum spendable output value enforced by standard relay policy.
pub const DUST_LIMIT: u64 = 546;

/// Minimum relay fee rate in sat/vB, used by the BIP-125 replacement floor.
pub const MIN_RELAY_FEE_RATE: f64 = 1.0;

/// Sequence number signaling BIP-125 opt-in replaceability.
pub const RBF_SEQUENCE: u32 = 0xffff_fffd;

/// Final sequence number. Inputs carrying it (or `0xfffffffe`) do not signal
/// replaceability.
pub const FINAL_SEQUENCE: u32 = 0xffff_ffff;

/// The network a transaction is built for. Selects address encodings and the
/// remote API root at runtime.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet
    Mainnet,
    /// Bitcoin testnet4
    #[default]
    Testnet,
}

/// An unspent transaction output the user may select as an input.
///
/// Uniquely keyed by `(txid, vout)`. The `script_pubkey` is optional because
/// address listings from the data source do not carry it; it is enriched via a
/// follow-up transaction lookup, or supplied directly on manual entry. An
/// input without a known script cannot be assembled into an artifact.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Utxo {
    /// Txid of the funding transaction, big-endian display hex
    pub txid: String,
    /// Index of this output in the funding transaction
    pub vout: u32,
    /// Output value in sats
    pub value: u64,
    /// Whether the funding transaction is confirmed
    pub confirmed: bool,
    /// Hex-encoded script pubkey of this output, if known
    pub script_pubkey: Option<String>,
}

impl Utxo {
    /// Instantiate a UTXO from a data-source row. The script pubkey may be
    /// enriched later.
    pub fn new(txid: impl Into<String>, vout: u32, value: u64, confirmed: bool) -> Self {
        Self {
            txid: txid.into(),
            vout,
            value,
            confirmed,
            script_pubkey: None,
        }
    }

    /// Instantiate a manually entered UTXO with a known script pubkey.
    pub fn with_script(
        txid: impl Into<String>,
        vout: u32,
        value: u64,
        script_pubkey: impl Into<String>,
    ) -> Self {
        Self {
            txid: txid.into(),
            vout,
            value,
            confirmed: false,
            script_pubkey: Some(script_pubkey.into()),
        }
    }

    /// The `txid:vout` outpoint string used as a selection key.
    pub fn outpoint(&self) -> String {
        format!("{}:{}", self.txid, self.vout)
    }
}

/// A requested payment: `value` sats to `address`. Exists only while a
/// transaction is being built.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Payment {
    /// Destination address
    pub address: String,
    /// Amount in sats
    pub value: u64,
}

impl Payment {
    /// Instantiate a payment.
    pub fn new(address: impl Into<String>, value: u64) -> Self {
        Self {
            address: address.into(),
            value,
        }
    }
}

/// An input bound into an unsigned transaction: the outpoint it spends plus
/// the spent output's value and script, and the assigned sequence number.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PlannedInput {
    /// Txid of the funding transaction, big-endian display hex
    pub txid: String,
    /// Index of the spent output
    pub vout: u32,
    /// Value of the spent output in sats
    pub value: u64,
    /// Script pubkey of the spent output
    pub script_pubkey: Vec<u8>,
    /// Sequence number; `RBF_SEQUENCE` when replaceability is signaled
    pub sequence: u32,
}

impl PlannedInput {
    /// True if this input's sequence signals BIP-125 replaceability.
    pub fn signals_rbf(&self) -> bool {
        self.sequence < FINAL_SEQUENCE - 1
    }
}

/// An assembled, not-yet-signed transaction.
///
/// Input and output order is exactly the order the caller supplied; it is
/// semantically meaningful (it affects the resulting txid) and is never
/// reordered. The artifact is immutable once built. Fee bumps produce a new
/// artifact rather than mutating this one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct UnsignedTx {
    /// Transaction version
    pub version: u32,
    /// Consumed prior outputs, in caller order
    pub inputs: Vec<PlannedInput>,
    /// Requested payments, in caller order
    pub outputs: Vec<Payment>,
    /// Locktime, 0 unless explicitly set
    pub locktime: u32,
}

impl UnsignedTx {
    /// Sum of the input values.
    pub fn total_input(&self) -> u64 {
        self.inputs.iter().map(|i| i.value).sum()
    }

    /// Sum of the output values.
    pub fn total_output(&self) -> u64 {
        self.outputs.iter().map(|o| o.value).sum()
    }

    /// The fee implied by the input/output difference. The builder guarantees
    /// this is non-negative and at least the target rate times the estimated
    /// size.
    pub fn implied_fee(&self) -> u64 {
        self.total_input() - self.total_output()
    }

    /// True if any input signals BIP-125 replaceability.
    pub fn signals_rbf(&self) -> bool {
        self.inputs.iter().any(PlannedInput::signals_rbf)
    }
}

/// Format a sat amount as a BTC string with 8 decimal places.
pub fn format_btc(sats: u64) -> String {
    let whole = sats / SATS_PER_BTC;
    let frac = sats % SATS_PER_BTC;
    format!("{whole}.{frac:08}")
}

/// Format a sat amount for display, pairing the BTC value with the
/// thousands-grouped sat count.
pub fn format_sats(sats: u64) -> String {
    format!("{} BTC ({} sats)", format_btc(sats), group_thousands(sats))
}

fn group_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
