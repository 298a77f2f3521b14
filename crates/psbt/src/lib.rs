//! BIP174 (PSBT) encoding of unsigned transaction artifacts.
//!
//! Only the creator role is implemented: the artifact produced by the
//! assembler is serialized into spec-compliant PSBT bytes so that third-party
//! wallet signers can parse it, sign it, and hand back a finished
//! transaction. Each input map carries a `PSBT_IN_WITNESS_UTXO` entry (the
//! spent output's script and amount) so the signer can verify what it is
//! spending.

pub mod enc;

mod ser;

pub use enc::decode_address;

use thiserror::Error;

use utxo_tx::{Network, UnsignedTx};

/// PSBT magic prefix and separator, per BIP174.
const MAGIC: [u8; 5] = *b"psbt\xff";

/// Key type for PSBT_GLOBAL_UNSIGNED_TX.
const GLOBAL_UNSIGNED_TX: u8 = 0x00;

/// Key type for PSBT_IN_WITNESS_UTXO.
const IN_WITNESS_UTXO: u8 = 0x01;

/// Errors produced while encoding an artifact.
#[derive(Debug, Error)]
pub enum PsbtError {
    /// An address could not be decoded into a script pubkey for the active
    /// network.
    #[error("Cannot decode address for the active network: {0}")]
    BadAddress(String),

    /// A txid was not 64 hex characters.
    #[error("Invalid txid: {0}")]
    BadTxid(String),
}

/// A partially signed transaction holding an unsigned transaction and one
/// witness-UTXO entry per input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Psbt {
    unsigned_tx: Vec<u8>,
    witness_utxos: Vec<Vec<u8>>,
    output_count: usize,
}

impl Psbt {
    /// Build a PSBT from an assembled artifact. Output addresses are decoded
    /// for `network`; a failure here means a destination was invalid for the
    /// active network.
    pub fn from_unsigned(tx: &UnsignedTx, network: Network) -> Result<Self, PsbtError> {
        Ok(Self {
            unsigned_tx: ser::serialize_unsigned(tx, network)?,
            witness_utxos: tx
                .inputs
                .iter()
                .map(|i| ser::serialize_txout(i.value, &i.script_pubkey))
                .collect(),
            output_count: tx.outputs.len(),
        })
    }

    /// Serialize to PSBT bytes.
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::from(MAGIC);

        // Global map: the unsigned transaction
        write_pair(&mut buf, &[GLOBAL_UNSIGNED_TX], &self.unsigned_tx);
        buf.push(0x00);

        // One map per input, carrying the spent output
        for witness_utxo in &self.witness_utxos {
            write_pair(&mut buf, &[IN_WITNESS_UTXO], witness_utxo);
            buf.push(0x00);
        }

        // One empty map per output
        buf.extend(std::iter::repeat(0x00).take(self.output_count));
        buf
    }

    /// Serialize to the hex string handed to wallet signers.
    pub fn serialize_hex(&self) -> String {
        hex::encode(self.serialize())
    }
}

/// Encode an artifact straight to PSBT hex.
pub fn encode_psbt_hex(tx: &UnsignedTx, network: Network) -> Result<String, PsbtError> {
    Ok(Psbt::from_unsigned(tx, network)?.serialize_hex())
}

fn write_pair(buf: &mut Vec<u8>, key: &[u8], value: &[u8]) {
    ser::write_prefixed(buf, key);
    ser::write_prefixed(buf, value);
}
