//! Wire serialization primitives: CompactSize varints and the legacy
//! (non-witness) encoding of the unsigned transaction.

use utxo_tx::{Network, UnsignedTx};

use crate::{enc::decode_address, PsbtError};

/// Append a Bitcoin CompactSize varint.
pub(crate) fn write_varint(buf: &mut Vec<u8>, n: u64) {
    match n {
        0..=0xfc => buf.push(n as u8),
        0xfd..=0xffff => {
            buf.push(0xfd);
            buf.extend((n as u16).to_le_bytes());
        }
        0x1_0000..=0xffff_ffff => {
            buf.push(0xfe);
            buf.extend((n as u32).to_le_bytes());
        }
        _ => {
            buf.push(0xff);
            buf.extend(n.to_le_bytes());
        }
    }
}

/// Append a length-prefixed byte string.
pub(crate) fn write_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(buf, bytes.len() as u64);
    buf.extend(bytes);
}

/// Decode a display-order txid into the 32 little-endian bytes used on the
/// wire.
pub(crate) fn txid_to_wire(txid: &str) -> Result<[u8; 32], PsbtError> {
    let bytes = hex::decode(txid).map_err(|_| PsbtError::BadTxid(txid.to_owned()))?;
    let mut wire: [u8; 32] = bytes
        .try_into()
        .map_err(|_| PsbtError::BadTxid(txid.to_owned()))?;
    wire.reverse();
    Ok(wire)
}

/// Serialize the spent output (value + script pubkey) of an input, as
/// required by the PSBT_IN_WITNESS_UTXO field.
pub(crate) fn serialize_txout(value: u64, script_pubkey: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(9 + script_pubkey.len());
    buf.extend(value.to_le_bytes());
    write_prefixed(&mut buf, script_pubkey);
    buf
}

/// Serialize the artifact as a legacy (non-witness) transaction with empty
/// script sigs: the PSBT_GLOBAL_UNSIGNED_TX payload. Output addresses are
/// decoded into script pubkeys for `network`.
pub(crate) fn serialize_unsigned(tx: &UnsignedTx, network: Network) -> Result<Vec<u8>, PsbtError> {
    let mut buf = vec![];
    buf.extend(tx.version.to_le_bytes());

    write_varint(&mut buf, tx.inputs.len() as u64);
    for input in &tx.inputs {
        buf.extend(txid_to_wire(&input.txid)?);
        buf.extend(input.vout.to_le_bytes());
        write_varint(&mut buf, 0); // empty script sig
        buf.extend(input.sequence.to_le_bytes());
    }

    write_varint(&mut buf, tx.outputs.len() as u64);
    for output in &tx.outputs {
        let script = decode_address(&output.address, network)?;
        buf.extend(output.value.to_le_bytes());
        write_prefixed(&mut buf, &script);
    }

    buf.extend(tx.locktime.to_le_bytes());
    Ok(buf)
}
