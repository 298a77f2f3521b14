//! Deterministic size and fee arithmetic. No I/O, no randomness.
//!
//! Sizes are modeled for single-signature witness-pubkey-hash (P2WPKH)
//! spends: witness bytes count at 1/4 weight, everything else at full weight,
//! and virtual size is `ceil(weight / 4)`.

use crate::types::MIN_RELAY_FEE_RATE;

/// Non-witness overhead of a transaction: version, counts, locktime.
const BASE_SIZE: u64 = 10;

/// Non-witness bytes per P2WPKH input.
const INPUT_SIZE: u64 = 68;

/// Bytes per output.
const OUTPUT_SIZE: u64 = 34;

/// Witness bytes per P2WPKH input (signature + pubkey).
const WITNESS_SIZE: u64 = 107;

/// Estimate the virtual size in vBytes of a transaction with `input_count`
/// P2WPKH inputs and `output_count` outputs.
pub fn estimate_vsize(input_count: usize, output_count: usize) -> u64 {
    let ins = input_count as u64;
    let outs = output_count as u64;
    let non_witness = BASE_SIZE + ins * INPUT_SIZE + outs * OUTPUT_SIZE;
    (non_witness * 3 + ins * WITNESS_SIZE).div_ceil(4)
}

/// Total fee in sats for a transaction of `vsize` vBytes at `rate` sat/vB,
/// rounded up to a whole sat.
pub fn fee_for(vsize: u64, rate: f64) -> u64 {
    (vsize as f64 * rate).ceil() as u64
}

/// Minimum acceptable fee for a BIP-125 replacement.
///
/// The replacement must pay for its own relay at the minimum relay rate and
/// exceed the original fee by at least 1%. This approximates BIP-125 rules 3
/// and 4; it does not model evicted-descendant absolute fees, which would
/// require mempool state this client does not have.
///
/// `_original_size` is accepted for signature parity with the data source's
/// transaction record but does not participate in the formula.
pub fn minimum_replacement_fee(original_fee: u64, _original_size: u64, new_vsize: u64) -> u64 {
    let min_relay = new_vsize as f64 * MIN_RELAY_FEE_RATE;
    let increment = min_relay.max(original_fee as f64 * 0.01);
    (original_fee as f64 + increment).ceil() as u64
}

/// Raw fee rate in sat/vB. Callers must not pass `vsize == 0`.
pub fn fee_rate(fee: u64, vsize: u64) -> f64 {
    fee as f64 / vsize as f64
}

/// Worst-case fee rate in whole sat/vB, rounded up.
pub fn fee_rate_ceil(fee: u64, vsize: u64) -> u64 {
    (fee as f64 / vsize as f64).ceil() as u64
}

/// Fee rate rounded to one decimal place for display.
pub fn fee_rate_display(fee: u64, vsize: u64) -> f64 {
    (fee as f64 / vsize as f64 * 10.0).round() / 10.0
}
