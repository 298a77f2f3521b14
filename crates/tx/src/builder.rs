//! Assembly of unsigned transactions from selected UTXOs and requested
//! payments.
//!
//! The builder is consumed method-by-method and finalized with [`TxBuilder::build`],
//! which performs all validation: fee sufficiency at the target rate, dust
//! rules, and script availability. Input and output order is preserved
//! exactly as supplied.

use crate::{
    error::TxError,
    fees,
    types::{Payment, PlannedInput, UnsignedTx, Utxo, DUST_LIMIT, FINAL_SEQUENCE, RBF_SEQUENCE},
};

/// Builder for [`UnsignedTx`] artifacts.
///
/// Defaults: version 2, locktime 0, RBF signaling enabled.
#[derive(Debug, Clone, PartialEq)]
pub struct TxBuilder {
    version: u32,
    inputs: Vec<Utxo>,
    outputs: Vec<Payment>,
    fee_rate: f64,
    rbf: bool,
    locktime: u32,
}

impl Default for TxBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TxBuilder {
    /// A fresh builder with no inputs or outputs.
    pub fn new() -> Self {
        Self {
            version: 2,
            inputs: vec![],
            outputs: vec![],
            fee_rate: 0.0,
            rbf: true,
            locktime: 0,
        }
    }

    /// Set the transaction version.
    pub fn version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Add a UTXO to spend.
    pub fn spend(mut self, utxo: Utxo) -> Self {
        self.inputs.push(utxo);
        self
    }

    /// Add a set of UTXOs to spend.
    pub fn extend_inputs<I>(mut self, utxos: I) -> Self
    where
        I: IntoIterator<Item = Utxo>,
    {
        self.inputs.extend(utxos);
        self
    }

    /// Add an output paying `value` sats to `address`.
    pub fn pay(mut self, address: impl Into<String>, value: u64) -> Self {
        self.outputs.push(Payment::new(address, value));
        self
    }

    /// Add a set of payments.
    pub fn extend_outputs<I>(mut self, payments: I) -> Self
    where
        I: IntoIterator<Item = Payment>,
    {
        self.outputs.extend(payments);
        self
    }

    /// Set the target fee rate in sat/vB.
    pub fn fee_rate(mut self, rate: f64) -> Self {
        self.fee_rate = rate;
        self
    }

    /// Enable or disable BIP-125 replaceability signaling.
    pub fn rbf(mut self, rbf: bool) -> Self {
        self.rbf = rbf;
        self
    }

    /// Set the locktime.
    pub fn locktime(mut self, locktime: u32) -> Self {
        self.locktime = locktime;
        self
    }

    /// Estimated virtual size of the transaction as currently configured.
    /// Pass-through to [`fees::estimate_vsize`] for pre-flight quotes.
    pub fn estimate_size(&self) -> u64 {
        fees::estimate_vsize(self.inputs.len(), self.outputs.len())
    }

    /// Consume self, producing an [`UnsignedTx`].
    ///
    /// Fails if inputs or outputs are empty, the fee rate is not positive,
    /// any output is below the dust limit, any input lacks a decodable script
    /// pubkey, or the inputs cannot cover outputs plus the fee at the target
    /// rate.
    pub fn build(self) -> Result<UnsignedTx, TxError> {
        if self.inputs.is_empty() {
            return Err(TxError::NoInputs);
        }
        if self.outputs.is_empty() {
            return Err(TxError::NoOutputs);
        }
        if !(self.fee_rate > 0.0) {
            return Err(TxError::InvalidFeeRate(self.fee_rate));
        }
        for output in &self.outputs {
            if output.value < DUST_LIMIT {
                return Err(TxError::DustOutput {
                    value: output.value,
                });
            }
        }

        let sequence = if self.rbf { RBF_SEQUENCE } else { FINAL_SEQUENCE };
        let mut inputs = Vec::with_capacity(self.inputs.len());
        for utxo in &self.inputs {
            let script_pubkey = utxo
                .script_pubkey
                .as_ref()
                .and_then(|s| hex::decode(s).ok())
                .filter(|s| !s.is_empty())
                .ok_or_else(|| TxError::MissingScript {
                    txid: utxo.txid.clone(),
                    vout: utxo.vout,
                })?;
            inputs.push(PlannedInput {
                txid: utxo.txid.clone(),
                vout: utxo.vout,
                value: utxo.value,
                script_pubkey,
                sequence,
            });
        }

        let total_input: u64 = inputs.iter().map(|i| i.value).sum();
        let total_output: u64 = self.outputs.iter().map(|o| o.value).sum();
        let fee = fees::fee_for(self.estimate_size(), self.fee_rate);
        let required = total_output + fee;
        if total_input < required {
            return Err(TxError::InsufficientFunds {
                total_input,
                required,
                shortfall: required - total_input,
            });
        }

        Ok(UnsignedTx {
            version: self.version,
            inputs,
            outputs: self.outputs,
            locktime: self.locktime,
        })
    }
}
