//! BIP-125 replacement planning.
//!
//! Given a broadcast-but-unconfirmed transaction and a higher fee rate, the
//! planner re-spends exactly the original inputs, reuses (or replaces) the
//! outputs, verifies the replacement fee floor, shifts the fee increase onto
//! the largest output, and delegates final assembly to the transaction
//! builder with replaceability forced on.
//!
//! The fee floor approximates BIP-125 rules 3 and 4 only; evicted-descendant
//! fees are not modeled because no mempool state is available here.

use utxo_provider::{BtcProvider, Transaction};
use utxo_tx::{fees, Payment, TxBuilder, TxError, UnsignedTx, Utxo, DUST_LIMIT, FINAL_SEQUENCE};

use crate::error::WalletError;

/// A planned replacement transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Replacement {
    /// The assembled artifact, RBF-signaled
    pub tx: UnsignedTx,
    /// The replacement fee in sats
    pub fee: u64,
    /// The requested rate in sat/vB
    pub fee_rate: f64,
}

/// A fee-bump suggestion for display. Never an enforced floor; the enforced
/// floor is always [`fees::minimum_replacement_fee`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeeBump {
    /// Fee the pending transaction currently pays
    pub current_fee: u64,
    /// Its observed rate, one-decimal rounded
    pub current_fee_rate: f64,
    /// Fee required to match the next-block quote
    pub recommended_fee: u64,
    /// The next-block quote in sat/vB
    pub recommended_fee_rate: f64,
}

/// Replacement planner over an injected data source.
#[derive(Debug, Clone, Copy)]
pub struct RbfPlanner<'a, P> {
    provider: &'a P,
}

impl<'a, P: BtcProvider> RbfPlanner<'a, P> {
    /// Plan replacements against `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }

    /// True if any input signals BIP-125 replaceability. Sequences
    /// `0xfffffffe` and `0xffffffff` are both final; everything below
    /// signals.
    pub fn is_rbf_signaled(tx: &Transaction) -> bool {
        tx.vin.iter().any(|vin| vin.sequence < FINAL_SEQUENCE - 1)
    }

    /// True if the transaction is still unconfirmed.
    pub fn is_pending(tx: &Transaction) -> bool {
        !tx.status.confirmed
    }

    /// Derive a replacement for `txid` at `new_rate` sat/vB.
    ///
    /// Outputs default to the original's (dropping any without a resolvable
    /// destination) unless `custom_outputs` is supplied. The candidate is
    /// fetched fresh from the data source on every call; nothing is cached
    /// across replacements.
    pub async fn plan_replacement(
        &self,
        txid: &str,
        new_rate: f64,
        custom_outputs: Option<Vec<Payment>>,
    ) -> Result<Replacement, WalletError> {
        let original = self
            .provider
            .get_tx(txid)
            .await?
            .ok_or_else(|| WalletError::TransactionNotFound(txid.to_owned()))?;

        if original.status.confirmed {
            return Err(WalletError::AlreadyConfirmed(txid.to_owned()));
        }

        // Same prevout references, annotated with the recorded spent-output
        // data. A coinbase or prevout-less input surfaces as MissingScript
        // from the assembler.
        let inputs: Vec<Utxo> = original
            .vin
            .iter()
            .map(|vin| {
                let mut utxo = Utxo::new(vin.txid.clone(), vin.vout, 0, false);
                if let Some(prevout) = &vin.prevout {
                    utxo.value = prevout.value;
                    utxo.script_pubkey = Some(prevout.scriptpubkey.clone());
                }
                utxo
            })
            .collect();

        let outputs: Vec<Payment> = match custom_outputs {
            Some(outputs) => outputs,
            None => original
                .vout
                .iter()
                .filter_map(|out| {
                    out.scriptpubkey_address
                        .as_ref()
                        .map(|addr| Payment::new(addr.clone(), out.value))
                })
                .collect(),
        };

        let new_vsize = fees::estimate_vsize(inputs.len(), outputs.len());
        // Raw product, not ceiled: the sufficiency comparison below uses the
        // exact value, while the fee actually baked into the artifact is
        // rounded inside the builder.
        let new_fee = new_vsize as f64 * new_rate;

        let min_fee = fees::minimum_replacement_fee(original.fee, original.size, new_vsize);
        if new_fee < min_fee as f64 {
            return Err(WalletError::FeeTooLow {
                minimum_fee: min_fee,
                minimum_rate: fees::fee_rate_ceil(min_fee, new_vsize),
            });
        }

        let total_input: u64 = inputs.iter().map(|utxo| utxo.value).sum();
        let outputs = adjust_outputs_for_fee(outputs, new_fee, total_input)?;

        let tx = TxBuilder::new()
            .extend_inputs(inputs)
            .extend_outputs(outputs)
            .fee_rate(new_rate)
            .rbf(true)
            .build()?;

        Ok(Replacement {
            tx,
            fee: new_fee.ceil() as u64,
            fee_rate: new_rate,
        })
    }

    /// A suggested bump for `txid`, pairing its observed rate with the data
    /// source's next-block quote.
    pub async fn recommended_fee_bump(&self, txid: &str) -> Result<FeeBump, WalletError> {
        let tx = self
            .provider
            .get_tx(txid)
            .await?
            .ok_or_else(|| WalletError::TransactionNotFound(txid.to_owned()))?;
        let quotes = self.provider.recommended_fees().await?;

        // The index never reports a zero weight; guard the division anyway.
        let vsize = tx.vsize().max(1);
        Ok(FeeBump {
            current_fee: tx.fee,
            current_fee_rate: fees::fee_rate_display(tx.fee, vsize),
            recommended_fee: fees::fee_for(vsize, quotes.fastest_fee),
            recommended_fee_rate: quotes.fastest_fee,
        })
    }
}

/// Shift a fee increase onto the single largest output (first wins on ties).
/// Outputs are returned untouched when the implied fee already covers
/// `new_fee`. Fails rather than pushing the reduced output below the dust
/// limit or redistributing the shortfall.
fn adjust_outputs_for_fee(
    outputs: Vec<Payment>,
    new_fee: f64,
    total_input: u64,
) -> Result<Vec<Payment>, WalletError> {
    let total_output: u64 = outputs.iter().map(|out| out.value).sum();
    let current_fee = total_input.saturating_sub(total_output);
    let fee_increase = new_fee - current_fee as f64;
    if fee_increase <= 0.0 {
        return Ok(outputs);
    }
    let fee_increase = fee_increase.ceil() as u64;

    let largest = outputs
        .iter()
        .enumerate()
        .max_by(|(ai, a), (bi, b)| a.value.cmp(&b.value).then(bi.cmp(ai)))
        .map(|(i, _)| i)
        .ok_or(TxError::NoOutputs)?;

    let new_value = outputs[largest].value.saturating_sub(fee_increase);
    if new_value < DUST_LIMIT {
        return Err(TxError::DustOutput { value: new_value }.into());
    }

    let mut adjusted = outputs;
    adjusted[largest].value = new_value;
    Ok(adjusted)
}
