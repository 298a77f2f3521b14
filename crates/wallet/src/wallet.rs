//! The end-to-end build workflow: validate the user's selection, assemble,
//! encode, sign, broadcast.
//!
//! Everything before the broadcast is pure local computation; a failure at
//! any step discards the attempt at zero cost and nothing is retried. Each
//! invocation is one strictly sequential pipeline.

use utxo_provider::BtcProvider;
use utxo_tx::{fees, Network, Payment, TxBuilder, TxError, Utxo, DUST_LIMIT};

use crate::{
    error::WalletError,
    rbf::RbfPlanner,
    signer::{Broadcaster, Signer},
};

/// The build workflow over an injected data source.
#[derive(Debug, Clone, Copy)]
pub struct Wallet<'a, P> {
    provider: &'a P,
    network: Network,
}

impl<'a, P: BtcProvider> Wallet<'a, P> {
    /// A wallet workflow talking to `provider` for `network`.
    pub fn new(provider: &'a P, network: Network) -> Self {
        Self { provider, network }
    }

    /// The active network.
    pub fn network(&self) -> Network {
        self.network
    }

    /// Pre-flight validation of a selection, run before assembly so the
    /// caller gets a specific failure rather than a generic one: empty
    /// selections, zero-value or dust payments, undecodable destinations for
    /// the active network, non-positive rates, and an optimistic funds check
    /// carrying the exact shortfall.
    pub fn validate_selection(
        &self,
        inputs: &[Utxo],
        payments: &[Payment],
        fee_rate: f64,
    ) -> Result<(), WalletError> {
        if inputs.is_empty() {
            return Err(TxError::NoInputs.into());
        }
        if payments.is_empty() {
            return Err(TxError::NoOutputs.into());
        }
        if !(fee_rate > 0.0) {
            return Err(TxError::InvalidFeeRate(fee_rate).into());
        }
        for payment in payments {
            if payment.value < DUST_LIMIT {
                return Err(TxError::DustOutput {
                    value: payment.value,
                }
                .into());
            }
            utxo_psbt::decode_address(&payment.address, self.network)?;
        }

        let vsize = fees::estimate_vsize(inputs.len(), payments.len());
        let fee = fees::fee_for(vsize, fee_rate);
        let total_input: u64 = inputs.iter().map(|utxo| utxo.value).sum();
        let total_output: u64 = payments.iter().map(|payment| payment.value).sum();
        let required = total_output + fee;
        if total_input < required {
            return Err(TxError::InsufficientFunds {
                total_input,
                required,
                shortfall: required - total_input,
            }
            .into());
        }
        Ok(())
    }

    /// Build a transaction spending `inputs` into `payments` at `fee_rate`,
    /// have `signer` sign it, and broadcast it. Resolves to the broadcast
    /// txid. Signer and broadcaster failures propagate with their original
    /// message; no external state has changed until the broadcast succeeds.
    pub async fn send(
        &self,
        signer: &dyn Signer,
        broadcaster: &dyn Broadcaster,
        inputs: Vec<Utxo>,
        payments: Vec<Payment>,
        fee_rate: f64,
        rbf: bool,
    ) -> Result<String, WalletError> {
        self.validate_selection(&inputs, &payments, fee_rate)?;

        let tx = TxBuilder::new()
            .extend_inputs(inputs)
            .extend_outputs(payments)
            .fee_rate(fee_rate)
            .rbf(rbf)
            .build()?;
        let psbt_hex = utxo_psbt::encode_psbt_hex(&tx, self.network)?;

        let signed = signer.sign_psbt(&psbt_hex).await?;
        broadcaster.push_transaction(&signed).await
    }

    /// Replace the pending transaction `txid` with a higher-fee version and
    /// broadcast it. Outputs default to the original's unless
    /// `custom_outputs` is supplied.
    pub async fn bump_fee(
        &self,
        signer: &dyn Signer,
        broadcaster: &dyn Broadcaster,
        txid: &str,
        new_rate: f64,
        custom_outputs: Option<Vec<Payment>>,
    ) -> Result<String, WalletError> {
        let replacement = RbfPlanner::new(self.provider)
            .plan_replacement(txid, new_rate, custom_outputs)
            .await?;
        let psbt_hex = utxo_psbt::encode_psbt_hex(&replacement.tx, self.network)?;

        let signed = signer.sign_psbt(&psbt_hex).await?;
        broadcaster.push_transaction(&signed).await
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mock::{
        mempool_tx, MockBroadcaster, MockProvider, MockSigner, ADDR_1, ADDR_2, TXID_1, TXID_2,
    };

    const SCRIPT: &str = "0014751e76e8199196d454941c45d1b3a323f1433bd6";

    fn selection() -> (Vec<Utxo>, Vec<Payment>) {
        (
            vec![Utxo::with_script(TXID_1, 0, 100_000, SCRIPT)],
            vec![Payment::new(ADDR_1, 50_000)],
        )
    }

    #[tokio::test]
    async fn it_sends_a_validated_selection_end_to_end() {
        let provider = MockProvider::default();
        let wallet = Wallet::new(&provider, Network::Mainnet);
        let signer = MockSigner { refuse: None };
        let broadcaster = MockBroadcaster::default();
        let (inputs, payments) = selection();

        let txid = wallet
            .send(&signer, &broadcaster, inputs, payments, 5.0, true)
            .await
            .unwrap();

        assert_eq!(txid, TXID_2);
        let pushed = broadcaster.pushed.lock().unwrap();
        // the broadcaster received the signer's output, which wraps the PSBT
        assert_eq!(pushed.len(), 1);
        assert!(pushed[0].starts_with("deadbeef70736274ff"));
    }

    #[tokio::test]
    async fn it_validates_before_touching_the_signer() {
        let provider = MockProvider::default();
        let wallet = Wallet::new(&provider, Network::Mainnet);
        let (inputs, payments) = selection();

        assert!(matches!(
            wallet.validate_selection(&[], &payments, 5.0),
            Err(WalletError::Tx(TxError::NoInputs))
        ));
        assert!(matches!(
            wallet.validate_selection(&inputs, &[], 5.0),
            Err(WalletError::Tx(TxError::NoOutputs))
        ));
        assert!(matches!(
            wallet.validate_selection(&inputs, &payments, -1.0),
            Err(WalletError::Tx(TxError::InvalidFeeRate(_)))
        ));

        // mainnet destination rejected on testnet
        let testnet = Wallet::new(&provider, Network::Testnet);
        assert!(matches!(
            testnet.validate_selection(&inputs, &payments, 5.0),
            Err(WalletError::Psbt(_))
        ));

        // optimistic pre-check surfaces the exact shortfall
        let rich = vec![Payment::new(ADDR_1, 99_600)];
        match wallet.validate_selection(&inputs, &rich, 5.0) {
            Err(WalletError::Tx(TxError::InsufficientFunds { shortfall, .. })) => {
                assert_eq!(shortfall, 155)
            }
            other => panic!("expected InsufficientFunds, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn it_propagates_signer_and_broadcaster_failures_verbatim() {
        let provider = MockProvider::default();
        let wallet = Wallet::new(&provider, Network::Mainnet);
        let broadcaster = MockBroadcaster::default();

        let refusing = MockSigner {
            refuse: Some("User rejected the request".to_owned()),
        };
        let (inputs, payments) = selection();
        let err = wallet
            .send(&refusing, &broadcaster, inputs, payments, 5.0, true)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Signer error: User rejected the request");
        assert!(broadcaster.pushed.lock().unwrap().is_empty());

        let signer = MockSigner { refuse: None };
        let failing = MockBroadcaster {
            refuse: Some("sendrawtransaction RPC error: txn-mempool-conflict".to_owned()),
            ..Default::default()
        };
        let (inputs, payments) = selection();
        let err = wallet
            .send(&signer, &failing, inputs, payments, 5.0, true)
            .await
            .unwrap_err();
        assert!(err.to_string().contains("txn-mempool-conflict"));
    }

    #[tokio::test]
    async fn it_bumps_a_pending_transaction() {
        let pending = mempool_tx(TXID_1, false, vec![(TXID_2, 0, 40_000)], vec![
            (Some(ADDR_2), 30_000),
            (Some(ADDR_1), 8_000),
        ]);
        let provider = MockProvider::with_tx(pending);
        let wallet = Wallet::new(&provider, Network::Mainnet);
        let signer = MockSigner { refuse: None };
        let broadcaster = MockBroadcaster::default();

        let txid = wallet
            .bump_fee(&signer, &broadcaster, TXID_1, 30.0, None)
            .await
            .unwrap();
        assert_eq!(txid, TXID_2);
        assert_eq!(broadcaster.pushed.lock().unwrap().len(), 1);
    }
}
