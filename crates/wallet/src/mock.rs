//! In-memory doubles for the data source, signer, and broadcaster.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use utxo_provider::{BtcProvider, FeeEstimates, Prevout, ProviderError, Transaction, TxStatus, Vin};
use utxo_tx::Utxo;

use crate::{error::WalletError, signer::Broadcaster, signer::Signer};

pub const TXID_1: &str = "f301ba00687eea6b8d7c5a69e773f1e2f09f41f31ca5d5e6b1b08dc3f7de3d73";
pub const TXID_2: &str = "4e62eb9d0f2cbcd9e1a9b2b1a3a2b9f67c4d4de1e8c2c55f2f1c1d1e1f202122";
pub const ADDR_1: &str = "bc1qw508d6qejxtdg4y5r3zarvary0c5xw7kv8f3t4";
pub const ADDR_2: &str = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

const SCRIPT: &str = "0014751e76e8199196d454941c45d1b3a323f1433bd6";

/// Build an index-style transaction record. The fee is derived from the
/// prevout/output values, the size and weight from a plausible 1-in shape;
/// tests override fields where the exact value matters.
pub fn mempool_tx(
    txid: &str,
    confirmed: bool,
    inputs: Vec<(&str, u32, u64)>,
    outputs: Vec<(Option<&str>, u64)>,
) -> Transaction {
    let vin: Vec<Vin> = inputs
        .into_iter()
        .map(|(txid, vout, value)| Vin {
            txid: txid.to_owned(),
            vout,
            prevout: Some(Prevout {
                scriptpubkey: SCRIPT.to_owned(),
                scriptpubkey_address: Some(ADDR_1.to_owned()),
                value,
            }),
            sequence: 0xfffffffd,
            is_coinbase: false,
        })
        .collect();
    let vout: Vec<Prevout> = outputs
        .into_iter()
        .map(|(addr, value)| Prevout {
            scriptpubkey: SCRIPT.to_owned(),
            scriptpubkey_address: addr.map(str::to_owned),
            value,
        })
        .collect();

    let total_in: u64 = vin.iter().filter_map(|v| v.prevout.as_ref()).map(|p| p.value).sum();
    let total_out: u64 = vout.iter().map(|o| o.value).sum();

    Transaction {
        txid: txid.to_owned(),
        version: 2,
        locktime: 0,
        vin,
        vout,
        size: 200,
        weight: 561,
        fee: total_in.saturating_sub(total_out),
        status: TxStatus {
            confirmed,
            ..Default::default()
        },
    }
}

/// A provider serving canned transactions and quotes.
#[derive(Default)]
pub struct MockProvider {
    pub txs: HashMap<String, Transaction>,
    pub utxos: Vec<Utxo>,
    pub broadcasts: Mutex<Vec<String>>,
}

impl MockProvider {
    pub fn with_tx(tx: Transaction) -> Self {
        let mut provider = Self::default();
        provider.txs.insert(tx.txid.clone(), tx);
        provider
    }
}

#[async_trait]
impl BtcProvider for MockProvider {
    async fn get_tx(&self, txid: &str) -> Result<Option<Transaction>, ProviderError> {
        Ok(self.txs.get(txid).cloned())
    }

    async fn get_address_utxos(&self, _address: &str) -> Result<Vec<Utxo>, ProviderError> {
        Ok(self.utxos.clone())
    }

    async fn recommended_fees(&self) -> Result<FeeEstimates, ProviderError> {
        Ok(FeeEstimates {
            fastest_fee: 20.0,
            half_hour_fee: 10.0,
            hour_fee: 5.0,
            economy_fee: 2.0,
            minimum_fee: 1.0,
        })
    }

    async fn broadcast(&self, tx_hex: &str) -> Result<String, ProviderError> {
        self.broadcasts.lock().unwrap().push(tx_hex.to_owned());
        Ok(TXID_1.to_owned())
    }

    async fn tip_height(&self) -> Result<u64, ProviderError> {
        Ok(100_000)
    }
}

/// A signer that prefixes the payload, or refuses with a fixed message.
pub struct MockSigner {
    pub refuse: Option<String>,
}

#[async_trait]
impl Signer for MockSigner {
    async fn sign_psbt(&self, psbt_hex: &str) -> Result<String, WalletError> {
        match &self.refuse {
            Some(message) => Err(WalletError::Signer(message.clone())),
            None => Ok(format!("deadbeef{psbt_hex}")),
        }
    }
}

/// A broadcaster that records what it was handed and echoes a fixed txid.
#[derive(Default)]
pub struct MockBroadcaster {
    pub pushed: Mutex<Vec<String>>,
    pub refuse: Option<String>,
}

#[async_trait]
impl Broadcaster for MockBroadcaster {
    async fn push_transaction(&self, tx_hex: &str) -> Result<String, WalletError> {
        if let Some(message) = &self.refuse {
            return Err(WalletError::Broadcast(message.clone()));
        }
        self.pushed.lock().unwrap().push(tx_hex.to_owned());
        Ok(TXID_2.to_owned())
    }
}
