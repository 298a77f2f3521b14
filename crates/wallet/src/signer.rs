//! Capability traits for the external wallet extension.
//!
//! The workflow never depends on a concrete wallet integration; any adapter
//! exposing these two capabilities can sign and broadcast. Adapters wrap
//! their native failures as [`WalletError::Signer`] / [`WalletError::Broadcast`]
//! with the original message intact.

use async_trait::async_trait;

use utxo_provider::BtcProvider;

use crate::error::WalletError;

/// Signs a PSBT-encoded artifact, returning the signed encoding.
#[async_trait]
pub trait Signer: Sync + Send {
    /// Sign the hex-encoded PSBT. The returned string is whatever the wallet
    /// hands back: a signed PSBT or a finalized raw transaction, hex-encoded.
    async fn sign_psbt(&self, psbt_hex: &str) -> Result<String, WalletError>;
}

/// Broadcasts a signed transaction, returning the confirmation txid.
#[async_trait]
pub trait Broadcaster: Sync + Send {
    /// Push the hex-encoded signed transaction to the network.
    async fn push_transaction(&self, tx_hex: &str) -> Result<String, WalletError>;
}

/// A [`Broadcaster`] that pushes through the blockchain-index data source,
/// for wallets that can sign but not broadcast.
pub struct ProviderBroadcaster<'a, P> {
    provider: &'a P,
}

impl<'a, P: BtcProvider> ProviderBroadcaster<'a, P> {
    /// Broadcast through `provider`.
    pub fn new(provider: &'a P) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl<P: BtcProvider> Broadcaster for ProviderBroadcaster<'_, P> {
    async fn push_transaction(&self, tx_hex: &str) -> Result<String, WalletError> {
        Ok(self.provider.broadcast(tx_hex).await?)
    }
}
