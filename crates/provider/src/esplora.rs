//! HTTP implementation of [`BtcProvider`] against mempool.space-compatible
//! endpoints.

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use utxo_tx::{Network, Utxo};

use crate::{
    provider::{BtcProvider, ProviderError},
    types::{AddressUtxo, FeeEstimates, Transaction},
};

static MAINNET_API: &str = "https://mempool.space/api";
static TESTNET_API: &str = "https://mempool.space/testnet4/api";

/// A provider backed by the mempool.space REST API (or any esplora-compatible
/// instance via [`MempoolProvider::with_api_root`]).
#[derive(Debug, Clone)]
pub struct MempoolProvider {
    api_root: String,
    client: reqwest::Client,
}

impl MempoolProvider {
    /// Instantiate against the public endpoint for `network`.
    pub fn new(network: Network) -> Self {
        let root = match network {
            Network::Mainnet => MAINNET_API,
            Network::Testnet => TESTNET_API,
        };
        Self::with_api_root(root)
    }

    /// Instantiate against a specific API root, e.g. a self-hosted instance.
    pub fn with_api_root(api_root: &str) -> Self {
        Self {
            api_root: api_root.trim_end_matches('/').to_owned(),
            client: reqwest::Client::new(),
        }
    }

    /// The API root this provider talks to.
    pub fn api_root(&self) -> &str {
        &self.api_root
    }

    async fn fetch_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.api_root, path);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(serde_json::from_str(&text)?)
    }

    async fn fetch_string(&self, path: &str) -> Result<Option<String>, ProviderError> {
        let url = format!("{}{}", self.api_root, path);
        let res = self.client.get(&url).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(Some(text))
    }
}

#[async_trait]
impl BtcProvider for MempoolProvider {
    async fn get_tx(&self, txid: &str) -> Result<Option<Transaction>, ProviderError> {
        match self.fetch_string(&format!("/tx/{txid}")).await? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    async fn get_address_utxos(&self, address: &str) -> Result<Vec<Utxo>, ProviderError> {
        let rows: Vec<AddressUtxo> = self.fetch_json(&format!("/address/{address}/utxo")).await?;

        let mut utxos = Vec::with_capacity(rows.len());
        for row in rows {
            let mut utxo: Utxo = row.into_utxo();
            if let Ok(Some(tx)) = self.get_tx(&utxo.txid).await {
                if let Some(out) = tx.vout.get(utxo.vout as usize) {
                    utxo.script_pubkey = Some(out.scriptpubkey.clone());
                }
            }
            utxos.push(utxo);
        }
        Ok(utxos)
    }

    async fn recommended_fees(&self) -> Result<FeeEstimates, ProviderError> {
        self.fetch_json("/v1/fees/recommended").await
    }

    async fn broadcast(&self, tx_hex: &str) -> Result<String, ProviderError> {
        let url = format!("{}/tx", self.api_root);
        let res = self.client.post(&url).body(tx_hex.to_owned()).send().await?;
        let status = res.status();
        let text = res.text().await?;
        if !status.is_success() {
            return Err(ProviderError::Api {
                status: status.as_u16(),
                message: text,
            });
        }
        Ok(text.trim().to_owned())
    }

    async fn tip_height(&self) -> Result<u64, ProviderError> {
        let body = self
            .fetch_string("/blocks/tip/height")
            .await?
            .unwrap_or_default();
        body.trim().parse().map_err(|_| ProviderError::Api {
            status: 200,
            message: format!("unparseable tip height: {body}"),
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn it_selects_the_api_root_by_network() {
        assert_eq!(
            MempoolProvider::new(Network::Mainnet).api_root(),
            "https://mempool.space/api"
        );
        assert_eq!(
            MempoolProvider::new(Network::Testnet).api_root(),
            "https://mempool.space/testnet4/api"
        );
        assert_eq!(
            MempoolProvider::with_api_root("http://localhost:3000/api/").api_root(),
            "http://localhost:3000/api"
        );
    }
}
