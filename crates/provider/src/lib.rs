//! Async client for an esplora-style blockchain index (mempool.space and
//! compatible instances).
//!
//! The [`BtcProvider`] trait is the seam the transaction workflow depends on;
//! [`MempoolProvider`] is the HTTP implementation. Tests substitute in-memory
//! providers behind the same trait.

pub mod esplora;
pub mod types;

mod provider;

pub use esplora::MempoolProvider;
pub use provider::{BtcProvider, ProviderError};
pub use types::{FeeEstimates, Prevout, Transaction, TxStatus, Vin};
