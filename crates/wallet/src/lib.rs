//! Transaction build and fee-bump workflows.
//!
//! [`Wallet`] validates a user's UTXO selection, assembles an unsigned
//! transaction, encodes it as a PSBT, and hands it to an abstract [`Signer`]
//! and [`Broadcaster`]. [`RbfPlanner`] derives BIP-125 replacement
//! transactions for unconfirmed payments. Both take their data source and
//! capabilities as explicit, injected dependencies so tests can substitute
//! in-memory doubles.

pub mod rbf;
pub mod signer;
pub mod wallet;

mod error;

#[cfg(test)]
mod mock;

pub use error::WalletError;
pub use rbf::{FeeBump, RbfPlanner, Replacement};
pub use signer::{Broadcaster, ProviderBroadcaster, Signer};
pub use wallet::Wallet;
