//! Core types and arithmetic for building Bitcoin transactions from a set of
//! user-selected UTXOs.
//!
//! This crate is entirely pure: it performs no I/O and holds no global state.
//! The [`builder::TxBuilder`] turns selected [`types::Utxo`]s and requested
//! [`types::Payment`]s into an [`types::UnsignedTx`], verifying fee
//! sufficiency and dust rules along the way. The [`fees`] module contains the
//! size and fee-rate arithmetic shared with the RBF planner.

pub mod builder;
pub mod fees;
pub mod types;

mod error;

pub use builder::TxBuilder;
pub use error::TxError;
pub use types::{
    format_btc, format_sats, Network, Payment, PlannedInput, UnsignedTx, Utxo, DUST_LIMIT,
    FINAL_SEQUENCE, RBF_SEQUENCE,
};
