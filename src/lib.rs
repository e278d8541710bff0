//! A minimal proof-of-work ledger node: an append-only hash-linked chain,
//! a pending transaction pool, a peer registry and longest-valid-chain
//! conflict resolution, exposed over HTTP.

pub mod api;
pub mod blockchain;
pub mod config;
pub mod consensus;
pub mod error;
pub mod ledger;
pub mod network;
pub mod transaction;

pub use ledger::{Ledger, LedgerConfig};
