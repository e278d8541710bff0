//! Error types shared across the ledger.

use thiserror::Error;

/// Failures of ledger operations exposed to the adapter layer.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Only reachable if the chain is queried before genesis exists.
    #[error("chain is empty: genesis block missing")]
    EmptyChain,

    #[error(transparent)]
    Mining(#[from] MiningError),

    #[error("chain tip moved while mining; proof is stale")]
    StaleTip,
}

/// Why a proof search stopped without a result.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MiningError {
    #[error("mining cancelled after {attempts} attempts")]
    Cancelled { attempts: u64 },

    #[error("no valid proof found within {attempts} attempts")]
    AttemptsExhausted { attempts: u64 },
}

/// First defect found while checking a candidate chain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidChain {
    #[error("block #{index} does not reference the hash of its predecessor")]
    BrokenLink { index: u64 },

    #[error("block #{index} carries a proof that fails the difficulty check")]
    InvalidProof { index: u64 },

    #[error("chain does not start with a genesis block")]
    MissingGenesis,

    #[error("block at position {position} has index {found}, expected {expected}")]
    IndexGap {
        position: usize,
        expected: u64,
        found: u64,
    },
}

/// Failure to obtain a usable chain snapshot from a peer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("request to {address} failed: {reason}")]
    Request { address: String, reason: String },

    #[error("{address} answered with status {status}")]
    Status { address: String, status: u16 },

    #[error("{address} did not answer in time")]
    Timeout { address: String },

    #[error("{address} sent an unreadable body: {reason}")]
    Decode { address: String, reason: String },

    #[error("{address} reported length {reported} but sent {actual} blocks")]
    LengthMismatch {
        address: String,
        reported: usize,
        actual: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddressError {
    #[error("node address is empty")]
    Empty,

    #[error("node address {address:?} is malformed: {reason}")]
    Malformed { address: String, reason: String },

    #[error("node address {0:?} has no host")]
    MissingHost(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name}={value:?} is not a valid value: {reason}")]
    Invalid {
        name: &'static str,
        value: String,
        reason: String,
    },
}
