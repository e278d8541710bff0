//! Proof-of-work: the predicate linking consecutive proofs and the search for it.

use log::debug;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use super::DEFAULT_DIFFICULTY;
use crate::error::MiningError;

/// Difficulty policy and search limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProofOfWork {
    /// Leading zero hex characters required in the digest.
    pub difficulty: u32,
    /// Give up after this many candidates (`None` searches until cancelled).
    pub max_attempts: Option<u64>,
}

impl Default for ProofOfWork {
    fn default() -> Self {
        Self {
            difficulty: DEFAULT_DIFFICULTY,
            max_attempts: None,
        }
    }
}

/// Shared stop flag polled by a running search.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Whether both handles control the same search.
    pub fn same_as(&self, other: &CancelToken) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl ProofOfWork {
    pub fn new(difficulty: u32) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u64) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    /// `sha256("{last_proof}{proof}")` must start with `difficulty` zeros (hex).
    pub fn valid_proof(&self, last_proof: u64, proof: u64) -> bool {
        let guess = format!("{last_proof}{proof}");
        let digest = hex::encode(Sha256::digest(guess.as_bytes()));
        digest
            .chars()
            .take(self.difficulty as usize)
            .all(|c| c == '0')
            && digest.len() >= self.difficulty as usize
    }

    /// Smallest non-negative proof valid after `last_proof`.
    pub fn find_proof(&self, last_proof: u64, cancel: &CancelToken) -> Result<u64, MiningError> {
        let mut proof = 0u64;
        loop {
            if cancel.is_cancelled() {
                return Err(MiningError::Cancelled { attempts: proof });
            }
            if self.max_attempts.is_some_and(|max| proof >= max) {
                return Err(MiningError::AttemptsExhausted { attempts: proof });
            }
            if self.valid_proof(last_proof, proof) {
                debug!(
                    "POW - proof {} found after {} attempts (last_proof={}, difficulty={})",
                    proof,
                    proof + 1,
                    last_proof,
                    self.difficulty
                );
                return Ok(proof);
            }
            proof += 1;
        }
    }
}
