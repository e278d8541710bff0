use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// `previous_hash` of the genesis block. Not a hex digest, so it can never
/// collide with the hash of a real block.
pub const GENESIS_PREVIOUS_HASH: &str = "1";

/// Proof carried by the genesis block; seeds the first search.
pub const GENESIS_PROOF: u64 = 100;

/// A single block in the chain.
///
/// Fields are declared in lexicographic order so that serde's output is the
/// canonical encoding hashed by [`Block::hash`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub proof: u64,
    pub timestamp: f64, // seconds since the Unix epoch (UTC)
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// Build a block stamped with the current time.
    pub fn new(
        index: u64,
        transactions: Vec<Transaction>,
        proof: u64,
        previous_hash: String,
    ) -> Self {
        Self {
            index,
            previous_hash,
            proof,
            timestamp: now_secs(),
            transactions,
        }
    }

    /// SHA-256 of the block's canonical JSON encoding, lowercase hex.
    ///
    /// Equal content (transaction order included) always yields an equal digest.
    pub fn hash(&self) -> String {
        let canonical = serde_json::to_vec(self).expect("block serialization is infallible");
        let mut hasher = Sha256::new();
        hasher.update(&canonical);
        hex::encode(hasher.finalize())
    }

    pub fn is_genesis(&self) -> bool {
        self.index == 1 && self.previous_hash == GENESIS_PREVIOUS_HASH
    }
}

fn now_secs() -> f64 {
    Utc::now().timestamp_micros() as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use super::{Block, GENESIS_PREVIOUS_HASH};
    use crate::transaction::Transaction;

    fn sample() -> Block {
        Block {
            index: 2,
            previous_hash: "abc".into(),
            proof: 35293,
            timestamp: 1_700_000_000.25,
            transactions: vec![
                Transaction::new("A", "B", 10),
                Transaction::new("0", "node", 1),
            ],
        }
    }

    #[test]
    fn canonical_encoding_sorts_keys() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            concat!(
                r#"{"index":2,"previous_hash":"abc","proof":35293,"timestamp":1700000000.25,"#,
                r#""transactions":[{"amount":10,"recipient":"B","sender":"A"},"#,
                r#"{"amount":1,"recipient":"node","sender":"0"}]}"#
            )
        );
    }

    #[test]
    fn hash_is_deterministic_lowercase_hex() {
        let a = sample();
        let b = sample();
        assert_eq!(a.hash(), b.hash());
        assert_eq!(a.hash().len(), 64);
        assert!(a.hash().chars().all(|c| matches!(c, '0'..='9' | 'a'..='f')));
    }

    #[test]
    fn hash_changes_with_content() {
        let base = sample();

        let mut reordered = sample();
        reordered.transactions.reverse();
        assert_ne!(base.hash(), reordered.hash());

        let mut other_proof = sample();
        other_proof.proof += 1;
        assert_ne!(base.hash(), other_proof.hash());

        let mut other_amount = sample();
        other_amount.transactions[0].amount = 11;
        assert_ne!(base.hash(), other_amount.hash());
    }

    #[test]
    fn genesis_sentinel_is_not_a_digest() {
        assert_ne!(GENESIS_PREVIOUS_HASH.len(), sample().hash().len());
    }
}
