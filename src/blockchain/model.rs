use log::debug;

use super::block::{GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
use super::Block;
use crate::error::LedgerError;
use crate::transaction::{Transaction, TransactionPool};

/// In-memory chain plus the pool of transactions waiting for the next block.
///
/// Not synchronized; [`crate::ledger::Ledger`] keeps it behind one lock so
/// appends and replacements never interleave.
#[derive(Debug, Clone)]
pub struct Blockchain {
    chain: Vec<Block>,
    pending: TransactionPool,
}

impl Default for Blockchain {
    fn default() -> Self {
        Self::new()
    }
}

impl Blockchain {
    /// Initialize a new blockchain with its genesis block.
    pub fn new() -> Self {
        let genesis = Block::new(
            1,
            Vec::new(),
            GENESIS_PROOF,
            GENESIS_PREVIOUS_HASH.to_string(),
        );
        Self {
            chain: vec![genesis],
            pending: TransactionPool::new(),
        }
    }

    /// Return the last block in the chain.
    pub fn last_block(&self) -> Result<&Block, LedgerError> {
        self.chain.last().ok_or(LedgerError::EmptyChain)
    }

    /// Seal the pending pool into a new block carrying `proof`.
    ///
    /// `previous_hash` defaults to the hash of the current last block.
    pub fn append_block(
        &mut self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<&Block, LedgerError> {
        let previous_hash = match previous_hash {
            Some(hash) => hash,
            None => self.last_block()?.hash(),
        };
        let index = self.chain.len() as u64 + 1;
        let block = Block::new(index, self.pending.drain(), proof, previous_hash);
        debug!(
            "CHAIN - appended block #{} ({} txs, proof={})",
            block.index,
            block.transactions.len(),
            block.proof
        );
        self.chain.push(block);
        self.last_block()
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn add_transaction(
        &mut self,
        sender: impl Into<String>,
        recipient: impl Into<String>,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        let next_index = self.last_block()?.index + 1;
        self.pending.push(Transaction::new(sender, recipient, amount));
        Ok(next_index)
    }

    /// Swap in a chain adopted from a peer. Pending transactions are kept.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.chain = chain;
    }

    pub fn chain(&self) -> &[Block] {
        &self.chain
    }

    pub fn pending(&self) -> &[Transaction] {
        self.pending.as_slice()
    }

    pub fn len(&self) -> usize {
        self.chain.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }
}
