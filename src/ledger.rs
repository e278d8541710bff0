//! The ledger context: one chain, one pending pool and one peer registry,
//! owned together and guarded for concurrent use.

use log::{debug, info, warn};
use parking_lot::{Mutex, RwLock};
use std::time::Duration;
use uuid::Uuid;

use crate::blockchain::{
    Block, Blockchain, CancelToken, MINING_REWARD, ProofOfWork, REWARD_SENDER,
};
use crate::consensus;
use crate::error::{AddressError, LedgerError};
use crate::network::{ChainSnapshot, NodeRegistry, PeerClient};
use crate::transaction::Transaction;

/// Default per-peer fetch timeout during conflict resolution.
pub const DEFAULT_PEER_TIMEOUT: Duration = Duration::from_secs(3);

/// Default number of peer fetches in flight at once.
pub const DEFAULT_PEER_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Recipient of mining rewards.
    pub node_id: String,
    pub pow: ProofOfWork,
    pub peer_timeout: Duration,
    pub peer_concurrency: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            node_id: new_node_id(),
            pow: ProofOfWork::default(),
            peer_timeout: DEFAULT_PEER_TIMEOUT,
            peer_concurrency: DEFAULT_PEER_CONCURRENCY,
        }
    }
}

/// Random node identifier: a v4 UUID without hyphens.
pub fn new_node_id() -> String {
    Uuid::new_v4().simple().to_string()
}

/// Chain mutation (append, replacement) happens under the write side of
/// `blockchain`, so a block is never appended to a chain mid-replacement.
/// Proof searches run without holding any lock.
pub struct Ledger {
    config: LedgerConfig,
    blockchain: RwLock<Blockchain>,
    nodes: RwLock<NodeRegistry>,
    mining: Mutex<Vec<CancelToken>>,
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

impl Ledger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            blockchain: RwLock::new(Blockchain::new()),
            nodes: RwLock::new(NodeRegistry::new()),
            mining: Mutex::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn node_id(&self) -> &str {
        &self.config.node_id
    }

    /// Queue a transaction; returns the index of the block that will hold it.
    pub fn add_transaction(
        &self,
        sender: &str,
        recipient: &str,
        amount: u64,
    ) -> Result<u64, LedgerError> {
        let mut bc = self.blockchain.write();
        let index = bc.add_transaction(sender, recipient, amount)?;
        debug!(
            "POOL - {} -> {} ({}) queued for block #{} (pending={})",
            sender,
            recipient,
            amount,
            index,
            bc.pending().len()
        );
        Ok(index)
    }

    pub fn pending_transactions(&self) -> Vec<Transaction> {
        self.blockchain.read().pending().to_vec()
    }

    /// Consistent copy of the current chain.
    pub fn chain(&self) -> ChainSnapshot {
        ChainSnapshot::new(self.blockchain.read().chain().to_vec())
    }

    pub fn len(&self) -> usize {
        self.blockchain.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blockchain.read().is_empty()
    }

    pub fn last_block(&self) -> Result<Block, LedgerError> {
        self.blockchain.read().last_block().cloned()
    }

    /// Seal the pending pool into a block with `proof`, unconditionally.
    pub fn append_block(
        &self,
        proof: u64,
        previous_hash: Option<String>,
    ) -> Result<Block, LedgerError> {
        self.blockchain
            .write()
            .append_block(proof, previous_hash)
            .cloned()
    }

    /// Search a proof on top of the current tip, then seal the pending pool
    /// plus the reward transaction into a new block.
    ///
    /// Blocks the calling thread for the whole search; run it on a worker.
    /// Fails with [`LedgerError::StaleTip`] if the tip changed during the
    /// search, and with a [`crate::error::MiningError`] if the search was
    /// cancelled or hit its attempt ceiling. Nothing is appended or queued
    /// on failure.
    pub fn mine(&self) -> Result<Block, LedgerError> {
        let token = CancelToken::new();
        self.mining.lock().push(token.clone());
        let result = self.mine_with(&token);
        self.mining.lock().retain(|t| !t.same_as(&token));
        result
    }

    fn mine_with(&self, token: &CancelToken) -> Result<Block, LedgerError> {
        let (last_proof, last_hash) = {
            let bc = self.blockchain.read();
            let last = bc.last_block()?;
            (last.proof, last.hash())
        };

        let proof = match self.config.pow.find_proof(last_proof, token) {
            Ok(proof) => proof,
            Err(e) => {
                warn!("MINER - {}", e);
                return Err(e.into());
            }
        };

        let mut bc = self.blockchain.write();
        if bc.last_block()?.hash() != last_hash {
            warn!("MINER - discarding proof {}: chain tip moved", proof);
            return Err(LedgerError::StaleTip);
        }
        bc.add_transaction(REWARD_SENDER, self.config.node_id.as_str(), MINING_REWARD)?;
        let block = bc.append_block(proof, Some(last_hash))?.clone();
        info!(
            "MINER - sealed block #{} (proof={}, txs={})",
            block.index,
            block.proof,
            block.transactions.len()
        );
        Ok(block)
    }

    /// Stop every running proof search. Returns whether any was running.
    pub fn cancel_mining(&self) -> bool {
        let running = self.mining.lock();
        for token in running.iter() {
            token.cancel();
        }
        !running.is_empty()
    }

    pub fn register_node(&self, address: &str) -> Result<String, AddressError> {
        let mut nodes = self.nodes.write();
        let location = nodes.register(address)?;
        debug!("NODES - registered {} (total={})", location, nodes.len());
        Ok(location)
    }

    pub fn nodes(&self) -> Vec<String> {
        self.nodes.read().iter().cloned().collect()
    }

    /// Replace the local chain with the longest valid chain among peers.
    /// Returns whether the chain was replaced.
    pub async fn resolve_conflicts<C>(&self, client: &C) -> bool
    where
        C: PeerClient + ?Sized,
    {
        consensus::resolve_conflicts(self, client).await
    }

    /// Adopt `chain` if it is still strictly longer than the local one.
    pub(crate) fn adopt_if_longer(&self, chain: Vec<Block>) -> bool {
        let mut bc = self.blockchain.write();
        if chain.len() <= bc.len() {
            return false;
        }
        bc.replace_chain(chain);
        true
    }
}
