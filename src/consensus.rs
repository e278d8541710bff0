//! Longest-valid-chain conflict resolution.

use futures_util::stream::{self, StreamExt};
use log::{debug, info, warn};
use std::time::Duration;

use crate::blockchain::{Block, ProofOfWork, check_structure, validate_chain};
use crate::error::TransportError;
use crate::ledger::Ledger;
use crate::network::{ChainSnapshot, PeerClient};

/// Query every registered peer and adopt the longest valid chain that is
/// strictly longer than the local one. Returns whether the chain was replaced.
///
/// Peers are fetched concurrently (at most `peer_concurrency` at a time), each
/// bounded by `peer_timeout`. Unreachable peers, timeouts, malformed answers
/// and invalid chains are skipped; none of them aborts the pass. Candidates
/// are compared in address order, so the outcome does not depend on which
/// peer answers first.
pub async fn resolve_conflicts<C>(ledger: &Ledger, client: &C) -> bool
where
    C: PeerClient + ?Sized,
{
    let peers = ledger.nodes();
    if peers.is_empty() {
        debug!("CONSENSUS - no peers registered");
        return false;
    }

    let config = ledger.config();
    let timeout = config.peer_timeout;
    let mut fetched: Vec<(String, Result<ChainSnapshot, TransportError>)> = stream::iter(peers)
        .map(move |address| async move {
            let result = fetch_snapshot(client, &address, timeout).await;
            (address, result)
        })
        .buffer_unordered(config.peer_concurrency.max(1))
        .collect()
        .await;
    fetched.sort_by(|a, b| a.0.cmp(&b.0));

    let local_length = ledger.len();
    let Some((address, chain)) = select_longest_valid(local_length, fetched, &config.pow) else {
        info!("CONSENSUS - local chain (length={}) is authoritative", local_length);
        return false;
    };

    let length = chain.len();
    if ledger.adopt_if_longer(chain) {
        info!(
            "CONSENSUS - replaced local chain with {} blocks from {}",
            length, address
        );
        true
    } else {
        warn!(
            "CONSENSUS - chain from {} no longer longer than local; keeping local",
            address
        );
        false
    }
}

async fn fetch_snapshot<C>(
    client: &C,
    address: &str,
    timeout: Duration,
) -> Result<ChainSnapshot, TransportError>
where
    C: PeerClient + ?Sized,
{
    let snapshot = tokio::time::timeout(timeout, client.fetch_chain(address))
        .await
        .map_err(|_| TransportError::Timeout {
            address: address.to_string(),
        })??;

    if snapshot.length != snapshot.chain.len() {
        return Err(TransportError::LengthMismatch {
            address: address.to_string(),
            reported: snapshot.length,
            actual: snapshot.chain.len(),
        });
    }
    Ok(snapshot)
}

/// Pick the first snapshot that is strictly longer than everything seen so
/// far, starts at genesis with consecutive indices, and passes validation.
fn select_longest_valid<I>(
    local_length: usize,
    fetched: I,
    pow: &ProofOfWork,
) -> Option<(String, Vec<Block>)>
where
    I: IntoIterator<Item = (String, Result<ChainSnapshot, TransportError>)>,
{
    let mut best_length = local_length;
    let mut best = None;

    for (address, result) in fetched {
        let snapshot = match result {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("CONSENSUS - skipping peer: {}", e);
                continue;
            }
        };
        if snapshot.length <= best_length {
            debug!(
                "CONSENSUS - {} has length {} (best so far {}); ignoring",
                address, snapshot.length, best_length
            );
            continue;
        }
        if let Err(reason) = check_structure(&snapshot.chain)
            .and_then(|()| validate_chain(&snapshot.chain, pow))
        {
            warn!("CONSENSUS - discarding chain from {}: {}", address, reason);
            continue;
        }
        best_length = snapshot.length;
        best = Some((address, snapshot.chain));
    }

    best
}
