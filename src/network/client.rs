use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::blockchain::Block;
use crate::error::TransportError;

/// Largest `/chain` body accepted from a peer.
const MAX_CHAIN_BODY_BYTES: usize = 32 * 1024 * 1024;

/// A node's view of its chain, as served on `GET /chain`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

impl ChainSnapshot {
    pub fn new(chain: Vec<Block>) -> Self {
        let length = chain.len();
        Self { chain, length }
    }
}

/// Transport used by conflict resolution to read a peer's chain.
///
/// Implementations make a single attempt; the resolver applies its own
/// timeout and never retries within one pass.
#[async_trait(?Send)]
pub trait PeerClient {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot, TransportError>;
}

/// Fetches `http://{address}/chain` with `awc`.
pub struct HttpPeerClient {
    client: awc::Client,
}

impl HttpPeerClient {
    pub fn new(timeout: Duration) -> Self {
        let client = awc::Client::builder().timeout(timeout).finish();
        Self { client }
    }
}

#[async_trait(?Send)]
impl PeerClient for HttpPeerClient {
    async fn fetch_chain(&self, address: &str) -> Result<ChainSnapshot, TransportError> {
        let url = format!("http://{address}/chain");
        let mut response = self.client.get(&url).send().await.map_err(|e| match e {
            awc::error::SendRequestError::Timeout => TransportError::Timeout {
                address: address.to_string(),
            },
            other => TransportError::Request {
                address: address.to_string(),
                reason: other.to_string(),
            },
        })?;

        if !response.status().is_success() {
            return Err(TransportError::Status {
                address: address.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .json::<ChainSnapshot>()
            .limit(MAX_CHAIN_BODY_BYTES)
            .await
            .map_err(|e| TransportError::Decode {
                address: address.to_string(),
                reason: e.to_string(),
            })
    }
}
