pub mod client;
pub mod registry;

pub use client::{ChainSnapshot, HttpPeerClient, PeerClient};
pub use registry::{NodeRegistry, parse_node_address};
