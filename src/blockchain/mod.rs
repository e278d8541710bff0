pub mod block;
pub mod model;
pub mod pow;
pub mod validation;

pub use block::{Block, GENESIS_PREVIOUS_HASH, GENESIS_PROOF};
pub use model::Blockchain;
pub use pow::{CancelToken, ProofOfWork};
pub use validation::{check_structure, is_valid_chain, validate_chain};

/// Default Proof-of-Work difficulty (number of leading zeros).
pub const DEFAULT_DIFFICULTY: u32 = 4;

/// Sender recorded on the reward transaction of a mined block.
pub const REWARD_SENDER: &str = "0";

/// Amount credited to the miner for each sealed block.
pub const MINING_REWARD: u64 = 1;
