use serde::{Deserialize, Serialize};

/// A transfer recorded in a block. Signatures and balances are not tracked.
///
/// Fields are declared in lexicographic order: the canonical block encoding
/// used for hashing relies on serde emitting them in this order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: u64,
    pub recipient: String,
    pub sender: String,
}

impl Transaction {
    pub fn new(sender: impl Into<String>, recipient: impl Into<String>, amount: u64) -> Self {
        Self {
            amount,
            recipient: recipient.into(),
            sender: sender.into(),
        }
    }
}
