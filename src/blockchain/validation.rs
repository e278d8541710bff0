use super::{Block, ProofOfWork};
use crate::error::InvalidChain;

/// Walk `chain` pairwise and report the first broken link.
///
/// Each block must reference the hash of its predecessor and carry a proof
/// that is valid after the predecessor's proof. Empty and single-block chains
/// are trivially valid.
pub fn validate_chain(chain: &[Block], pow: &ProofOfWork) -> Result<(), InvalidChain> {
    for pair in chain.windows(2) {
        let (prev, curr) = (&pair[0], &pair[1]);
        if curr.previous_hash != prev.hash() {
            return Err(InvalidChain::BrokenLink { index: curr.index });
        }
        if !pow.valid_proof(prev.proof, curr.proof) {
            return Err(InvalidChain::InvalidProof { index: curr.index });
        }
    }
    Ok(())
}

pub fn is_valid_chain(chain: &[Block], pow: &ProofOfWork) -> bool {
    validate_chain(chain, pow).is_ok()
}

/// Check that `chain` starts with a genesis block and that indices count
/// up from 1 without gaps. Required of any chain adopted from a peer, on
/// top of [`validate_chain`].
pub fn check_structure(chain: &[Block]) -> Result<(), InvalidChain> {
    if !chain.first().is_some_and(Block::is_genesis) {
        return Err(InvalidChain::MissingGenesis);
    }
    for (position, block) in chain.iter().enumerate() {
        let expected = position as u64 + 1;
        if block.index != expected {
            return Err(InvalidChain::IndexGap {
                position,
                expected,
                found: block.index,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{check_structure, is_valid_chain, validate_chain};
    use crate::blockchain::{Block, Blockchain, CancelToken, ProofOfWork};
    use crate::error::InvalidChain;

    fn mined_chain(pow: &ProofOfWork, blocks: usize) -> Vec<Block> {
        let mut bc = Blockchain::new();
        while bc.len() < blocks {
            let last_proof = bc.last_block().unwrap().proof;
            let proof = pow.find_proof(last_proof, &CancelToken::new()).unwrap();
            bc.add_transaction("A", "B", bc.len() as u64).unwrap();
            bc.append_block(proof, None).unwrap();
        }
        bc.chain().to_vec()
    }

    /// A proof that does not satisfy `pow` after `last_proof`.
    fn bad_proof(pow: &ProofOfWork, last_proof: u64) -> u64 {
        (0..).find(|p| !pow.valid_proof(last_proof, *p)).unwrap()
    }

    #[test]
    fn mined_chain_is_valid() {
        let pow = ProofOfWork::new(2);
        assert!(is_valid_chain(&mined_chain(&pow, 4), &pow));
    }

    #[test]
    fn empty_and_single_block_chains_are_valid() {
        let pow = ProofOfWork::new(2);
        assert!(is_valid_chain(&[], &pow));
        assert!(is_valid_chain(&mined_chain(&pow, 1), &pow));
    }

    #[test]
    fn tampered_previous_hash_is_rejected() {
        let pow = ProofOfWork::new(2);
        let mut chain = mined_chain(&pow, 4);
        chain[2].previous_hash = "0".repeat(64);
        assert_eq!(
            validate_chain(&chain, &pow),
            Err(InvalidChain::BrokenLink { index: 3 })
        );
    }

    #[test]
    fn tampered_transactions_break_the_next_link() {
        let pow = ProofOfWork::new(2);
        let mut chain = mined_chain(&pow, 4);
        chain[1].transactions[0].amount += 1;
        assert_eq!(
            validate_chain(&chain, &pow),
            Err(InvalidChain::BrokenLink { index: 3 })
        );
    }

    #[test]
    fn tampered_proof_on_last_block_is_rejected() {
        let pow = ProofOfWork::new(2);
        let mut chain = mined_chain(&pow, 4);
        chain[3].proof = bad_proof(&pow, chain[2].proof);
        assert_eq!(
            validate_chain(&chain, &pow),
            Err(InvalidChain::InvalidProof { index: 4 })
        );
    }

    #[test]
    fn relinked_block_with_bad_proof_is_rejected() {
        let pow = ProofOfWork::new(2);
        let mut chain = mined_chain(&pow, 3);
        chain[1].proof = bad_proof(&pow, chain[0].proof);
        chain[2].previous_hash = chain[1].hash();
        assert_eq!(
            validate_chain(&chain, &pow),
            Err(InvalidChain::InvalidProof { index: 2 })
        );
    }

    #[test]
    fn stricter_difficulty_rejects_easier_chain() {
        let easy = ProofOfWork::new(1);
        let chain = mined_chain(&easy, 6);
        let strict = ProofOfWork::new(8);
        assert!(!is_valid_chain(&chain, &strict));
    }

    #[test]
    fn mined_chain_has_sound_structure() {
        let pow = ProofOfWork::new(2);
        assert_eq!(check_structure(&mined_chain(&pow, 4)), Ok(()));
    }

    #[test]
    fn headless_chain_passes_links_but_fails_structure() {
        let pow = ProofOfWork::new(2);
        let headless = mined_chain(&pow, 4)[1..].to_vec();
        assert!(is_valid_chain(&headless, &pow));
        assert_eq!(check_structure(&headless), Err(InvalidChain::MissingGenesis));
        assert_eq!(check_structure(&[]), Err(InvalidChain::MissingGenesis));
    }

    #[test]
    fn skipped_index_fails_structure() {
        let pow = ProofOfWork::new(2);
        let mut chain = mined_chain(&pow, 3);
        chain[2].index = 7;
        assert_eq!(
            check_structure(&chain),
            Err(InvalidChain::IndexGap {
                position: 2,
                expected: 3,
                found: 7,
            })
        );
    }
}
