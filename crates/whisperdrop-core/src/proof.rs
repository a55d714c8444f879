use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::allocation::{hash_allocation_leaf, Allocation};
use crate::domains::NODE_DOMAIN;

/// Combines two child nodes into their parent hash.
///
/// Children are ordered lexicographically before hashing, so the result does
/// not depend on argument order and verifiers never carry position bits.
pub fn combine_nodes(a: &[u8; 32], b: &[u8; 32]) -> [u8; 32] {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };

    let mut hasher = Sha256::new();
    hasher.update(NODE_DOMAIN);
    hasher.update(lo);
    hasher.update(hi);
    hasher.finalize().into()
}

/// Merkle inclusion proof for a single allocation.
///
/// Wraps the bottom-up sibling path. The wrapper keeps raw hash vectors from
/// being passed where a proof is expected, and carries the borsh layout used
/// inside claim payloads.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct ClaimProof(pub Vec<[u8; 32]>);

impl ClaimProof {
    pub fn new(siblings: Vec<[u8; 32]>) -> Self {
        Self(siblings)
    }

    /// Sibling hashes in leaf-to-root order.
    pub fn as_slice(&self) -> &[[u8; 32]] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume the wrapper and return the inner sibling path.
    pub fn into_inner(self) -> Vec<[u8; 32]> {
        self.0
    }

    /// Verifies this proof against a published campaign root.
    ///
    /// Recomputes the leaf from the allocation data and folds each sibling
    /// with [`combine_nodes`]. Runs in O(proof length) with no tree state.
    /// A proof of the wrong length is not a structural error; it simply
    /// fails to reproduce the root.
    pub fn verify(&self, root: &[u8; 32], campaign_id: &[u8; 32], allocation: &Allocation) -> bool {
        let mut computed = hash_allocation_leaf(campaign_id, allocation);

        for sibling in self.0.iter() {
            computed = combine_nodes(&computed, sibling);
        }

        computed == *root
    }
}

impl From<Vec<[u8; 32]>> for ClaimProof {
    fn from(siblings: Vec<[u8; 32]>) -> Self {
        Self::new(siblings)
    }
}

/// Proof verification seam for the claim pipeline.
///
/// The pipeline takes the verifier as a collaborator so tests can observe
/// whether verification ran at all; rejections earlier in the guard sequence
/// must short-circuit before any hashing happens.
pub trait ProofVerifier {
    fn verify_claim(
        &self,
        root: &[u8; 32],
        campaign_id: &[u8; 32],
        allocation: &Allocation,
        proof: &ClaimProof,
    ) -> bool;
}

/// Production verifier; delegates to [`ClaimProof::verify`].
#[derive(Clone, Copy, Debug, Default)]
pub struct MerkleProofVerifier;

impl ProofVerifier for MerkleProofVerifier {
    fn verify_claim(
        &self,
        root: &[u8; 32],
        campaign_id: &[u8; 32],
        allocation: &Allocation,
        proof: &ClaimProof,
    ) -> bool {
        proof.verify(root, campaign_id, allocation)
    }
}
