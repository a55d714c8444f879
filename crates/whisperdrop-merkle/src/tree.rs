use thiserror::Error;
use tracing::debug;

use whisperdrop_core::{combine_nodes, hash_allocation_leaf, Allocation, ClaimProof};

/// Errors raised while building an allocation tree.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("campaign has no allocations")]
    EmptyCampaign,
}

/// Binary merkle tree over a campaign's allocations.
///
/// Level 0 holds the leaf hashes in input order; each higher level pairs
/// neighbors `(2i, 2i + 1)` with the commutative node combiner. An odd level
/// pads by duplicating its own last element (never by zero-padding), at
/// every level where it occurs, so the final node of an odd level pairs with
/// itself.
///
/// ## Properties
///
/// - Deterministic: the same `(campaign_id, allocations)` in the same order
///   always produces the same root and proofs.
/// - Order sensitive: the tree commits to the sequence, not a sorted set.
/// - Duplicates are legal: the commitment is to a multiset, and proofs are
///   issued per original index, so two identical allocations each get their
///   own (identical) proof and each still needs its own nullifier to pay
///   out.
/// - Every proof has exactly `depth()` siblings, one per level below the
///   root.
pub struct AllocationTree {
    campaign_id: [u8; 32],
    allocations: Vec<Allocation>,
    /// levels[0] = leaf hashes, levels.last() = [root].
    levels: Vec<Vec<[u8; 32]>>,
}

impl AllocationTree {
    /// Builds the tree for a campaign.
    ///
    /// The allocation order is frozen here; callers that want a canonical
    /// root must canonicalize order before building.
    pub fn build(
        campaign_id: [u8; 32],
        allocations: Vec<Allocation>,
    ) -> Result<Self, TreeError> {
        if allocations.is_empty() {
            return Err(TreeError::EmptyCampaign);
        }

        let leaves: Vec<[u8; 32]> = allocations
            .iter()
            .map(|allocation| hash_allocation_leaf(&campaign_id, allocation))
            .collect();

        let mut levels = vec![leaves];
        while levels.last().expect("levels is never empty").len() > 1 {
            let current = levels.last().expect("levels is never empty");
            let mut next = Vec::with_capacity((current.len() + 1) / 2);

            for pair in current.chunks(2) {
                let left = &pair[0];
                // A lone trailing element pairs with itself.
                let right = pair.get(1).unwrap_or(left);
                next.push(combine_nodes(left, right));
            }

            levels.push(next);
        }

        let tree = Self {
            campaign_id,
            allocations,
            levels,
        };
        debug!(
            "built allocation tree: {} leaves, depth {}",
            tree.leaf_count(),
            tree.depth()
        );
        Ok(tree)
    }

    pub fn campaign_id(&self) -> &[u8; 32] {
        &self.campaign_id
    }

    /// The committed root. Total because empty campaigns never build.
    pub fn root(&self) -> [u8; 32] {
        self.levels.last().expect("levels is never empty")[0]
    }

    pub fn leaf_count(&self) -> usize {
        self.allocations.len()
    }

    /// Number of levels between leaf and root; also every proof's length.
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    pub fn allocations(&self) -> &[Allocation] {
        &self.allocations
    }

    pub fn allocation_at(&self, index: usize) -> Option<&Allocation> {
        self.allocations.get(index)
    }

    pub fn leaf_at(&self, index: usize) -> Option<[u8; 32]> {
        self.levels[0].get(index).copied()
    }

    /// Inclusion proof for the allocation at `index`, or None out of range.
    ///
    /// Walks the stored levels bottom-up. At each level the sibling is the
    /// element at `index ^ 1`, or the element itself when that neighbor
    /// falls off the end of an odd level.
    pub fn proof_at(&self, index: usize) -> Option<ClaimProof> {
        if index >= self.allocations.len() {
            return None;
        }

        let mut siblings = Vec::with_capacity(self.depth());
        let mut position = index;

        for level in &self.levels[..self.levels.len() - 1] {
            let sibling_position = position ^ 1;
            let sibling = level.get(sibling_position).unwrap_or(&level[position]);
            siblings.push(*sibling);
            position /= 2;
        }

        Some(ClaimProof::new(siblings))
    }

    /// Proofs for every allocation, index-aligned with the input order.
    pub fn proofs(&self) -> Vec<ClaimProof> {
        (0..self.allocations.len())
            .map(|index| {
                self.proof_at(index)
                    .expect("index is in range by construction")
            })
            .collect()
    }
}
