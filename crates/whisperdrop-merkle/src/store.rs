use std::collections::HashMap;

use tracing::debug;

use crate::tree::AllocationTree;

/// Owner of built allocation trees, keyed by campaign id.
///
/// There is deliberately no global registry anywhere in the workspace; a
/// caller that wants trees to outlive a request owns a store and decides
/// its scope and eviction policy.
#[derive(Default)]
pub struct TreeStore {
    trees: HashMap<[u8; 32], AllocationTree>,
}

impl TreeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a tree under its campaign id, returning the tree it
    /// displaced, if any.
    pub fn insert(&mut self, tree: AllocationTree) -> Option<AllocationTree> {
        let campaign_id = *tree.campaign_id();
        let displaced = self.trees.insert(campaign_id, tree);
        debug!(
            "stored tree for campaign {:02x}{:02x}..., {} total",
            campaign_id[0],
            campaign_id[1],
            self.trees.len()
        );
        displaced
    }

    pub fn get(&self, campaign_id: &[u8; 32]) -> Option<&AllocationTree> {
        self.trees.get(campaign_id)
    }

    /// Removes and returns a campaign's tree. Typical after the campaign
    /// reaches a terminal status and proofs are fully distributed.
    pub fn evict(&mut self, campaign_id: &[u8; 32]) -> Option<AllocationTree> {
        self.trees.remove(campaign_id)
    }

    pub fn len(&self) -> usize {
        self.trees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trees.is_empty()
    }
}
