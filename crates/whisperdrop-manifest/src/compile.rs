/*!
# Campaign Assembly

Turns validated allocation rows into everything a campaign needs before
activation.

## Key Responsibilities
- Fill fresh blinding nonces for rows that omit one
- Build the allocation merkle tree and extract its root
- Bind the full allocation list into a manifest hash
- Emit one claim package per recipient, index-aligned with the tree
*/

use chrono::Utc;
use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::info;

use whisperdrop_core::{domains::MANIFEST_DOMAIN, hash_allocation_leaf, Allocation};
use whisperdrop_merkle::AllocationTree;

use crate::{
    errors::ManifestResult,
    schemas::ClaimPackage,
    validation::validate_allocation_rows,
    AllocationRow,
};

/// Hashes a campaign's full allocation list into its manifest commitment.
///
/// Layout: `SHA256(MANIFEST_DOMAIN || campaign_id || count_le || leaf_0 ||
/// ... || leaf_{n-1})` with `count_le` the allocation count as a
/// little-endian u64. Including the count keeps a shorter list from being
/// a valid prefix encoding of a longer one.
pub fn manifest_hash(campaign_id: &[u8; 32], allocations: &[Allocation]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(MANIFEST_DOMAIN);
    hasher.update(campaign_id);
    hasher.update((allocations.len() as u64).to_le_bytes());
    for allocation in allocations {
        hasher.update(hash_allocation_leaf(campaign_id, allocation));
    }
    hasher.finalize().into()
}

/// A fully assembled campaign, ready for activation and distribution.
pub struct CompiledCampaign {
    pub campaign_id: [u8; 32],
    pub merkle_root: [u8; 32],
    pub manifest_hash: [u8; 32],
    pub tree: AllocationTree,
    /// Timestamp stamped into every claim package of this run
    pub generated_at_unix: i64,
}

impl CompiledCampaign {
    /// Assembles a campaign from allocation rows.
    ///
    /// Row order is frozen into the tree, so the caller decides the
    /// canonical ordering before assembly. Rows without a nonce get a
    /// fresh random one; reusing a nonce across campaigns would let an
    /// observer correlate a recipient's allocations.
    pub fn assemble<R: RngCore + CryptoRng>(
        campaign_id: [u8; 32],
        rows: &[AllocationRow],
        rng: &mut R,
    ) -> ManifestResult<Self> {
        // Step 1: Reject duplicate pairs and zero amounts up front
        validate_allocation_rows(rows)?;

        // Step 2: Fill missing blinding nonces
        let allocations: Vec<Allocation> = rows
            .iter()
            .map(|row| {
                let nonce = row.nonce.unwrap_or_else(|| {
                    let mut nonce = [0u8; 16];
                    rng.fill_bytes(&mut nonce);
                    nonce
                });
                Allocation::new(row.recipient, row.amount, nonce)
            })
            .collect();

        // Step 3: Build the merkle tree
        let tree = AllocationTree::build(campaign_id, allocations)?;

        // Step 4: Bind the manifest
        let manifest_hash = manifest_hash(&campaign_id, tree.allocations());

        info!(
            "assembled campaign {}: {} allocations, tree depth {}",
            hex::encode(campaign_id),
            tree.leaf_count(),
            tree.depth()
        );

        Ok(Self {
            campaign_id,
            merkle_root: tree.root(),
            manifest_hash,
            tree,
            generated_at_unix: Utc::now().timestamp(),
        })
    }

    pub fn allocation_count(&self) -> usize {
        self.tree.leaf_count()
    }

    /// Claim packages for every allocation, index-aligned with the tree.
    pub fn claim_packages(&self) -> Vec<ClaimPackage> {
        self.tree
            .allocations()
            .iter()
            .enumerate()
            .map(|(index, allocation)| ClaimPackage {
                campaign_id: self.campaign_id,
                merkle_root: self.merkle_root,
                leaf_index: index as u32,
                recipient: allocation.recipient_commitment,
                amount: allocation.amount,
                nonce: allocation.nonce,
                proof: self
                    .tree
                    .proof_at(index)
                    .expect("index is in range by construction")
                    .into_inner(),
                generated_at_unix: self.generated_at_unix,
            })
            .collect()
    }

    /// Writes one `claim-NNNNN.json` per allocation into `dir`.
    ///
    /// Returns the written paths in leaf order. The directory is created
    /// if it does not exist.
    pub fn write_claim_packages<P: AsRef<Path>>(&self, dir: P) -> ManifestResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;

        let mut written = Vec::with_capacity(self.allocation_count());
        for package in self.claim_packages() {
            let path = dir.join(format!("claim-{:05}.json", package.leaf_index));
            let file = File::create(&path)?;
            serde_json::to_writer_pretty(file, &package)?;
            written.push(path);
        }

        info!(
            "wrote {} claim packages for campaign {}",
            written.len(),
            hex::encode(self.campaign_id)
        );
        Ok(written)
    }
}

/// Reads one claim package back from disk.
pub fn read_claim_package<P: AsRef<Path>>(path: P) -> ManifestResult<ClaimPackage> {
    let file = File::open(path)?;
    let package = serde_json::from_reader(file)?;
    Ok(package)
}
