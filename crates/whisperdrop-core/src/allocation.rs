use borsh::{BorshDeserialize, BorshSerialize};
use sha2::{Digest, Sha256};

use crate::domains::LEAF_DOMAIN;
use crate::error::ProtocolError;

/// Width of a recipient commitment in bytes.
pub const RECIPIENT_COMMITMENT_LEN: usize = 32;

/// Width of an allocation blinding nonce in bytes.
pub const NONCE_LEN: usize = 16;

/// One row of a distribution: who may claim, how much, and the blinding
/// nonce that keeps equal amounts from producing equal leaves.
///
/// The recipient is identified by a commitment, never a bare address; the
/// preimage stays with the recipient and is only used client-side.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct Allocation {
    /// Commitment to the recipient's identity.
    pub recipient_commitment: [u8; 32],
    /// Token amount claimable by this allocation.
    pub amount: u64,
    /// Per-allocation blinding nonce.
    pub nonce: [u8; 16],
}

impl Allocation {
    pub fn new(recipient_commitment: [u8; 32], amount: u64, nonce: [u8; 16]) -> Self {
        Self {
            recipient_commitment,
            amount,
            nonce,
        }
    }

    /// Builds an allocation from untrusted byte slices, checking field widths
    /// before anything downstream hashes them.
    pub fn from_parts(
        recipient_commitment: &[u8],
        amount: u64,
        nonce: &[u8],
    ) -> Result<Self, ProtocolError> {
        let recipient_commitment: [u8; RECIPIENT_COMMITMENT_LEN] = recipient_commitment
            .try_into()
            .map_err(|_| ProtocolError::MalformedAllocation {
                field: "recipient_commitment",
                expected: RECIPIENT_COMMITMENT_LEN,
                actual: recipient_commitment.len(),
            })?;

        let nonce: [u8; NONCE_LEN] =
            nonce
                .try_into()
                .map_err(|_| ProtocolError::MalformedAllocation {
                    field: "nonce",
                    expected: NONCE_LEN,
                    actual: nonce.len(),
                })?;

        Ok(Self {
            recipient_commitment,
            amount,
            nonce,
        })
    }
}

/// Hashes an allocation into its merkle leaf for the given campaign.
///
/// Layout: `SHA256(LEAF_DOMAIN || campaign_id || recipient_commitment ||
/// amount_le || nonce)`. Every field after the domain tag is fixed width,
/// so the encoding is injective without length prefixes.
pub fn hash_allocation_leaf(campaign_id: &[u8; 32], allocation: &Allocation) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(LEAF_DOMAIN);
    hasher.update(campaign_id);
    hasher.update(allocation.recipient_commitment);
    hasher.update(allocation.amount.to_le_bytes());
    hasher.update(allocation.nonce);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_allocation(seed: u8) -> Allocation {
        Allocation::new([seed; 32], 1_000 * seed as u64, [seed; 16])
    }

    #[test]
    fn test_leaf_hash_deterministic() {
        let campaign_id = [7u8; 32];
        let a = test_allocation(1);
        let b = test_allocation(1);

        assert_eq!(
            hash_allocation_leaf(&campaign_id, &a),
            hash_allocation_leaf(&campaign_id, &b),
            "identical allocations must hash identically"
        );
    }

    #[test]
    fn test_leaf_hash_sensitive_to_every_field() {
        let campaign_id = [7u8; 32];
        let base = test_allocation(1);
        let base_hash = hash_allocation_leaf(&campaign_id, &base);

        let mut other = base.clone();
        other.recipient_commitment[0] ^= 0x01;
        assert_ne!(
            base_hash,
            hash_allocation_leaf(&campaign_id, &other),
            "flipping a commitment bit must change the leaf"
        );

        let mut other = base.clone();
        other.amount += 1;
        assert_ne!(
            base_hash,
            hash_allocation_leaf(&campaign_id, &other),
            "changing the amount must change the leaf"
        );

        let mut other = base.clone();
        other.nonce[15] ^= 0x80;
        assert_ne!(
            base_hash,
            hash_allocation_leaf(&campaign_id, &other),
            "flipping a nonce bit must change the leaf"
        );
    }

    #[test]
    fn test_leaf_hash_binds_campaign() {
        let allocation = test_allocation(3);

        let hash_a = hash_allocation_leaf(&[1u8; 32], &allocation);
        let hash_b = hash_allocation_leaf(&[2u8; 32], &allocation);

        assert_ne!(
            hash_a, hash_b,
            "the same allocation in different campaigns must produce different leaves"
        );
    }

    #[test]
    fn test_leaf_hash_domain_tag_matters() {
        // The same field bytes hashed without the domain tag must not
        // reproduce the leaf hash.
        let campaign_id = [9u8; 32];
        let allocation = test_allocation(5);

        let tagged = hash_allocation_leaf(&campaign_id, &allocation);

        let mut hasher = Sha256::new();
        hasher.update(campaign_id);
        hasher.update(allocation.recipient_commitment);
        hasher.update(allocation.amount.to_le_bytes());
        hasher.update(allocation.nonce);
        let untagged: [u8; 32] = hasher.finalize().into();

        assert_ne!(tagged, untagged, "leaf hashing must include the domain tag");
    }

    #[test]
    fn test_from_parts_accepts_exact_widths() {
        let commitment = [4u8; 32];
        let nonce = [5u8; 16];

        let allocation = Allocation::from_parts(&commitment, 250, &nonce).unwrap();

        assert_eq!(allocation.recipient_commitment, commitment);
        assert_eq!(allocation.amount, 250);
        assert_eq!(allocation.nonce, nonce);
    }

    #[test]
    fn test_from_parts_rejects_short_commitment() {
        let result = Allocation::from_parts(&[0u8; 31], 100, &[0u8; 16]);

        assert!(matches!(
            result,
            Err(ProtocolError::MalformedAllocation {
                field: "recipient_commitment",
                expected: 32,
                actual: 31,
            })
        ));
    }

    #[test]
    fn test_from_parts_rejects_long_nonce() {
        let result = Allocation::from_parts(&[0u8; 32], 100, &[0u8; 17]);

        assert!(matches!(
            result,
            Err(ProtocolError::MalformedAllocation {
                field: "nonce",
                expected: 16,
                actual: 17,
            })
        ));
    }

    #[test]
    fn test_allocation_borsh_round_trip() {
        let allocation = test_allocation(8);

        let bytes = borsh::to_vec(&allocation).unwrap();
        let decoded = Allocation::try_from_slice(&bytes).unwrap();

        assert_eq!(allocation, decoded);
        // commitment(32) || amount(8) || nonce(16)
        assert_eq!(bytes.len(), 56);
    }
}
