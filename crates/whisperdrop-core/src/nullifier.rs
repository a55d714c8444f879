use sha2::{Digest, Sha256};

use crate::domains::NULLIFIER_DOMAIN;

/// Derives the claim nullifier for a recipient within one campaign.
///
/// Layout: `SHA256(NULLIFIER_DOMAIN || campaign_id || recipient_secret)`.
/// The secret is the recipient's commitment preimage or signing-key seed and
/// may be any length; it is the trailing field so the encoding stays
/// unambiguous without a length prefix.
///
/// The same secret yields the same nullifier every time within a campaign,
/// which is what makes double claims collide. Across campaigns the
/// `campaign_id` input changes the digest entirely, so ledger observers
/// cannot link one recipient's claims between drops. Uniqueness is enforced
/// by the ledger's atomic insert-if-absent, not here.
pub fn derive_nullifier(campaign_id: &[u8; 32], recipient_secret: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(NULLIFIER_DOMAIN);
    hasher.update(campaign_id);
    hasher.update(recipient_secret);
    hasher.finalize().into()
}
