use rand::{CryptoRng, RngCore};
use sha2::{Digest, Sha256};
use thiserror::Error;
use whisperdrop_core::domains::{STEALTH_DOMAIN, STEALTH_TAG_DOMAIN};
use x25519_dalek::{EphemeralSecret, PublicKey};

use crate::keys::{StealthAddress, StealthKeys};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StealthError {
    /// The Diffie-Hellman output was the identity, which happens exactly
    /// when the counterparty supplied a low-order public key. Deriving a
    /// destination from it would let anyone reconstruct the payout address.
    #[error("degenerate shared secret from a low-order public key")]
    DegenerateSharedSecret,
}

/// A one-time payout destination published next to a claim.
///
/// Observers see a fresh ephemeral key, a single filter byte, and a
/// destination that is uniformly random without the view secret. Only the
/// addressed recipient can connect it to their stealth address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthCommitment {
    /// Sender-side X25519 public key, fresh per commitment.
    pub ephemeral_public: [u8; 32],
    /// First byte of the tag hash; lets scanners discard ~255/256 of
    /// foreign commitments with one cheap comparison.
    pub view_tag: u8,
    /// The derived destination the claimed tokens are paid to.
    pub destination: [u8; 32],
}

/// Derives a fresh one-time destination for `address`.
///
/// Each call burns a new ephemeral secret, so repeated commitments to the
/// same address share nothing observable.
pub fn generate_commitment<R: RngCore + CryptoRng>(
    address: &StealthAddress,
    rng: &mut R,
) -> Result<StealthCommitment, StealthError> {
    let ephemeral = EphemeralSecret::random_from_rng(&mut *rng);
    let ephemeral_public = PublicKey::from(&ephemeral).to_bytes();

    let shared = ephemeral.diffie_hellman(&PublicKey::from(address.view_public));
    if !shared.was_contributory() {
        return Err(StealthError::DegenerateSharedSecret);
    }

    Ok(StealthCommitment {
        ephemeral_public,
        view_tag: derive_view_tag(shared.as_bytes()),
        destination: derive_destination(shared.as_bytes(), &address.spend_public),
    })
}

/// Returns the indexes of `candidates` addressed to `keys`.
///
/// Commitments are filtered on the one-byte view tag first and confirmed by
/// recomputing the full destination, so a tag collision with a foreign
/// commitment never produces a false positive. Candidates carrying a
/// low-order ephemeral key are skipped outright.
pub fn scan(keys: &StealthKeys, candidates: &[StealthCommitment]) -> Vec<usize> {
    let spend_public = keys.spend_public();

    candidates
        .iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            let shared = keys
                .view_secret()
                .diffie_hellman(&PublicKey::from(candidate.ephemeral_public));
            if !shared.was_contributory() {
                return None;
            }
            if derive_view_tag(shared.as_bytes()) != candidate.view_tag {
                return None;
            }
            let destination = derive_destination(shared.as_bytes(), &spend_public);
            (destination == candidate.destination).then_some(index)
        })
        .collect()
}

fn derive_view_tag(shared_secret: &[u8; 32]) -> u8 {
    let mut hasher = Sha256::new();
    hasher.update(STEALTH_TAG_DOMAIN);
    hasher.update(shared_secret);
    hasher.finalize()[0]
}

fn derive_destination(shared_secret: &[u8; 32], spend_public: &[u8; 32]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(STEALTH_DOMAIN);
    hasher.update(shared_secret);
    hasher.update(spend_public);
    hasher.finalize().into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_recipient_finds_own_commitment_among_strangers() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let stranger_a = StealthKeys::generate(&mut OsRng);
        let stranger_b = StealthKeys::generate(&mut OsRng);

        let candidates = vec![
            generate_commitment(&stranger_a.address(), &mut OsRng).unwrap(),
            generate_commitment(&recipient.address(), &mut OsRng).unwrap(),
            generate_commitment(&stranger_b.address(), &mut OsRng).unwrap(),
        ];

        assert_eq!(
            scan(&recipient, &candidates),
            vec![1],
            "scan must surface exactly the commitment addressed to the recipient"
        );
    }

    #[test]
    fn test_scan_finds_every_commitment_addressed_to_the_recipient() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let stranger = StealthKeys::generate(&mut OsRng);

        let mut candidates = Vec::new();
        let mut expected = Vec::new();
        for index in 0..20 {
            let address = if index % 3 == 0 {
                expected.push(index);
                recipient.address()
            } else {
                stranger.address()
            };
            candidates.push(generate_commitment(&address, &mut OsRng).unwrap());
        }

        assert_eq!(scan(&recipient, &candidates), expected);
    }

    #[test]
    fn test_foreign_keys_see_nothing() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let outsider = StealthKeys::generate(&mut OsRng);

        let candidates: Vec<StealthCommitment> = (0..8)
            .map(|_| generate_commitment(&recipient.address(), &mut OsRng).unwrap())
            .collect();

        assert!(
            scan(&outsider, &candidates).is_empty(),
            "commitments must be invisible without the matching view secret"
        );
    }

    #[test]
    fn test_repeated_commitments_to_one_address_share_nothing_observable() {
        let recipient = StealthKeys::generate(&mut OsRng);

        let first = generate_commitment(&recipient.address(), &mut OsRng).unwrap();
        let second = generate_commitment(&recipient.address(), &mut OsRng).unwrap();

        assert_ne!(first.ephemeral_public, second.ephemeral_public);
        assert_ne!(first.destination, second.destination);
    }

    #[test]
    fn test_tampered_view_tag_hides_the_commitment() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let mut commitment = generate_commitment(&recipient.address(), &mut OsRng).unwrap();
        commitment.view_tag = commitment.view_tag.wrapping_add(1);

        assert!(
            scan(&recipient, &[commitment]).is_empty(),
            "the tag filter rejects before the destination is ever checked"
        );
    }

    #[test]
    fn test_tampered_destination_fails_the_full_check() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let mut commitment = generate_commitment(&recipient.address(), &mut OsRng).unwrap();
        commitment.destination[0] ^= 0x01;

        assert!(scan(&recipient, &[commitment]).is_empty());
    }

    #[test]
    fn test_low_order_view_key_is_rejected_at_generation() {
        let honest = StealthKeys::generate(&mut OsRng);
        // The all-zero u-coordinate is a low-order curve point; DH against
        // it collapses to the identity for every ephemeral secret.
        let malicious = StealthAddress {
            view_public: [0u8; 32],
            spend_public: honest.spend_public(),
        };

        assert_eq!(
            generate_commitment(&malicious, &mut OsRng),
            Err(StealthError::DegenerateSharedSecret)
        );
    }

    #[test]
    fn test_low_order_ephemeral_key_is_skipped_while_scanning() {
        let recipient = StealthKeys::generate(&mut OsRng);
        let genuine = generate_commitment(&recipient.address(), &mut OsRng).unwrap();

        let forged = StealthCommitment {
            ephemeral_public: [0u8; 32],
            view_tag: genuine.view_tag,
            destination: genuine.destination,
        };

        assert_eq!(
            scan(&recipient, &[forged, genuine]),
            vec![1],
            "a low-order ephemeral key must not reach the tag comparison"
        );
    }
}
