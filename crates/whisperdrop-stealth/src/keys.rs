use rand::{CryptoRng, RngCore};
use x25519_dalek::{PublicKey, StaticSecret};

/// Public half of a recipient's stealth identity.
///
/// This is the only material a recipient hands out. Campaign operators and
/// senders derive one-time destinations from it; nothing in it links back to
/// any destination that has already appeared on the ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StealthAddress {
    /// X25519 public key used for the sender-side Diffie-Hellman.
    pub view_public: [u8; 32],
    /// X25519 public key folded into each derived destination.
    pub spend_public: [u8; 32],
}

/// A recipient's long-term stealth keypairs.
///
/// The view secret lets the holder scan published commitments for ones
/// addressed to them. The spend secret controls funds at the derived
/// destinations and never participates in scanning, so a recipient can
/// delegate the view secret to an online watcher without risking funds.
pub struct StealthKeys {
    view: StaticSecret,
    spend: StaticSecret,
}

impl StealthKeys {
    /// Generates a fresh view/spend pair from the given CSPRNG.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Self {
        Self {
            view: StaticSecret::random_from_rng(&mut *rng),
            spend: StaticSecret::random_from_rng(&mut *rng),
        }
    }

    /// Rebuilds keys from raw secret bytes, e.g. out of a wallet file.
    pub fn from_secret_bytes(view: [u8; 32], spend: [u8; 32]) -> Self {
        Self {
            view: StaticSecret::from(view),
            spend: StaticSecret::from(spend),
        }
    }

    pub fn view_public(&self) -> [u8; 32] {
        PublicKey::from(&self.view).to_bytes()
    }

    pub fn spend_public(&self) -> [u8; 32] {
        PublicKey::from(&self.spend).to_bytes()
    }

    /// The shareable address for this identity.
    pub fn address(&self) -> StealthAddress {
        StealthAddress {
            view_public: self.view_public(),
            spend_public: self.spend_public(),
        }
    }

    pub(crate) fn view_secret(&self) -> &StaticSecret {
        &self.view
    }
}
