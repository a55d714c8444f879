//! Domain separation tags for every hash computed by the protocol.
//!
//! These must match the tags baked into published merkle roots; changing
//! any of them invalidates all outstanding proofs.

/// Tag for allocation leaf hashes.
pub const LEAF_DOMAIN: &[u8] = b"whisperdrop:leaf:v1";

/// Tag for internal merkle node hashes.
pub const NODE_DOMAIN: &[u8] = b"whisperdrop:node:v1";

/// Tag for claim nullifier derivation.
pub const NULLIFIER_DOMAIN: &[u8] = b"whisperdrop:nullifier:v1";

/// Tag for manifest hashes binding a campaign to its allocation list.
pub const MANIFEST_DOMAIN: &[u8] = b"whisperdrop:manifest:v1";

/// Tag for stealth destination commitment derivation.
pub const STEALTH_DOMAIN: &[u8] = b"whisperdrop:stealth:v1";

/// Tag for stealth view-tag derivation.
pub const STEALTH_TAG_DOMAIN: &[u8] = b"whisperdrop:stealth:tag:v1";
