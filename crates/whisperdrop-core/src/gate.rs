use std::collections::HashMap;

use borsh::{BorshDeserialize, BorshSerialize};
use thiserror::Error;

use crate::error::ProtocolError;

/// Gate wire codes as they appear in `GateSpec::code`.
///
/// The wire keeps the ledger's full asset-standard vocabulary; the engine
/// collapses it onto the four [`EligibilityGate`] variants at the boundary.
pub mod gate_codes {
    pub const NONE: u8 = 0;
    pub const SPL_HOLDER: u8 = 1;
    pub const SPL_MIN_BALANCE: u8 = 2;
    pub const TOKEN_EXT_HOLDER: u8 = 3;
    pub const TOKEN_EXT_MIN_BALANCE: u8 = 4;
    pub const NFT_HOLDER: u8 = 5;
    pub const NFT_COLLECTION: u8 = 6;
    pub const COMPRESSED_NFT_HOLDER: u8 = 7;
    pub const COMPRESSED_NFT_COLLECTION: u8 = 8;
}

/// Eligibility requirement a recipient must satisfy at claim time, over and
/// above holding a valid proof.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EligibilityGate {
    /// No extra requirement.
    None,
    /// Hold at least `min_balance` units of a fungible token.
    TokenHolder { mint: [u8; 32], min_balance: u64 },
    /// Hold one specific NFT.
    NftHolder { mint: [u8; 32] },
    /// Hold at least `min_count` NFTs from a collection.
    CollectionHolder {
        collection: [u8; 32],
        min_count: u64,
        include_compressed: bool,
    },
}

/// One non-fungible asset in a holdings snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeldAsset {
    pub mint: [u8; 32],
    /// Collection the asset belongs to, when it has one.
    pub collection: Option<[u8; 32]>,
    /// Whether the asset is a compressed NFT.
    pub compressed: bool,
}

/// Point-in-time view of one recipient's relevant holdings.
///
/// Produced by an external indexer or RPC layer; the engine only reads it.
/// How fresh the snapshot is, and who is trusted to build it, are the
/// caller's concern.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HoldingsSnapshot {
    balances: HashMap<[u8; 32], u64>,
    assets: Vec<HeldAsset>,
}

impl HoldingsSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a fungible balance. Builder-style for snapshot assembly.
    pub fn with_balance(mut self, mint: [u8; 32], amount: u64) -> Self {
        self.balances.insert(mint, amount);
        self
    }

    /// Adds a held asset. Builder-style for snapshot assembly.
    pub fn with_asset(mut self, asset: HeldAsset) -> Self {
        self.assets.push(asset);
        self
    }

    /// Fungible balance for a mint; zero when the mint is absent.
    pub fn balance_of(&self, mint: &[u8; 32]) -> u64 {
        self.balances.get(mint).copied().unwrap_or(0)
    }

    /// True when the snapshot contains the given asset mint.
    pub fn owns(&self, mint: &[u8; 32]) -> bool {
        self.assets.iter().any(|asset| &asset.mint == mint)
    }

    /// Number of held assets from a collection, optionally counting
    /// compressed assets.
    pub fn collection_count(&self, collection: &[u8; 32], include_compressed: bool) -> u64 {
        self.assets
            .iter()
            .filter(|asset| asset.collection.as_ref() == Some(collection))
            .filter(|asset| include_compressed || !asset.compressed)
            .count() as u64
    }
}

/// Evaluates a gate against a holdings snapshot.
///
/// Pure function of its inputs: no I/O, no clock, no randomness. The
/// snapshot is the verdict's entire evidence.
pub fn evaluate_gate(gate: &EligibilityGate, holdings: &HoldingsSnapshot) -> bool {
    match gate {
        EligibilityGate::None => true,
        EligibilityGate::TokenHolder { mint, min_balance } => {
            holdings.balance_of(mint) >= *min_balance
        }
        EligibilityGate::NftHolder { mint } => holdings.owns(mint),
        EligibilityGate::CollectionHolder {
            collection,
            min_count,
            include_compressed,
        } => holdings.collection_count(collection, *include_compressed) >= *min_count,
    }
}

/// Wire form of an eligibility gate.
///
/// Borsh layout: `code(1) || asset(32) || min_amount(8 LE)`. Holder-type
/// codes ignore `min_amount`; code 0 ignores both fields.
#[derive(BorshSerialize, BorshDeserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateSpec {
    pub code: u8,
    pub asset: [u8; 32],
    pub min_amount: u64,
}

impl GateSpec {
    /// The ungated spec, `code = 0` with zeroed fields.
    pub fn none() -> Self {
        Self {
            code: gate_codes::NONE,
            asset: [0u8; 32],
            min_amount: 0,
        }
    }

    /// Canonical wire encoding of an abstract gate.
    ///
    /// Fungible gates always encode as the min-balance form and collection
    /// gates pick the compressed code from `include_compressed`, so decoding
    /// an encoded gate round-trips exactly.
    pub fn from_gate(gate: &EligibilityGate) -> Self {
        match gate {
            EligibilityGate::None => Self::none(),
            EligibilityGate::TokenHolder { mint, min_balance } => Self {
                code: gate_codes::SPL_MIN_BALANCE,
                asset: *mint,
                min_amount: *min_balance,
            },
            EligibilityGate::NftHolder { mint } => Self {
                code: gate_codes::NFT_HOLDER,
                asset: *mint,
                min_amount: 1,
            },
            EligibilityGate::CollectionHolder {
                collection,
                min_count,
                include_compressed,
            } => Self {
                code: if *include_compressed {
                    gate_codes::COMPRESSED_NFT_COLLECTION
                } else {
                    gate_codes::NFT_COLLECTION
                },
                asset: *collection,
                min_amount: *min_count,
            },
        }
    }

    /// Maps the wire code onto the abstract gate the evaluator understands.
    ///
    /// Holder codes (1, 3) imply a minimum balance of one; the compressed
    /// NFT codes (7, 8) fold into the plain NFT variants since ownership in
    /// a snapshot does not depend on the storage scheme. A zero `min_amount`
    /// on threshold codes is lifted to one so a gated campaign can never be
    /// satisfied by holding nothing.
    pub fn to_gate(&self) -> Result<EligibilityGate, ProtocolError> {
        let gate = match self.code {
            gate_codes::NONE => EligibilityGate::None,
            gate_codes::SPL_HOLDER | gate_codes::TOKEN_EXT_HOLDER => {
                EligibilityGate::TokenHolder {
                    mint: self.asset,
                    min_balance: 1,
                }
            }
            gate_codes::SPL_MIN_BALANCE | gate_codes::TOKEN_EXT_MIN_BALANCE => {
                EligibilityGate::TokenHolder {
                    mint: self.asset,
                    min_balance: self.min_amount.max(1),
                }
            }
            gate_codes::NFT_HOLDER | gate_codes::COMPRESSED_NFT_HOLDER => {
                EligibilityGate::NftHolder { mint: self.asset }
            }
            gate_codes::NFT_COLLECTION => EligibilityGate::CollectionHolder {
                collection: self.asset,
                min_count: self.min_amount.max(1),
                include_compressed: false,
            },
            gate_codes::COMPRESSED_NFT_COLLECTION => EligibilityGate::CollectionHolder {
                collection: self.asset,
                min_count: self.min_amount.max(1),
                include_compressed: true,
            },
            unknown => return Err(ProtocolError::UnknownGateCode(unknown)),
        };

        Ok(gate)
    }
}

/// Errors surfaced by a holdings source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HoldingsError {
    #[error("holdings source unavailable: {0}")]
    Unavailable(String),
}

/// Synchronous source of holdings snapshots, keyed by recipient commitment.
///
/// Only consulted when a campaign's gate is not [`EligibilityGate::None`].
pub trait HoldingsSource {
    fn holdings_for(
        &self,
        recipient_commitment: &[u8; 32],
    ) -> Result<HoldingsSnapshot, HoldingsError>;
}

/// Fixed snapshot table. The in-memory holdings source for tests and local
/// dry runs; unknown recipients resolve to an empty snapshot.
#[derive(Debug, Default)]
pub struct StaticHoldings {
    entries: HashMap<[u8; 32], HoldingsSnapshot>,
}

impl StaticHoldings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, recipient_commitment: [u8; 32], snapshot: HoldingsSnapshot) {
        self.entries.insert(recipient_commitment, snapshot);
    }
}

impl HoldingsSource for StaticHoldings {
    fn holdings_for(
        &self,
        recipient_commitment: &[u8; 32],
    ) -> Result<HoldingsSnapshot, HoldingsError> {
        Ok(self
            .entries
            .get(recipient_commitment)
            .cloned()
            .unwrap_or_default())
    }
}
