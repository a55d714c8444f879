/*!
# Manifest Schema Definitions

This module defines the data contracts a campaign operator touches:

- `allocations.csv` rows going into assembly
- claim package JSON files coming out of it

All fixed-width byte fields travel as lowercase hex without a `0x` prefix.
*/

use serde::{Deserialize, Serialize};

// ================================================================================================
// Allocations CSV Schema
// ================================================================================================

/// Expected headers for allocations.csv in exact order
pub const ALLOCATION_CSV_HEADERS: &[&str] = &["recipient", "amount", "nonce"];

/// Row structure for allocations.csv
///
/// **File**: `allocations.csv`
/// **Producer**: campaign operator tooling
/// **Consumer**: [`CompiledCampaign::assemble`](crate::CompiledCampaign::assemble)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AllocationRow {
    /// Recipient commitment in hex format (32 bytes)
    #[serde(
        deserialize_with = "deserialize_hex32",
        serialize_with = "serialize_hex32"
    )]
    pub recipient: [u8; 32],

    /// Token amount claimable by this row
    pub amount: u64,

    /// Blinding nonce in hex format (16 bytes). May be left empty;
    /// assembly fills a fresh random nonce for every empty cell.
    #[serde(
        deserialize_with = "deserialize_optional_hex16",
        serialize_with = "serialize_optional_hex16"
    )]
    pub nonce: Option<[u8; 16]>,
}

// ================================================================================================
// Claim Package JSON Schema
// ================================================================================================

/// The per-recipient artifact produced by campaign assembly.
///
/// One JSON file per allocation. It carries everything a recipient's wallet
/// needs to submit a claim: the allocation fields, the inclusion proof, and
/// the committed root to check the proof against before signing anything.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClaimPackage {
    #[serde(
        deserialize_with = "deserialize_hex32",
        serialize_with = "serialize_hex32"
    )]
    pub campaign_id: [u8; 32],

    #[serde(
        deserialize_with = "deserialize_hex32",
        serialize_with = "serialize_hex32"
    )]
    pub merkle_root: [u8; 32],

    /// Position of this allocation in the committed order
    pub leaf_index: u32,

    #[serde(
        deserialize_with = "deserialize_hex32",
        serialize_with = "serialize_hex32"
    )]
    pub recipient: [u8; 32],

    pub amount: u64,

    #[serde(
        deserialize_with = "deserialize_hex16",
        serialize_with = "serialize_hex16"
    )]
    pub nonce: [u8; 16],

    /// Sibling hashes from leaf to root, one per tree level
    #[serde(
        deserialize_with = "deserialize_hex_siblings",
        serialize_with = "serialize_hex_siblings"
    )]
    pub proof: Vec<[u8; 32]>,

    /// Unix timestamp of the assembly run that produced this package
    pub generated_at_unix: i64,
}

// ================================================================================================
// Custom Serde Functions
// ================================================================================================

fn parse_hex_exact(s: &str, expected: usize) -> Result<Vec<u8>, String> {
    let bytes = hex::decode(s).map_err(|e| format!("invalid hex: {}", e))?;
    if bytes.len() != expected {
        return Err(format!("Expected {} bytes, got {}", expected, bytes.len()));
    }
    Ok(bytes)
}

/// Deserialize hex string to [u8; 32]
fn deserialize_hex32<'de, D>(deserializer: D) -> Result<[u8; 32], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let bytes = parse_hex_exact(&s, 32).map_err(serde::de::Error::custom)?;
    let mut array = [0u8; 32];
    array.copy_from_slice(&bytes);
    Ok(array)
}

/// Serialize [u8; 32] to hex string
fn serialize_hex32<S>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

/// Deserialize hex string to [u8; 16]
fn deserialize_hex16<'de, D>(deserializer: D) -> Result<[u8; 16], D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let bytes = parse_hex_exact(&s, 16).map_err(serde::de::Error::custom)?;
    let mut array = [0u8; 16];
    array.copy_from_slice(&bytes);
    Ok(array)
}

/// Serialize [u8; 16] to hex string
fn serialize_hex16<S>(bytes: &[u8; 16], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&hex::encode(bytes))
}

/// Deserialize an optional hex string to Option<[u8; 16]>; empty cells are None
fn deserialize_optional_hex16<'de, D>(deserializer: D) -> Result<Option<[u8; 16]>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let field: Option<String> = Option::deserialize(deserializer)?;
    match field {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => {
            let bytes = parse_hex_exact(&s, 16).map_err(serde::de::Error::custom)?;
            let mut array = [0u8; 16];
            array.copy_from_slice(&bytes);
            Ok(Some(array))
        }
    }
}

/// Serialize Option<[u8; 16]> to a hex string, None as the empty string
fn serialize_optional_hex16<S>(
    nonce: &Option<[u8; 16]>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    match nonce {
        Some(bytes) => serializer.serialize_str(&hex::encode(bytes)),
        None => serializer.serialize_str(""),
    }
}

/// Deserialize a list of hex strings to proof siblings
fn deserialize_hex_siblings<'de, D>(deserializer: D) -> Result<Vec<[u8; 32]>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let strings: Vec<String> = Vec::deserialize(deserializer)?;
    strings
        .iter()
        .map(|s| {
            let bytes = parse_hex_exact(s, 32).map_err(serde::de::Error::custom)?;
            let mut array = [0u8; 32];
            array.copy_from_slice(&bytes);
            Ok(array)
        })
        .collect()
}

/// Serialize proof siblings as a list of hex strings
fn serialize_hex_siblings<S>(siblings: &[[u8; 32]], serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(siblings.iter().map(hex::encode))
}

// ================================================================================================
// Tests
// ================================================================================================
