use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::ProtocolError;
use crate::gate::GateSpec;

/// Instructions the engine submits to the settlement ledger.
///
/// Borsh writes the variant index as the first byte of every payload, so the
/// wire tags are fixed by declaration order: 0 = InitCampaign, 1 = Claim,
/// 2 = Reclaim. Reordering variants is a wire break.
#[derive(BorshSerialize, BorshDeserialize, Clone, Debug, PartialEq, Eq)]
pub enum LedgerInstruction {
    /// Publishes a campaign's commitments and opens its escrow.
    InitCampaign {
        campaign_id: [u8; 32],
        manifest_hash: [u8; 32],
        merkle_root: [u8; 32],
        mint: [u8; 32],
        authority: [u8; 32],
        expiry_unix: i64,
        gate: GateSpec,
    },
    /// Settles one allocation; the ledger replays the proof and performs the
    /// atomic nullifier insert before paying out.
    Claim {
        campaign_id: [u8; 32],
        recipient_commitment: [u8; 32],
        amount: u64,
        nonce: [u8; 16],
        proof: Vec<[u8; 32]>,
        nullifier: [u8; 32],
        destination: [u8; 32],
    },
    /// Returns unclaimed escrow to the campaign authority after expiry.
    Reclaim {
        campaign_id: [u8; 32],
        authority: [u8; 32],
    },
}

impl LedgerInstruction {
    /// Wire tag for this instruction, the first byte of its encoding.
    pub fn tag(&self) -> u8 {
        match self {
            LedgerInstruction::InitCampaign { .. } => 0,
            LedgerInstruction::Claim { .. } => 1,
            LedgerInstruction::Reclaim { .. } => 2,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        borsh::to_vec(self).expect("instruction serialization cannot fail")
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, ProtocolError> {
        Self::try_from_slice(bytes).map_err(ProtocolError::from)
    }
}
