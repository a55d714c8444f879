use tracing::debug;

use crate::allocation::Allocation;
use crate::campaign::{Campaign, CampaignStatus};
use crate::error::ClaimError;
use crate::gate::{evaluate_gate, EligibilityGate, HoldingsSource};
use crate::instruction::LedgerInstruction;
use crate::ledger::{LedgerSubmitter, SubmitError};
use crate::nullifier::derive_nullifier;
use crate::proof::{ClaimProof, ProofVerifier};

/// Everything a recipient hands the engine to claim one allocation.
#[derive(Clone, Debug)]
pub struct ClaimRequest {
    pub allocation: Allocation,
    pub proof: ClaimProof,
    /// Preimage material the nullifier is derived from. Stays local; only
    /// the derived nullifier reaches the ledger.
    pub recipient_secret: Vec<u8>,
    /// Where the tokens go, typically a stealth destination commitment.
    pub destination: [u8; 32],
}

/// Record of an accepted claim, handed back to the caller after the ledger
/// acknowledged settlement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClaimReceipt {
    pub campaign_id: [u8; 32],
    pub nullifier: [u8; 32],
    pub destination: [u8; 32],
    pub amount: u64,
    pub claimed_at_unix: i64,
}

/// Runs one claim through the full guard sequence.
///
/// Order is fixed: status, expiry, gate, proof, nullifier. Each guard
/// short-circuits, so no proof hashing happens for an inactive campaign and
/// no ledger traffic happens for a bad proof. A rejected claim leaves the
/// campaign untouched; every rejection is deterministic and never retried.
pub fn process_claim<V, H, S>(
    campaign: &mut Campaign,
    request: &ClaimRequest,
    verifier: &V,
    holdings: &H,
    submitter: &mut S,
    now: i64,
) -> Result<ClaimReceipt, ClaimError>
where
    V: ProofVerifier,
    H: HoldingsSource,
    S: LedgerSubmitter,
{
    // 1. Campaign must be live.
    if campaign.status != CampaignStatus::Active {
        return Err(ClaimError::CampaignNotActive);
    }

    // 2. Claims are accepted through the expiry instant, not past it.
    if campaign.is_expired(now) {
        return Err(ClaimError::CampaignExpired);
    }

    // 3. Eligibility gate. The holdings source is only consulted when a
    //    gate is actually set.
    if campaign.gate != EligibilityGate::None {
        let snapshot = holdings.holdings_for(&request.allocation.recipient_commitment)?;
        if !evaluate_gate(&campaign.gate, &snapshot) {
            return Err(ClaimError::GateNotSatisfied);
        }
    }

    // 4. Merkle proof against the published root.
    if !verifier.verify_claim(
        &campaign.merkle_root,
        &campaign.campaign_id,
        &request.allocation,
        &request.proof,
    ) {
        return Err(ClaimError::ProofMismatch);
    }

    // 5. Nullifier and settlement. The ledger's atomic insert-if-absent is
    //    the only double-claim arbiter; losing that race is AlreadyClaimed.
    let nullifier = derive_nullifier(&campaign.campaign_id, &request.recipient_secret);
    let payload = LedgerInstruction::Claim {
        campaign_id: campaign.campaign_id,
        recipient_commitment: request.allocation.recipient_commitment,
        amount: request.allocation.amount,
        nonce: request.allocation.nonce,
        proof: request.proof.clone().into_inner(),
        nullifier,
        destination: request.destination,
    }
    .encode();

    match submitter.submit(&payload) {
        Ok(_) => {}
        Err(SubmitError::NullifierExists) => return Err(ClaimError::AlreadyClaimed),
        Err(err) => return Err(ClaimError::Submit(err)),
    }

    campaign.record_claim();
    debug!(
        "settled claim of {} on campaign {}",
        request.allocation.amount,
        hex::encode(campaign.campaign_id)
    );

    Ok(ClaimReceipt {
        campaign_id: campaign.campaign_id,
        nullifier,
        destination: request.destination,
        amount: request.allocation.amount,
        claimed_at_unix: now,
    })
}
