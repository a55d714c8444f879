use thiserror::Error;

use crate::gate::HoldingsError;
use crate::ledger::SubmitError;

/// Errors raised while validating untrusted protocol inputs.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("{field} must be {expected} bytes, got {actual}")]
    MalformedAllocation {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("unknown gate code: {0}")]
    UnknownGateCode(u8),

    #[error("malformed instruction payload: {0}")]
    MalformedInstruction(#[from] std::io::Error),
}

/// Errors raised by campaign lifecycle transitions.
#[derive(Error, Debug)]
pub enum LifecycleError {
    #[error("campaign is not in draft status")]
    CampaignNotDraft,

    #[error("campaign is not active")]
    CampaignNotActive,

    #[error("campaign is not paused")]
    CampaignNotPaused,

    #[error("campaign has expired")]
    CampaignExpired,

    #[error("campaign has not expired yet")]
    CampaignNotExpired,

    #[error("campaign has no allocations")]
    EmptyCampaign,

    #[error("ledger submission failed: {0}")]
    Submit(#[from] SubmitError),
}

/// Errors raised while processing a single claim.
///
/// Every variant is a deterministic rejection; the pipeline never retries.
#[derive(Error, Debug)]
pub enum ClaimError {
    #[error("campaign is not active")]
    CampaignNotActive,

    #[error("campaign has expired")]
    CampaignExpired,

    #[error("eligibility gate not satisfied")]
    GateNotSatisfied,

    #[error("merkle proof does not match the campaign root")]
    ProofMismatch,

    #[error("this allocation has already been claimed")]
    AlreadyClaimed,

    #[error("holdings lookup failed: {0}")]
    Holdings(#[from] HoldingsError),

    #[error("ledger submission failed: {0}")]
    Submit(SubmitError),
}
