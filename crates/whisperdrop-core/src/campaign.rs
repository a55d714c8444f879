use tracing::{info, warn};

use crate::error::LifecycleError;
use crate::gate::{EligibilityGate, GateSpec};
use crate::instruction::LedgerInstruction;
use crate::ledger::LedgerSubmitter;

/// Lifecycle status of a campaign.
///
/// Transitions: Draft -> Active -> (Paused <-> Active) -> Completed or
/// Cancelled. Completed and Cancelled are terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CampaignStatus {
    /// Assembled locally, nothing published yet.
    Draft,
    /// Live and accepting claims.
    Active,
    /// Temporarily halted, resumable.
    Paused,
    /// Every allocation claimed, or the operator closed distribution.
    Completed,
    /// Expired and reclaimed by the authority.
    Cancelled,
}

impl Default for CampaignStatus {
    fn default() -> Self {
        CampaignStatus::Draft
    }
}

/// One token distribution campaign.
///
/// Holds the published commitments and drives the lifecycle state machine.
/// All timing comes in as explicit unix timestamps; the engine never reads a
/// clock of its own.
#[derive(Clone, Debug)]
pub struct Campaign {
    /// Unique 32-byte campaign identifier; mixed into every leaf and
    /// nullifier so commitments never collide across campaigns.
    pub campaign_id: [u8; 32],

    /// The operator key unclaimed funds return to on reclaim.
    pub authority: [u8; 32],

    /// Mint of the token being distributed.
    pub mint: [u8; 32],

    /// Hash binding the campaign to its exact allocation list.
    /// Zero until activation.
    pub manifest_hash: [u8; 32],

    /// Merkle root of the allocation tree. Zero until activation.
    pub merkle_root: [u8; 32],

    /// Unix timestamp after which claims stop and reclaim opens.
    pub expiry_unix: i64,

    /// Eligibility requirement checked on every claim.
    pub gate: EligibilityGate,

    /// Current lifecycle status.
    pub status: CampaignStatus,

    /// Number of allocations committed to the tree. Zero until activation.
    pub allocation_count: u64,

    /// Number of successfully settled claims.
    pub claimed_count: u64,
}

impl Campaign {
    /// Creates a draft campaign. Nothing reaches the ledger until
    /// [`Campaign::activate`].
    pub fn new(
        campaign_id: [u8; 32],
        authority: [u8; 32],
        mint: [u8; 32],
        expiry_unix: i64,
        gate: EligibilityGate,
    ) -> Self {
        Self {
            campaign_id,
            authority,
            mint,
            manifest_hash: [0u8; 32],
            merkle_root: [0u8; 32],
            expiry_unix,
            gate,
            status: CampaignStatus::default(),
            allocation_count: 0,
            claimed_count: 0,
        }
    }

    /// True once the claim window has closed.
    /// Claims are accepted through the expiry instant itself.
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expiry_unix
    }

    /// Publishes the campaign and opens it for claims.
    ///
    /// Requires a built tree (non-zero allocation count plus its root and
    /// manifest hash) and an expiry still in the future. Submits
    /// `InitCampaign` to the ledger; the status only advances if the ledger
    /// accepts it.
    pub fn activate<S: LedgerSubmitter>(
        &mut self,
        merkle_root: [u8; 32],
        manifest_hash: [u8; 32],
        allocation_count: u64,
        now: i64,
        submitter: &mut S,
    ) -> Result<(), LifecycleError> {
        if self.status != CampaignStatus::Draft {
            return Err(LifecycleError::CampaignNotDraft);
        }
        if allocation_count == 0 {
            return Err(LifecycleError::EmptyCampaign);
        }
        if now >= self.expiry_unix {
            warn!(
                "refusing to activate campaign {} with expiry {} at {}",
                hex::encode(self.campaign_id),
                self.expiry_unix,
                now
            );
            return Err(LifecycleError::CampaignExpired);
        }

        let payload = LedgerInstruction::InitCampaign {
            campaign_id: self.campaign_id,
            manifest_hash,
            merkle_root,
            mint: self.mint,
            authority: self.authority,
            expiry_unix: self.expiry_unix,
            gate: GateSpec::from_gate(&self.gate),
        }
        .encode();
        submitter.submit(&payload)?;

        self.merkle_root = merkle_root;
        self.manifest_hash = manifest_hash;
        self.allocation_count = allocation_count;
        self.status = CampaignStatus::Active;

        info!(
            "activated campaign {} with {} allocations, expiry {}",
            hex::encode(self.campaign_id),
            allocation_count,
            self.expiry_unix
        );
        Ok(())
    }

    /// Suspends claim processing. Only an active campaign can pause.
    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        if self.status != CampaignStatus::Active {
            return Err(LifecycleError::CampaignNotActive);
        }
        self.status = CampaignStatus::Paused;
        info!("paused campaign {}", hex::encode(self.campaign_id));
        Ok(())
    }

    /// Resumes a paused campaign.
    pub fn resume(&mut self) -> Result<(), LifecycleError> {
        if self.status != CampaignStatus::Paused {
            return Err(LifecycleError::CampaignNotPaused);
        }
        self.status = CampaignStatus::Active;
        info!("resumed campaign {}", hex::encode(self.campaign_id));
        Ok(())
    }

    /// Ends distribution early. Unclaimed allocations become unclaimable.
    pub fn close(&mut self) -> Result<(), LifecycleError> {
        if self.status != CampaignStatus::Active {
            return Err(LifecycleError::CampaignNotActive);
        }
        self.status = CampaignStatus::Completed;
        info!(
            "closed campaign {} with {} of {} allocations claimed",
            hex::encode(self.campaign_id),
            self.claimed_count,
            self.allocation_count
        );
        Ok(())
    }

    /// Returns unclaimed escrow to the authority once the campaign expired.
    ///
    /// Only legal from Active: a paused campaign must be resumed first, and
    /// a draft never escrowed anything. Submits `Reclaim` to the ledger and
    /// moves the campaign to its terminal Cancelled state.
    pub fn reclaim<S: LedgerSubmitter>(
        &mut self,
        now: i64,
        submitter: &mut S,
    ) -> Result<(), LifecycleError> {
        if self.status != CampaignStatus::Active {
            return Err(LifecycleError::CampaignNotActive);
        }
        if !self.is_expired(now) {
            return Err(LifecycleError::CampaignNotExpired);
        }

        let payload = LedgerInstruction::Reclaim {
            campaign_id: self.campaign_id,
            authority: self.authority,
        }
        .encode();
        submitter.submit(&payload)?;

        self.status = CampaignStatus::Cancelled;
        info!(
            "reclaimed campaign {} with {} of {} allocations claimed",
            hex::encode(self.campaign_id),
            self.claimed_count,
            self.allocation_count
        );
        Ok(())
    }

    /// Records one settled claim and completes the campaign when the last
    /// allocation is claimed.
    pub(crate) fn record_claim(&mut self) {
        self.claimed_count += 1;
        if self.claimed_count >= self.allocation_count {
            self.status = CampaignStatus::Completed;
            info!(
                "campaign {} fully claimed, marking completed",
                hex::encode(self.campaign_id)
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MemoryLedger;

    const EXPIRY: i64 = 1_900_000_000;

    fn draft_campaign() -> Campaign {
        Campaign::new(
            [1u8; 32],
            [2u8; 32],
            [3u8; 32],
            EXPIRY,
            EligibilityGate::None,
        )
    }

    #[test]
    fn test_new_campaign_starts_as_draft() {
        let campaign = draft_campaign();

        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert_eq!(campaign.allocation_count, 0);
        assert_eq!(campaign.claimed_count, 0);
        assert_eq!(campaign.merkle_root, [0u8; 32]);
    }

    #[test]
    fn test_activate_publishes_init_instruction() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();

        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.merkle_root, [9u8; 32]);
        assert_eq!(campaign.manifest_hash, [8u8; 32]);
        assert_eq!(campaign.allocation_count, 10);

        assert_eq!(ledger.accepted().len(), 1);
        assert_eq!(
            ledger.accepted()[0][0],
            0,
            "activation must submit an InitCampaign payload"
        );
    }

    #[test]
    fn test_activate_rejects_empty_campaign() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();

        let result = campaign.activate([9u8; 32], [8u8; 32], 0, EXPIRY - 1_000, &mut ledger);

        assert!(matches!(result, Err(LifecycleError::EmptyCampaign)));
        assert_eq!(campaign.status, CampaignStatus::Draft);
        assert!(ledger.accepted().is_empty());
    }

    #[test]
    fn test_activate_rejects_past_expiry() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();

        let at_expiry = campaign.activate([9u8; 32], [8u8; 32], 10, EXPIRY, &mut ledger);
        assert!(matches!(at_expiry, Err(LifecycleError::CampaignExpired)));

        let past_expiry = campaign.activate([9u8; 32], [8u8; 32], 10, EXPIRY + 1, &mut ledger);
        assert!(matches!(past_expiry, Err(LifecycleError::CampaignExpired)));
    }

    #[test]
    fn test_activate_rejects_non_draft() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();

        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();
        let again = campaign.activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger);

        assert!(matches!(again, Err(LifecycleError::CampaignNotDraft)));
    }

    #[test]
    fn test_pause_resume_cycle() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();
        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        campaign.pause().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Paused);

        assert!(matches!(
            campaign.pause(),
            Err(LifecycleError::CampaignNotActive)
        ));

        campaign.resume().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Active);

        assert!(matches!(
            campaign.resume(),
            Err(LifecycleError::CampaignNotPaused)
        ));
    }

    #[test]
    fn test_pause_requires_active() {
        let mut campaign = draft_campaign();

        assert!(matches!(
            campaign.pause(),
            Err(LifecycleError::CampaignNotActive)
        ));
    }

    #[test]
    fn test_close_is_terminal() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();
        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        campaign.close().unwrap();
        assert_eq!(campaign.status, CampaignStatus::Completed);

        assert!(matches!(
            campaign.pause(),
            Err(LifecycleError::CampaignNotActive)
        ));
        assert!(matches!(
            campaign.close(),
            Err(LifecycleError::CampaignNotActive)
        ));
    }

    #[test]
    fn test_reclaim_before_expiry_rejected() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();
        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        let result = campaign.reclaim(EXPIRY, &mut ledger);

        assert!(matches!(result, Err(LifecycleError::CampaignNotExpired)));
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(
            ledger.accepted().len(),
            1,
            "no reclaim payload may reach the ledger before expiry"
        );
    }

    #[test]
    fn test_reclaim_after_expiry_cancels() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();
        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        campaign.reclaim(EXPIRY + 1, &mut ledger).unwrap();

        assert_eq!(campaign.status, CampaignStatus::Cancelled);
        assert_eq!(ledger.accepted().len(), 2);
        assert_eq!(
            ledger.accepted()[1][0],
            2,
            "reclaim must submit a Reclaim payload"
        );
    }

    #[test]
    fn test_reclaim_requires_active() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();

        // Draft never escrowed anything.
        assert!(matches!(
            campaign.reclaim(EXPIRY + 1, &mut ledger),
            Err(LifecycleError::CampaignNotActive)
        ));

        // Paused must resume before reclaiming.
        campaign
            .activate([9u8; 32], [8u8; 32], 10, EXPIRY - 1_000, &mut ledger)
            .unwrap();
        campaign.pause().unwrap();
        assert!(matches!(
            campaign.reclaim(EXPIRY + 1, &mut ledger),
            Err(LifecycleError::CampaignNotActive)
        ));
    }

    #[test]
    fn test_record_claim_completes_on_last_allocation() {
        let mut campaign = draft_campaign();
        let mut ledger = MemoryLedger::new();
        campaign
            .activate([9u8; 32], [8u8; 32], 2, EXPIRY - 1_000, &mut ledger)
            .unwrap();

        campaign.record_claim();
        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.claimed_count, 1);

        campaign.record_claim();
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.claimed_count, 2);
    }
}
