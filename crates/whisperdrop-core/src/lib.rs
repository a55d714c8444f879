/*!
# WhisperDrop Core

Commitment and claim-verification engine for private token distributions.

A campaign operator commits to a recipient set with a merkle root instead of
publishing the list; each recipient receives a small inclusion proof they can
redeem exactly once. This crate owns the protocol byte layouts and the rules:

- **Allocations** and their domain-separated leaf hashes
- **Proof verification**: O(depth) folding against a published root
- **Nullifiers**: deterministic one-shot claim tags, unlinkable across
  campaigns
- **Eligibility gates** evaluated against holdings snapshots
- **Campaign lifecycle**: Draft -> Active -> (Paused) -> Completed/Cancelled
- **Ledger instructions**: the borsh payloads submitted for init, claim, and
  reclaim

Everything here is synchronous and free of I/O. The outside world appears
through two traits: [`LedgerSubmitter`] (settlement) and [`HoldingsSource`]
(gate evidence). Tree construction lives in `whisperdrop-merkle`, stealth
destinations in `whisperdrop-stealth`, and operator file formats in
`whisperdrop-manifest`.

## Claiming

```rust
use whisperdrop_core::{
    process_claim, Allocation, Campaign, ClaimProof, ClaimRequest, EligibilityGate,
    MemoryLedger, MerkleProofVerifier, StaticHoldings,
};

fn example(
    campaign: &mut Campaign,
    allocation: Allocation,
    proof: ClaimProof,
    now: i64,
) -> Result<(), Box<dyn std::error::Error>> {
    let request = ClaimRequest {
        allocation,
        proof,
        recipient_secret: b"recipient preimage".to_vec(),
        destination: [0u8; 32],
    };

    let mut ledger = MemoryLedger::new();
    let receipt = process_claim(
        campaign,
        &request,
        &MerkleProofVerifier,
        &StaticHoldings::new(),
        &mut ledger,
        now,
    )?;
    assert_eq!(receipt.amount, request.allocation.amount);
    Ok(())
}
```
*/

pub mod allocation;
pub mod campaign;
pub mod claim;
pub mod domains;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod ledger;
pub mod nullifier;
pub mod proof;

pub use allocation::{hash_allocation_leaf, Allocation, NONCE_LEN, RECIPIENT_COMMITMENT_LEN};
pub use campaign::{Campaign, CampaignStatus};
pub use claim::{process_claim, ClaimReceipt, ClaimRequest};
pub use error::{ClaimError, LifecycleError, ProtocolError};
pub use gate::{
    evaluate_gate, EligibilityGate, GateSpec, HeldAsset, HoldingsError, HoldingsSnapshot,
    HoldingsSource, StaticHoldings,
};
pub use instruction::LedgerInstruction;
pub use ledger::{LedgerSubmitter, MemoryLedger, SubmitAck, SubmitError};
pub use nullifier::derive_nullifier;
pub use proof::{combine_nodes, ClaimProof, MerkleProofVerifier, ProofVerifier};
