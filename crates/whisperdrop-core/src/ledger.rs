use std::collections::HashSet;

use thiserror::Error;

use crate::instruction::LedgerInstruction;

/// Acknowledgement returned by the ledger for an accepted payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitAck {
    /// Ledger-assigned sequence for the accepted payload.
    pub sequence: u64,
}

/// Errors surfaced by a ledger submitter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The ledger's atomic insert-if-absent on the nullifier lost; some
    /// claim with this nullifier settled first.
    #[error("nullifier already recorded on the ledger")]
    NullifierExists,

    #[error("ledger rejected the payload: {0}")]
    Rejected(String),
}

/// Boundary to the external settlement ledger.
///
/// The engine hands over fully encoded [`LedgerInstruction`] payloads and
/// reads back a verdict. Signing, fee handling, and broadcast mechanics all
/// live behind this trait; the engine never sees them.
pub trait LedgerSubmitter {
    fn submit(&mut self, payload: &[u8]) -> Result<SubmitAck, SubmitError>;
}

/// In-memory ledger with the same nullifier semantics as a real one.
///
/// Decodes each payload, records claim nullifiers with insert-if-absent, and
/// keeps every accepted payload for inspection. Used by tests and local dry
/// runs of campaign flows.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    nullifiers: HashSet<[u8; 32]>,
    accepted: Vec<Vec<u8>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepted payloads in submission order.
    pub fn accepted(&self) -> &[Vec<u8>] {
        &self.accepted
    }

    pub fn contains_nullifier(&self, nullifier: &[u8; 32]) -> bool {
        self.nullifiers.contains(nullifier)
    }
}

impl LedgerSubmitter for MemoryLedger {
    fn submit(&mut self, payload: &[u8]) -> Result<SubmitAck, SubmitError> {
        match LedgerInstruction::decode(payload) {
            Ok(LedgerInstruction::Claim { nullifier, .. }) => {
                if !self.nullifiers.insert(nullifier) {
                    return Err(SubmitError::NullifierExists);
                }
            }
            Ok(_) => {}
            Err(err) => return Err(SubmitError::Rejected(err.to_string())),
        }

        self.accepted.push(payload.to_vec());
        Ok(SubmitAck {
            sequence: self.accepted.len() as u64,
        })
    }
}
