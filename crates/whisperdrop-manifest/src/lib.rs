/*!
# WhisperDrop Manifest

Campaign assembly: allocation CSVs in, committed roots and per-recipient
claim packages out.

## Pipeline

1. Operator tooling produces `allocations.csv` (`recipient`, `amount`,
   `nonce`), with the nonce column optional per row.
2. [`read_allocations_csv`] validates headers, field widths, and
   duplicate `(recipient, nonce)` pairs.
3. [`CompiledCampaign::assemble`] fills missing nonces, builds the
   allocation tree, and binds the list into a manifest hash.
4. [`CompiledCampaign::write_claim_packages`] emits one JSON file per
   allocation carrying the proof that recipient needs to claim.

The manifest hash commits to the exact allocation list and order, so
anyone holding the published campaign parameters can re-run assembly over
a disclosed list and check both the root and the manifest byte for byte.

```rust
use rand::rngs::OsRng;
use whisperdrop_manifest::{read_allocations_csv, CompiledCampaign, ManifestResult};

fn assemble_from_csv(campaign_id: [u8; 32]) -> ManifestResult<()> {
    let rows = read_allocations_csv("allocations.csv")?;
    let compiled = CompiledCampaign::assemble(campaign_id, &rows, &mut OsRng)?;
    compiled.write_claim_packages("packages/")?;
    Ok(())
}
```
*/

pub mod compile;
pub mod errors;
pub mod schemas;
pub mod validation;

// Re-export main types for convenience
pub use compile::{manifest_hash, read_claim_package, CompiledCampaign};
pub use errors::{ManifestError, ManifestResult};
pub use schemas::{AllocationRow, ClaimPackage, ALLOCATION_CSV_HEADERS};
pub use validation::{read_allocations_csv, validate_allocation_rows, write_allocations_csv};
