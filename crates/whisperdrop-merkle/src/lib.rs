/*!
# WhisperDrop Merkle

Batch-side tree construction for campaign commitments.

Builds the binary allocation tree whose root a campaign publishes, and
generates the per-recipient inclusion proofs that `whisperdrop-core`
verifies. Odd levels pad by duplicating their last element, so roots here and
the fold-based verifier agree byte for byte.

[`TreeStore`] owns built trees across requests; nothing in this crate (or the
workspace) keeps global state.
*/

pub mod store;
pub mod tree;

pub use store::TreeStore;
pub use tree::{AllocationTree, TreeError};
