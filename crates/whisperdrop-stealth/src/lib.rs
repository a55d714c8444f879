/*!
# WhisperDrop Stealth

One-time payout destinations, so a claim never points back at the
recipient's published identity.

Recipients hold two X25519 keypairs. The **view** pair lets them (or a
delegated watcher) scan published commitments for ones addressed to them;
the **spend** pair is folded into every derived destination and never
touches the scanning path. Senders burn a fresh ephemeral secret per
commitment, so two payouts to the same address share nothing an observer
can correlate.

A commitment carries a one-byte view tag next to the full destination.
Scanners compare that byte first and only recompute the destination on a
match, which discards roughly 255 of every 256 foreign commitments at the
cost of a single hash.

```rust
use rand::rngs::OsRng;
use whisperdrop_stealth::{generate_commitment, scan, StealthError, StealthKeys};

fn find_my_payouts() -> Result<(), StealthError> {
    let keys = StealthKeys::generate(&mut OsRng);

    // A sender derives a destination from the recipient's address.
    let commitment = generate_commitment(&keys.address(), &mut OsRng)?;

    // The recipient later recognizes it with the view secret alone.
    assert_eq!(scan(&keys, &[commitment]), vec![0]);
    Ok(())
}
```

Low-order counterparty keys collapse the Diffie-Hellman exchange to the
identity; generation refuses them with [`StealthError::DegenerateSharedSecret`]
and scanning skips such candidates silently.
*/

pub mod commitment;
pub mod keys;

pub use commitment::{generate_commitment, scan, StealthCommitment, StealthError};
pub use keys::{StealthAddress, StealthKeys};
