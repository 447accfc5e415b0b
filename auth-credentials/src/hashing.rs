//! Password hash comparison.
//!
//! Only slow, salted hashes are acceptable here. The verifier talks to the
//! [`HashComparator`] trait; [`BcryptComparator`] is the production
//! implementation.

use crate::error::Result;

/// Plaintext used to build the decoy hash for unknown accounts.
const DECOY_PLAINTEXT: &str = "credgate-decoy-password";

pub trait HashComparator: Send + Sync {
    /// Returns true when `plaintext` hashes to `hash`.
    ///
    /// An unparseable `hash` is a mismatch, not an error.
    fn matches(&self, plaintext: &str, hash: &str) -> bool;

    /// A well-formed hash of a password nobody knows.
    ///
    /// Compared against when the account does not exist, so the unknown
    /// account path costs the same as a wrong password. That only holds
    /// for stored hashes at the decoy's cost; accounts hashed at another
    /// cost stay distinguishable by timing until they are rehashed.
    fn decoy_hash(&self) -> &str;
}

/// bcrypt-backed comparator.
pub struct BcryptComparator {
    cost: u32,
    decoy: String,
}

impl BcryptComparator {
    /// Builds a comparator whose decoy hash uses `cost`, so decoy
    /// comparisons take as long as real ones at that cost.
    ///
    /// # Errors
    ///
    /// Fails when `cost` is outside bcrypt's accepted range.
    pub fn new(cost: u32) -> Result<Self> {
        let decoy = bcrypt::hash(DECOY_PLAINTEXT, cost)?;
        Ok(Self { cost, decoy })
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes a password with this comparator's cost.
    ///
    /// # Errors
    ///
    /// Propagates bcrypt failures.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        Ok(bcrypt::hash(plaintext, self.cost)?)
    }
}

impl HashComparator for BcryptComparator {
    fn matches(&self, plaintext: &str, hash: &str) -> bool {
        match bcrypt::verify(plaintext, hash) {
            Ok(matched) => matched,
            Err(e) => {
                tracing::warn!(error = %e, "stored password hash could not be parsed");
                false
            }
        }
    }

    fn decoy_hash(&self) -> &str {
        &self.decoy
    }
}
