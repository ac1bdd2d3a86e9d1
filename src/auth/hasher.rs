//! Password hashing
//!
//! bcrypt with a fresh random salt per hash. The salt and cost are embedded in
//! the encoded output, so verification needs nothing but the stored string.

use crate::error::AuthError;

/// Lowest cost bcrypt accepts.
pub const MIN_COST: u32 = 4;
/// Highest cost bcrypt accepts.
pub const MAX_COST: u32 = 31;

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

impl PasswordHasher {
    /// Creates a hasher with the given work factor.
    ///
    /// Costs outside `MIN_COST..=MAX_COST` are rejected by bcrypt at hash time.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hashes `password` with a newly generated salt.
    pub fn hash(&self, password: &str) -> Result<String, AuthError> {
        Ok(bcrypt::hash(password, self.cost)?)
    }

    /// Recomputes the hash of `password` with the salt embedded in
    /// `password_hash` and compares in constant time.
    ///
    /// Errors only when `password_hash` is not a valid bcrypt encoding.
    pub fn verify(&self, password: &str, password_hash: &str) -> Result<bool, AuthError> {
        Ok(bcrypt::verify(password, password_hash)?)
    }
}
