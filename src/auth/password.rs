//! bcrypt wrappers. Plaintext passwords are only ever handled here.

use crate::error::AppError;

/// One-way salted hash of `password` at the configured bcrypt `cost` (4..=31).
pub fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    Ok(bcrypt::hash(password, cost)?)
}

/// Constant-time check of `password` against a stored hash.
///
/// `Ok(false)` is a mismatch; `Err` means the stored hash is unusable.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AppError> {
    Ok(bcrypt::verify(password, stored_hash)?)
}
