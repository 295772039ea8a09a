//! Argon2id password hashing and verification.
//!
//! Every hash uses a fresh random salt from [`OsRng`] and fixed cost
//! parameters. The PHC string format embeds the algorithm, parameters, and
//! salt, so verification needs nothing but the stored string. Plaintext
//! passwords must never be logged or persisted.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

use crate::error::CoreError;

/// Memory cost in KiB.
pub const HASH_MEMORY_KIB: u32 = 19_456;

/// Number of passes over memory.
pub const HASH_ITERATIONS: u32 = 2;

/// Degree of parallelism.
pub const HASH_PARALLELISM: u32 = 1;

fn hasher() -> Result<Argon2<'static>, CoreError> {
    let params = Params::new(HASH_MEMORY_KIB, HASH_ITERATIONS, HASH_PARALLELISM, None)
        .map_err(|e| CoreError::Internal(format!("invalid hash parameters: {e}")))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

/// Hash a plaintext password.
///
/// Fails with [`CoreError::Validation`] on empty input. Two calls with the
/// same input return different strings; both verify.
pub fn hash_password(password: &str) -> Result<String, CoreError> {
    if password.is_empty() {
        return Err(CoreError::Validation("Password cannot be empty".into()));
    }
    let salt = SaltString::generate(&mut OsRng);
    let hash = hasher()?
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| CoreError::Internal(format!("password hashing failed: {e}")))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// Returns `false` for empty input, a malformed hash string, or a mismatch.
/// Parameters are read from the hash itself, so hashes made with older cost
/// settings still verify.
pub fn verify_password(password: &str, hash: &str) -> bool {
    if password.is_empty() || hash.is_empty() {
        return false;
    }
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// `true` when `value` parses as a PHC hash string.
///
/// Guards the storage layer against persisting a plaintext password.
pub fn is_password_hash(value: &str) -> bool {
    PasswordHash::new(value).is_ok()
}
