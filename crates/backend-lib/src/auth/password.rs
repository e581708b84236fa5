// ============================
// eventhub-backend-lib/src/auth/password.rs
// ============================
//! Password hashing and verification.
use scrypt::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Params, Scrypt,
};
use zeroize::Zeroize;

use crate::error::AppError;

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// scrypt parameters for a given `log2(N)` work factor
pub fn hash_params(log_n: u8) -> Result<Params, AppError> {
    Params::new(log_n, Params::RECOMMENDED_R, Params::RECOMMENDED_P, Params::RECOMMENDED_LEN)
        .map_err(|e| AppError::PasswordHash(e.to_string()))
}

/// Hash a password using scrypt with a fresh random salt
pub fn hash_password(plain: &str, log_n: u8) -> Result<String, AppError> {
    let params = hash_params(log_n)?;
    let salt = SaltString::generate(&mut OsRng);
    let hash = Scrypt
        .hash_password_customized(plain.as_bytes(), None, None, params, &salt)?
        .to_string();
    Ok(hash)
}

/// Verify a password against a stored PHC hash string.
///
/// Uses the library's verifier, never a plain string comparison. An
/// unparseable hash never matches.
pub fn verify_password(hash: &str, plain: &str) -> bool {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(h) => h,
        Err(_) => return false,
    };
    Scrypt.verify_password(plain.as_bytes(), &parsed_hash).is_ok()
}

/// Hash on the blocking pool and zeroize the plaintext afterwards
pub async fn hash_password_secure(mut plain: String, log_n: u8) -> Result<String, AppError> {
    let hash = tokio::task::spawn_blocking(move || {
        let result = hash_password(&plain, log_n);
        plain.zeroize();
        result
    })
    .await??;
    Ok(hash)
}

/// Verify on the blocking pool and zeroize the plaintext afterwards
pub async fn verify_password_secure(hash: String, mut plain: String) -> Result<bool, AppError> {
    let matches = tokio::task::spawn_blocking(move || {
        let ok = verify_password(&hash, &plain);
        plain.zeroize();
        ok
    })
    .await?;
    Ok(matches)
}
