// ============================
// eventhub-backend-lib/src/auth/mod.rs
// ============================
//! Authentication module.

pub mod password;
pub mod token;

pub use password::{
    hash_password, hash_password_secure, verify_password, verify_password_secure,
    MIN_PASSWORD_LENGTH,
};
pub use token::{Claims, TokenError, TokenService};
