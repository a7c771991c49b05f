//! Password hashing.

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};

use crate::auth::Password;

/// Minimum accepted password length.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a password into a PHC string.
///
/// # Errors
///
/// Returns an error if argon2 fails to produce a hash.
pub(crate) fn hash_password(password: &Password) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.expose().as_bytes(), &salt)?;

    Ok(hash.to_string())
}

/// Check a password against a stored PHC string. Unparseable hashes never match.
pub(crate) fn verify_password(password: &Password, hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.expose().as_bytes(), &parsed)
        .is_ok()
}

/// Reject passwords that are too short or made only of digits.
pub(crate) fn password_is_acceptable(password: &Password) -> bool {
    let value = password.expose();

    value.chars().count() >= MIN_PASSWORD_LENGTH && !value.chars().all(|c| c.is_ascii_digit())
}
