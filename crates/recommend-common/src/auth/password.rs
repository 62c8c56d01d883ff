//! Recommender credential hashing and password policy
//!
//! Uses Argon2id with a random per-password salt.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHasher, SaltString},
    Argon2,
};
use recommend_core::DomainError;

use crate::error::AppError;

const MIN_PASSWORD_LEN: usize = 8;
const MAX_PASSWORD_LEN: usize = 128;

/// Hash a password using Argon2id
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Password hashing failed: {e}")))
}

/// Password policy: 8 to 128 characters with an uppercase letter, a
/// lowercase letter and a digit.
pub fn validate_password_strength(password: &str) -> Result<(), DomainError> {
    let length = password.chars().count();
    if length < MIN_PASSWORD_LEN {
        return Err(DomainError::WeakPassword(format!(
            "must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if length > MAX_PASSWORD_LEN {
        return Err(DomainError::WeakPassword(format!(
            "must be at most {MAX_PASSWORD_LEN} characters long"
        )));
    }

    let checks: [(fn(char) -> bool, &str); 3] = [
        (char::is_uppercase, "an uppercase letter"),
        (char::is_lowercase, "a lowercase letter"),
        (|c: char| c.is_ascii_digit(), "a digit"),
    ];
    for (check, what) in checks {
        if !password.chars().any(check) {
            return Err(DomainError::WeakPassword(format!(
                "must contain at least {what}"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_argon2_phc_string() {
        let hash = hash_password("Recommend3r!").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("Recommend3r!"));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("SamePassw0rd").unwrap();
        let b = hash_password("SamePassw0rd").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_policy() {
        assert!(validate_password_strength("Str0ngPass").is_ok());

        for weak in ["Sh0rt", "alllower1", "ALLUPPER1", "NoDigitsHere"] {
            assert!(
                matches!(validate_password_strength(weak), Err(DomainError::WeakPassword(_))),
                "{weak} should fail"
            );
        }

        let long = format!("Aa1{}", "x".repeat(MAX_PASSWORD_LEN));
        assert!(validate_password_strength(&long).is_err());
    }
}
