//! Password hashing

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use almacen_errors::{AppError, AppResult};

/// Argon2 password hash
#[derive(Debug, Clone)]
pub struct HashedPassword(String);

impl HashedPassword {
    pub fn from_plain(password: &str) -> AppResult<Self> {
        validate_password_strength(password)?;

        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map_err(|e| AppError::internal(format!("Failed to hash password: {}", e)))?;

        Ok(Self(hash.to_string()))
    }

    pub fn from_hash(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn verify(&self, password: &str) -> AppResult<bool> {
        let parsed_hash = PasswordHash::new(&self.0)
            .map_err(|e| AppError::internal(format!("Invalid password hash: {}", e)))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate_password_strength(password: &str) -> AppResult<()> {
    if password.len() < 8 {
        return Err(AppError::validation(
            "Password must be at least 8 characters",
        ));
    }
    if password.len() > 128 {
        return Err(AppError::validation(
            "Password must be at most 128 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hashed = HashedPassword::from_plain("correct horse").unwrap();
        assert!(hashed.verify("correct horse").unwrap());
        assert!(!hashed.verify("battery staple").unwrap());
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(HashedPassword::from_plain("short").is_err());
    }
}
