use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

use super::AuthError;
use crate::site_config::SiteConfig;

const PHC_PREFIX: &str = "$argon2";

/// Check a login attempt against the configured admin credentials.
///
/// The configured password may be stored as an argon2 PHC string; anything
/// else is compared as plaintext.
pub fn verify_admin(config: &SiteConfig, username: &str, password: &str) -> bool {
    if username != config.admin.username {
        return false;
    }
    let stored = &config.admin.password;
    if !stored.starts_with(PHC_PREFIX) {
        return stored == password;
    }
    match PasswordHash::new(stored) {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(e) => {
            tracing::error!("configured admin password hash is malformed: {e}");
            false
        }
    }
}

/// Produce an argon2id PHC string suitable for `admin.password`.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AuthError::Hashing(e.to_string()))
}
