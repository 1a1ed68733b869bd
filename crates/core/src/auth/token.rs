use std::str::FromStr;

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use super::AuthError;
use crate::site_config::JwtSettings;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Admin username.
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Sign an access token for `subject`, valid for the configured number of minutes.
pub fn issue_token(settings: &JwtSettings, subject: &str) -> Result<String, AuthError> {
    let algorithm = hmac_algorithm(&settings.algorithm)?;
    let now = Utc::now();
    let claims = Claims {
        sub: subject.to_string(),
        iat: now.timestamp(),
        exp: (now + Duration::minutes(settings.access_token_expire_minutes)).timestamp(),
    };
    encode(
        &Header::new(algorithm),
        &claims,
        &EncodingKey::from_secret(settings.secret_key.as_bytes()),
    )
    .map_err(AuthError::Signing)
}

/// Validate signature and expiry, returning the claims.
pub fn verify_token(settings: &JwtSettings, token: &str) -> Result<Claims, AuthError> {
    let algorithm = hmac_algorithm(&settings.algorithm)?;
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.secret_key.as_bytes()),
        &Validation::new(algorithm),
    )
    .map(|data| data.claims)
    .map_err(|_| AuthError::InvalidToken)
}

/// Only shared-secret algorithms make sense with a single configured secret.
fn hmac_algorithm(name: &str) -> Result<Algorithm, AuthError> {
    match Algorithm::from_str(name) {
        Ok(alg @ (Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512)) => Ok(alg),
        _ => Err(AuthError::UnsupportedAlgorithm(name.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site_config::SiteConfig;

    fn settings() -> JwtSettings {
        SiteConfig::default().jwt
    }

    #[test]
    fn issued_token_verifies() {
        let token = issue_token(&settings(), "admin").unwrap();
        let claims = verify_token(&settings(), &token).unwrap();
        assert_eq!(claims.sub, "admin");
        assert_eq!(claims.exp - claims.iat, 1440 * 60);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue_token(&settings(), "admin").unwrap();
        let mut other = settings();
        other.secret_key = "another-secret".to_string();
        assert!(matches!(
            verify_token(&other, &token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let mut expired = settings();
        expired.access_token_expire_minutes = -10;
        let token = issue_token(&expired, "admin").unwrap();
        assert!(verify_token(&settings(), &token).is_err());
    }

    #[test]
    fn hs384_round_trips() {
        let mut s = settings();
        s.algorithm = "HS384".to_string();
        let token = issue_token(&s, "admin").unwrap();
        assert!(verify_token(&s, &token).is_ok());
        assert!(verify_token(&settings(), &token).is_err());
    }

    #[test]
    fn asymmetric_algorithms_are_refused() {
        let mut s = settings();
        s.algorithm = "RS256".to_string();
        assert!(matches!(
            issue_token(&s, "admin"),
            Err(AuthError::UnsupportedAlgorithm(_))
        ));
    }

    #[test]
    fn garbage_token_is_rejected() {
        assert!(verify_token(&settings(), "not.a.jwt").is_err());
    }
}
