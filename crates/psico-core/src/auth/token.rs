//! Signed bearer tokens (HS256 JWT) carrying therapist identity.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{AuthError, AuthResult};
use crate::models::Therapist;

pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 8;

/// Token claims. Field names match what the web client decodes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    #[serde(rename = "id")]
    pub therapist_id: i64,
    #[serde(rename = "usuario")]
    pub username: String,
    #[serde(rename = "esAdmin")]
    pub is_admin: bool,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(therapist: &Therapist, expires_in: Duration) -> Self {
        let now = Utc::now();
        Self {
            therapist_id: therapist.id,
            username: therapist.username.clone(),
            is_admin: therapist.is_admin,
            iat: now.timestamp(),
            exp: now
                .checked_add_signed(expires_in)
                .unwrap_or(DateTime::<Utc>::MAX_UTC)
                .timestamp(),
        }
    }

    /// The therapist identity the token was issued for.
    pub fn therapist(&self) -> Therapist {
        Therapist {
            id: self.therapist_id,
            username: self.username.clone(),
            is_admin: self.is_admin,
        }
    }
}

/// Issues and verifies session tokens with a process-wide signing key.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
    fingerprint: String,
}

impl TokenIssuer {
    /// Build an issuer from a configured secret. The signing key is the
    /// SHA-256 digest of the secret.
    pub fn new(secret: &SecretString, ttl: Duration) -> Self {
        let key = Sha256::digest(secret.expose_secret().as_bytes());
        Self::from_key(&key, ttl)
    }

    /// Build an issuer with a random key. Tokens do not survive a restart.
    pub fn with_random_key(ttl: Duration) -> Self {
        let mut key = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut key);
        Self::from_key(&key, ttl)
    }

    fn from_key(key: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        let digest = Sha256::digest(key);
        Self {
            encoding_key: EncodingKey::from_secret(key),
            decoding_key: DecodingKey::from_secret(key),
            validation,
            ttl,
            fingerprint: hex::encode(&digest[..4]),
        }
    }

    /// Short, non-reversible identifier of the signing key, safe to log.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Issue a token for an authenticated therapist.
    pub fn issue(&self, therapist: &Therapist) -> AuthResult<String> {
        let claims = Claims::new(therapist, self.ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::Encoding(e.to_string()))
    }

    /// Verify signature and expiry, returning the embedded claims.
    pub fn verify(&self, token: &str) -> AuthResult<Claims> {
        decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::InvalidToken,
            })
    }
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_hours", &self.ttl.num_hours())
            .field("fingerprint", &self.fingerprint)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn therapist(is_admin: bool) -> Therapist {
        Therapist {
            id: 4,
            username: "laura".into(),
            is_admin,
        }
    }

    fn issuer() -> TokenIssuer {
        let secret = SecretString::new("una-clave-de-prueba-suficientemente-larga".into());
        TokenIssuer::new(&secret, Duration::hours(DEFAULT_TOKEN_TTL_HOURS))
    }

    #[test]
    fn test_issue_and_verify_round_trip() {
        let issuer = issuer();
        let token = issuer.issue(&therapist(true)).unwrap();
        assert_eq!(token.matches('.').count(), 2);

        let claims = issuer.verify(&token).unwrap();
        assert_eq!(claims.therapist(), therapist(true));
        assert_eq!(claims.exp - claims.iat, 8 * 3600);
        assert!(claims.exp > Utc::now().timestamp());
    }

    #[test]
    fn test_oversized_ttl_saturates() {
        let claims = Claims::new(&therapist(false), Duration::MAX);
        assert_eq!(claims.exp, DateTime::<Utc>::MAX_UTC.timestamp());
    }

    #[test]
    fn test_expired_token_rejected() {
        let secret = SecretString::new("una-clave-de-prueba-suficientemente-larga".into());
        let issuer = TokenIssuer::new(&secret, Duration::hours(-1));
        let token = issuer.issue(&therapist(false)).unwrap();

        assert!(matches!(issuer.verify(&token), Err(AuthError::TokenExpired)));
    }

    #[test]
    fn test_token_from_other_key_rejected() {
        let token = TokenIssuer::with_random_key(Duration::hours(1))
            .issue(&therapist(true))
            .unwrap();
        assert!(matches!(issuer().verify(&token), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(issuer().verify("abc.def.ghi"), Err(AuthError::InvalidToken)));
        assert!(matches!(issuer().verify(""), Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_fingerprint_is_stable_and_short() {
        assert_eq!(issuer().fingerprint(), issuer().fingerprint());
        assert_eq!(issuer().fingerprint().len(), 8);
        assert_ne!(
            issuer().fingerprint(),
            TokenIssuer::with_random_key(Duration::hours(1)).fingerprint()
        );
    }
}
