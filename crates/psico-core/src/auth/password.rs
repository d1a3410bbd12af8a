//! Argon2id password hashing.

use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::RngCore;

use super::{AuthError, AuthResult};

const SALT_LEN: usize = 16;
const DUMMY_PASSWORD: &str = "psico-timing-equalizer";

/// Argon2 cost parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HashParams {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: Params::DEFAULT_M_COST,
            iterations: Params::DEFAULT_T_COST,
            parallelism: Params::DEFAULT_P_COST,
        }
    }
}

impl HashParams {
    /// Cheapest parameters argon2 accepts. For tests only.
    pub fn insecure_fast() -> Self {
        Self {
            memory_kib: Params::MIN_M_COST.max(8),
            iterations: 1,
            parallelism: 1,
        }
    }

    fn to_params(self) -> AuthResult<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| AuthError::Params(e.to_string()))
    }

    pub fn validate(&self) -> AuthResult<()> {
        self.to_params().map(|_| ())
    }
}

/// Salted one-way password hasher producing PHC strings.
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
    dummy_hash: String,
}

impl Argon2Hasher {
    pub fn new(params: HashParams) -> AuthResult<Self> {
        let mut hasher = Self {
            params: params.to_params()?,
            dummy_hash: String::new(),
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD)?;
        Ok(hasher)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash a password with a fresh random salt.
    pub fn hash(&self, password: &str) -> AuthResult<String> {
        let mut salt_bytes = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt_bytes);
        let salt =
            SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::Hashing(e.to_string()))?;

        self.argon2()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AuthError::Hashing(e.to_string()))
    }

    /// Check a password against a stored PHC string. Cost parameters are read
    /// from the stored hash, so hashes made under older settings still verify.
    pub fn verify(&self, password: &str, hash: &str) -> AuthResult<bool> {
        let parsed = PasswordHash::new(hash).map_err(|e| AuthError::Hashing(e.to_string()))?;
        Ok(self
            .argon2()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    /// Run one verification against a fixed hash and discard the result.
    /// Used when the account does not exist, so both login failures cost the same.
    pub fn verify_dummy(&self, password: &str) {
        let _ = self.verify(password, &self.dummy_hash);
    }
}

impl std::fmt::Debug for Argon2Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Argon2Hasher")
            .field("memory_kib", &self.params.m_cost())
            .field("iterations", &self.params.t_cost())
            .field("parallelism", &self.params.p_cost())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::new(HashParams::insecure_fast()).unwrap()
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = hasher();
        let hash = hasher.hash("secreto1").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("secreto1"));
        assert!(hasher.verify("secreto1", &hash).unwrap());
        assert!(!hasher.verify("secreto2", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let hasher = hasher();
        let a = hasher.hash("secreto1").unwrap();
        let b = hasher.hash("secreto1").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_verify_with_different_cost_settings() {
        let hash = hasher().hash("secreto1").unwrap();
        let stronger = Argon2Hasher::new(HashParams {
            memory_kib: 64,
            iterations: 2,
            parallelism: 1,
        })
        .unwrap();
        assert!(stronger.verify("secreto1", &hash).unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(hasher().verify("secreto1", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let params = HashParams {
            memory_kib: 1,
            iterations: 0,
            parallelism: 1,
        };
        assert!(params.validate().is_err());
        assert!(Argon2Hasher::new(params).is_err());
    }
}
