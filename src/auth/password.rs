use anyhow::Context;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use rand::rngs::OsRng;
use std::sync::Arc;
use tracing::error;

use crate::config::PasswordConfig;

/// Argon2id password hashing with configurable cost.
#[derive(Clone)]
pub struct PasswordEncoder {
    params: Params,
    /// Hash of a random secret at the configured cost, verified against
    /// when there is no stored hash to check.
    decoy: Arc<str>,
}

impl PasswordEncoder {
    pub fn new(cfg: &PasswordConfig) -> anyhow::Result<Self> {
        let params = Params::new(cfg.memory_kib, cfg.iterations, cfg.parallelism, None)
            .map_err(|e| anyhow::anyhow!(e.to_string()))
            .context("invalid argon2 parameters")?;
        let mut encoder = Self {
            params,
            decoy: Arc::from(""),
        };
        let secret = SaltString::generate(&mut OsRng);
        encoder.decoy = encoder.encode(secret.as_str())?.into();
        Ok(encoder)
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hashes `plain` with a fresh salt into a PHC string.
    pub fn encode(&self, plain: &str) -> anyhow::Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2()
            .hash_password(plain.as_bytes(), &salt)
            .map_err(|e| {
                error!(error = %e, "argon2 hash_password error");
                anyhow::anyhow!(e.to_string())
            })?
            .to_string();
        Ok(hash)
    }

    /// Constant-time check of `plain` against a stored hash. The cost
    /// parameters are read from the hash itself.
    pub fn matches(&self, plain: &str, hash: &str) -> bool {
        let parsed = match PasswordHash::new(hash) {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "argon2 parse hash error");
                return false;
            }
        };
        self.argon2()
            .verify_password(plain.as_bytes(), &parsed)
            .is_ok()
    }

    /// Spends the same work as `matches` on a real hash and always fails.
    /// Used when the account being checked does not exist.
    pub fn reject(&self, plain: &str) -> bool {
        self.matches(plain, &self.decoy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder() -> PasswordEncoder {
        PasswordEncoder::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .expect("valid params")
    }

    #[test]
    fn encode_and_match() {
        let enc = encoder();
        let hash = enc.encode("Secur3P@ssw0rd!").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"));
        assert!(enc.matches("Secur3P@ssw0rd!", &hash));
    }

    #[test]
    fn rejects_wrong_password() {
        let enc = encoder();
        let hash = enc.encode("correct-horse-battery-staple").expect("hashing should succeed");
        assert!(!enc.matches("wrong-password", &hash));
    }

    #[test]
    fn salts_every_hash() {
        let enc = encoder();
        let a = enc.encode("same").expect("hash");
        let b = enc.encode("same").expect("hash");
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_never_matches() {
        assert!(!encoder().matches("anything", "not-a-valid-hash"));
    }

    #[test]
    fn decoy_hash_uses_configured_cost_and_never_matches() {
        let enc = encoder();
        assert!(enc.decoy.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(!enc.reject(""));
        assert!(!enc.reject("Secur3P@ssw0rd!"));
    }

    #[test]
    fn rejects_zero_iterations() {
        let cfg = PasswordConfig {
            iterations: 0,
            ..PasswordConfig::default()
        };
        assert!(PasswordEncoder::new(&cfg).is_err());
    }
}
