use uuid::Uuid;

use super::{jwt::JwtKeys, password};
use crate::config::JwtConfig;

/// Password hashing and bearer-token issuance behind one seam.
pub trait Credentials: Send + Sync {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String>;
    fn verify_password(&self, plain: &str, hash: &str) -> anyhow::Result<bool>;
    fn issue_token(&self, user_id: Uuid) -> anyhow::Result<String>;
    /// Returns the user id bound to a valid, unexpired token.
    fn verify_token(&self, token: &str) -> anyhow::Result<Uuid>;
}

/// Argon2 password hashes and HS256 JWTs.
#[derive(Clone)]
pub struct JwtCredentials {
    keys: JwtKeys,
}

impl JwtCredentials {
    pub fn new(cfg: &JwtConfig) -> Self {
        Self {
            keys: JwtKeys::from(cfg),
        }
    }
}

impl Credentials for JwtCredentials {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String> {
        password::hash_password(plain)
    }

    fn verify_password(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        password::verify_password(plain, hash)
    }

    fn issue_token(&self, user_id: Uuid) -> anyhow::Result<String> {
        self.keys.sign(user_id)
    }

    fn verify_token(&self, token: &str) -> anyhow::Result<Uuid> {
        Ok(self.keys.verify(token)?.sub)
    }
}

/// Deterministic stand-in for tests: no salt, no signature, no expiry.
#[derive(Clone, Default)]
pub struct FakeCredentials;

const FAKE_HASH_PREFIX: &str = "fake-hash:";
const FAKE_TOKEN_PREFIX: &str = "fake-token:";

impl Credentials for FakeCredentials {
    fn hash_password(&self, plain: &str) -> anyhow::Result<String> {
        Ok(format!("{FAKE_HASH_PREFIX}{plain}"))
    }

    fn verify_password(&self, plain: &str, hash: &str) -> anyhow::Result<bool> {
        let stored = hash
            .strip_prefix(FAKE_HASH_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("not a fake hash"))?;
        Ok(stored == plain)
    }

    fn issue_token(&self, user_id: Uuid) -> anyhow::Result<String> {
        Ok(format!("{FAKE_TOKEN_PREFIX}{user_id}"))
    }

    fn verify_token(&self, token: &str) -> anyhow::Result<Uuid> {
        let id = token
            .strip_prefix(FAKE_TOKEN_PREFIX)
            .ok_or_else(|| anyhow::anyhow!("not a fake token"))?;
        Ok(Uuid::parse_str(id)?)
    }
}
