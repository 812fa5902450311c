//! Host-supplied secrets (RPC URLs, webhook URLs, API tokens).

use async_trait::async_trait;
use std::collections::HashMap;

use crate::error::SecretError;

/// Secret names read by the relay.
pub mod names {
    pub const JSON_RPC_URL: &str = "JSON_RPC_URL";
    pub const JSON_RPC_URL_FUJI: &str = "JSON_RPC_URL_FUJI";
    pub const DISCORD_WEBHOOK_URL: &str = "PROD_WEBHOOK_URL";
    pub const KNOCK_TOKEN: &str = "KNOCK_TOKEN";
    pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
    pub const WEBHOOK_URL_FUJI: &str = "FUJI_WEBHOOK_URL";
}

#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, name: &str) -> Result<String, SecretError>;
}

/// Reads secrets from the process environment, optionally under a prefix
/// (`prefix = "RELAY_"` reads `RELAY_KNOCK_TOKEN`).
#[derive(Debug, Clone, Default)]
pub struct EnvSecrets {
    prefix: Option<String>,
}

impl EnvSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }

    fn key(&self, name: &str) -> String {
        match &self.prefix {
            Some(p) => format!("{p}{name}"),
            None => name.to_string(),
        }
    }
}

#[async_trait]
impl SecretStore for EnvSecrets {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        let key = self.key(name);
        match std::env::var(&key) {
            Ok(v) if !v.is_empty() => Ok(v),
            Ok(_) | Err(std::env::VarError::NotPresent) => Err(SecretError::Missing { name: key }),
            Err(e) => Err(SecretError::Backend {
                name: key,
                reason: e.to_string(),
            }),
        }
    }
}

/// In-memory secrets, for tests and local replays.
#[derive(Debug, Clone, Default)]
pub struct MapSecrets {
    values: HashMap<String, String>,
}

impl MapSecrets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for MapSecrets {
    async fn get(&self, name: &str) -> Result<String, SecretError> {
        self.values
            .get(name)
            .cloned()
            .ok_or_else(|| SecretError::Missing {
                name: name.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn map_secrets_lookup() {
        let s = MapSecrets::new().with(names::KNOCK_TOKEN, "sk_test");
        assert_eq!(s.get("KNOCK_TOKEN").await.unwrap(), "sk_test");
        assert!(matches!(
            s.get("WEBHOOK_URL").await,
            Err(SecretError::Missing { .. })
        ));
    }

    #[tokio::test]
    async fn env_secrets_honours_prefix() {
        std::env::set_var("CHAINRELAY_TEST_ONLY_KNOCK", "tok");
        let s = EnvSecrets::with_prefix("CHAINRELAY_TEST_ONLY_");
        assert_eq!(s.get("KNOCK").await.unwrap(), "tok");
        assert!(s.get("ABSENT").await.is_err());
    }
}
