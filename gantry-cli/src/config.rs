//! Configuration module
//!
//! Handles CLI configuration: build server transport settings and the
//! retry/cache policy wrapped around the resolver.

use gantry_client::ClientConfig;
use gantry_core::resolver::RetryPolicy;
use std::time::Duration;

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Proxy used for every request to the build server
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    pub insecure: bool,

    /// Per-request timeout
    pub timeout: Duration,

    /// Total lookup attempts per work item (1 disables retrying)
    pub attempts: u32,

    /// Memoize lookups per (work item, reference date)
    pub cache: bool,

    pub username: Option<String>,

    pub api_token: Option<String>,
}

impl Config {
    /// Validates the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.timeout.as_secs() == 0 {
            anyhow::bail!("timeout must be greater than 0");
        }

        if self.attempts == 0 {
            anyhow::bail!("attempts must be at least 1");
        }

        if let Some(proxy) = &self.proxy {
            if !["http://", "https://", "socks5://"]
                .iter()
                .any(|scheme| proxy.starts_with(scheme))
            {
                anyhow::bail!("proxy must start with http://, https:// or socks5://");
            }
        }

        if self.username.is_some() != self.api_token.is_some() {
            anyhow::bail!("user and api token must be given together");
        }

        Ok(())
    }

    /// Transport settings for the build server client
    pub fn client_config(&self) -> ClientConfig {
        let mut client_config = ClientConfig {
            proxy: self.proxy.clone(),
            accept_invalid_certs: self.insecure,
            timeout: self.timeout,
            ..ClientConfig::default()
        };

        if let (Some(user), Some(token)) = (&self.username, &self.api_token) {
            client_config = client_config.with_credentials(user, token);
        }

        client_config
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(self.attempts)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            proxy: None,
            insecure: false,
            timeout: Duration::from_secs(30),
            attempts: 3,
            cache: true,
            username: None,
            api_token: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.timeout, Duration::from_secs(30));
        assert_eq!(config.retry_policy().max_attempts, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();

        // Valid config should pass
        assert!(config.validate().is_ok());

        // Proxy without scheme should fail
        config.proxy = Some("10.224.23.8:3128".to_string());
        assert!(config.validate().is_err());

        config.proxy = Some("http://10.224.23.8:3128".to_string());
        assert!(config.validate().is_ok());

        // Zero timeout should fail
        config.timeout = Duration::ZERO;
        assert!(config.validate().is_err());
        config.timeout = Duration::from_secs(5);

        // Credentials are all-or-nothing
        config.username = Some("ci-bot".to_string());
        assert!(config.validate().is_err());
        config.api_token = Some("token".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_client_config() {
        let config = Config {
            proxy: Some("http://proxy:3128".to_string()),
            insecure: true,
            username: Some("ci-bot".to_string()),
            api_token: Some("token".to_string()),
            ..Config::default()
        };

        let client_config = config.client_config();
        assert_eq!(client_config.proxy.as_deref(), Some("http://proxy:3128"));
        assert!(client_config.accept_invalid_certs);
        assert_eq!(client_config.credentials.unwrap().username, "ci-bot");
    }
}
