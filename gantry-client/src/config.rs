//! Client configuration
//!
//! Everything the HTTP layer needs is passed in explicitly. Proxy settings in
//! the process environment are ignored so that several clients with
//! different settings can coexist.

use std::time::Duration;

use crate::error::{ClientError, Result};

/// Basic-auth credentials (user name and API token)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub api_token: String,
}

/// Transport settings for the build server
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Proxy for all requests, e.g. "http://10.0.0.1:3128"
    pub proxy: Option<String>,

    /// Skip TLS certificate and hostname verification
    pub accept_invalid_certs: bool,

    /// Per-request timeout
    pub timeout: Duration,

    pub user_agent: String,

    pub credentials: Option<Credentials>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            proxy: None,
            accept_invalid_certs: false,
            timeout: Duration::from_secs(30),
            user_agent: format!("gantry/{}", env!("CARGO_PKG_VERSION")),
            credentials: None,
        }
    }
}

impl ClientConfig {
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        self.credentials = Some(Credentials {
            username: username.into(),
            api_token: api_token.into(),
        });
        self
    }

    /// Build a reqwest client from these settings
    pub fn build_http_client(&self) -> Result<reqwest::Client> {
        if self.timeout.is_zero() {
            return Err(ClientError::InvalidConfig(
                "timeout must be greater than 0".to_string(),
            ));
        }

        let mut builder = reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .danger_accept_invalid_certs(self.accept_invalid_certs);

        builder = match &self.proxy {
            Some(proxy) => builder.proxy(
                reqwest::Proxy::all(proxy)
                    .map_err(|e| ClientError::InvalidConfig(format!("invalid proxy {proxy}: {e}")))?,
            ),
            None => builder.no_proxy(),
        };

        Ok(builder.build()?)
    }
}
