//! Gantry HTTP Client
//!
//! A typed client for the Jenkins JSON API and the `DurationResolver` built on
//! top of it.
//!
//! Server payloads are always decoded into typed structs with serde; nothing
//! received from the server is ever evaluated.
//!
//! # Example
//!
//! ```no_run
//! use gantry_client::{ClientConfig, JenkinsClient, JenkinsDurationResolver};
//! use gantry_core::domain::ReferenceDate;
//! use gantry_core::resolver::DurationResolver;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = JenkinsClient::from_config(&ClientConfig::default())?;
//!     let resolver = JenkinsDurationResolver::new(client);
//!
//!     let date: ReferenceDate = "2017-01-04".parse()?;
//!     let resolution = resolver
//!         .resolve(&"https://ci.example.com/job/build/".into(), date)
//!         .await?;
//!
//!     println!("{}: {:?} min", resolution.display_name, resolution.duration_minutes());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
mod jobs;
mod resolver;

// Re-export commonly used types
pub use config::{ClientConfig, Credentials};
pub use error::{ClientError, Result};
pub use jobs::{BuildInfo, BuildSummary, JobInfo};
pub use resolver::JenkinsDurationResolver;

use reqwest::Client;
use serde::de::DeserializeOwned;

/// HTTP client for the Jenkins JSON API
///
/// Work items are addressed by absolute job URLs, so the client carries no
/// base URL of its own.
#[derive(Debug, Clone)]
pub struct JenkinsClient {
    /// HTTP client instance
    client: Client,
    /// Basic-auth credentials sent with every request
    credentials: Option<Credentials>,
}

impl JenkinsClient {
    /// Create a client with default reqwest settings
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            credentials: None,
        }
    }

    /// Create a client around a preconfigured reqwest client
    ///
    /// # Example
    /// ```
    /// use gantry_client::JenkinsClient;
    /// use reqwest::Client;
    /// use std::time::Duration;
    ///
    /// let http_client = Client::builder()
    ///     .timeout(Duration::from_secs(30))
    ///     .build()
    ///     .unwrap();
    ///
    /// let client = JenkinsClient::with_client(http_client);
    /// ```
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            credentials: None,
        }
    }

    /// Create a client from explicit transport settings
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            client: config.build_http_client()?,
            credentials: config.credentials.clone(),
        })
    }

    /// JSON API endpoint of a job or build URL
    fn api_url(resource_url: &str) -> String {
        format!("{}/api/json", resource_url.trim_end_matches('/'))
    }

    fn get(&self, url: &str) -> reqwest::RequestBuilder {
        let request = self.client.get(url);
        match &self.credentials {
            Some(c) => request.basic_auth(&c.username, Some(&c.api_token)),
            None => request,
        }
    }

    // =============================================================================
    // Response Handlers
    // =============================================================================

    /// Handle an API response and deserialize JSON
    ///
    /// This method checks the status code and returns an appropriate error if
    /// the request failed, or deserializes the response body if successful.
    async fn handle_response<T: DeserializeOwned>(&self, response: reqwest::Response) -> Result<T> {
        let status = response.status();

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(ClientError::api_error(status.as_u16(), error_text));
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| ClientError::ParseError(format!("Failed to parse JSON response: {}", e)))
    }
}

impl Default for JenkinsClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_url() {
        assert_eq!(
            JenkinsClient::api_url("https://ci/job/build/"),
            "https://ci/job/build/api/json"
        );
        assert_eq!(
            JenkinsClient::api_url("https://ci/job/build"),
            "https://ci/job/build/api/json"
        );
    }

    #[test]
    fn test_client_from_config() {
        let config = ClientConfig::default().with_credentials("user", "token");
        let client = JenkinsClient::from_config(&config).unwrap();
        assert_eq!(client.credentials.unwrap().username, "user");
    }
}
