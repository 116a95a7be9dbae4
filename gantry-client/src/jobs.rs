//! Job and build endpoints

use chrono::DateTime;
use gantry_core::resolver::{ExecutionRecord, Outcome};
use serde::Deserialize;

use crate::JenkinsClient;
use crate::error::{ClientError, Result};

/// Fields requested for a job: display name plus a timing summary of each build
const JOB_TREE: &str = "displayName,builds[number,url,result,timestamp,duration,building]";

/// Longest build duration accepted from the server (one year, in milliseconds)
const MAX_DURATION_MS: u64 = 366 * 24 * 60 * 60 * 1000;

/// Job metadata
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobInfo {
    pub display_name: String,
    #[serde(default)]
    pub builds: Vec<BuildSummary>,
}

/// Build entry listed on a job
///
/// Servers that ignore the `tree` filter only return `number` and `url`;
/// the timing fields are then fetched per build.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSummary {
    pub number: u64,
    pub url: Option<String>,
    pub result: Option<String>,
    pub timestamp: Option<i64>,
    pub duration: Option<u64>,
    pub building: Option<bool>,
}

/// Full build metadata
#[derive(Debug, Clone, Deserialize)]
pub struct BuildInfo {
    pub number: u64,
    pub url: Option<String>,
    pub result: Option<String>,
    /// Start time, milliseconds since the Unix epoch
    pub timestamp: i64,
    /// Milliseconds
    pub duration: u64,
    #[serde(default)]
    pub building: bool,
}

impl BuildSummary {
    /// Execution record, if the summary carries timing information
    pub fn to_record(&self) -> Option<Result<ExecutionRecord>> {
        let timestamp = self.timestamp?;
        let duration = self.duration?;
        Some(to_record(
            self.number,
            self.url.clone(),
            self.result.as_deref(),
            timestamp,
            duration,
            self.building.unwrap_or(false),
        ))
    }
}

impl BuildInfo {
    pub fn to_record(&self) -> Result<ExecutionRecord> {
        to_record(
            self.number,
            self.url.clone(),
            self.result.as_deref(),
            self.timestamp,
            self.duration,
            self.building,
        )
    }
}

fn to_record(
    number: u64,
    url: Option<String>,
    result: Option<&str>,
    timestamp: i64,
    duration: u64,
    building: bool,
) -> Result<ExecutionRecord> {
    let started_at = DateTime::from_timestamp_millis(timestamp).ok_or_else(|| {
        ClientError::ParseError(format!("build #{number} has invalid timestamp {timestamp}"))
    })?;
    if duration > MAX_DURATION_MS {
        return Err(ClientError::ParseError(format!(
            "build #{number} has out of range duration {duration}"
        )));
    }
    let outcome = if building {
        Outcome::InProgress
    } else {
        Outcome::from_result(result)
    };

    let record = ExecutionRecord {
        number,
        outcome,
        started_at,
        duration_ms: duration,
        url,
    };
    if record.completed_at().is_none() {
        return Err(ClientError::ParseError(format!(
            "build #{number} completes outside the supported time range"
        )));
    }
    Ok(record)
}

impl JenkinsClient {
    // =============================================================================
    // Job Metadata
    // =============================================================================

    /// Get a job's display name and build list
    ///
    /// # Arguments
    /// * `job_url` - Absolute job URL, with or without trailing slash
    pub async fn get_job(&self, job_url: &str) -> Result<JobInfo> {
        let url = Self::api_url(job_url);
        let response = self.get(&url).query(&[("tree", JOB_TREE)]).send().await?;

        self.handle_response(response).await
    }

    /// Get a single build's metadata
    ///
    /// # Arguments
    /// * `build_url` - Absolute build URL
    pub async fn get_build(&self, build_url: &str) -> Result<BuildInfo> {
        let url = Self::api_url(build_url);
        let response = self.get(&url).send().await?;

        self.handle_response(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_job_with_tree() {
        let json = r#"{
            "_class": "hudson.model.FreeStyleProject",
            "displayName": "[POC] Build",
            "builds": [
                {"number": 12, "url": "https://ci/job/build/12/", "result": "SUCCESS",
                 "timestamp": 1483524000000, "duration": 1800000, "building": false},
                {"number": 11, "url": "https://ci/job/build/11/"}
            ]
        }"#;

        let job: JobInfo = serde_json::from_str(json).unwrap();
        assert_eq!(job.display_name, "[POC] Build");
        assert_eq!(job.builds.len(), 2);

        let record = job.builds[0].to_record().unwrap().unwrap();
        assert_eq!(record.outcome, Outcome::Success);
        assert_eq!(record.duration_minutes(), 30);
        assert!(job.builds[1].to_record().is_none());
    }

    #[test]
    fn test_job_without_builds() {
        let job: JobInfo = serde_json::from_str(r#"{"displayName": "Fresh"}"#).unwrap();
        assert!(job.builds.is_empty());
    }

    #[test]
    fn test_running_build_is_in_progress() {
        let build = BuildInfo {
            number: 3,
            url: None,
            result: None,
            timestamp: 1483524000000,
            duration: 0,
            building: true,
        };
        assert_eq!(build.to_record().unwrap().outcome, Outcome::InProgress);
    }

    #[test]
    fn test_invalid_timestamp() {
        let build = BuildInfo {
            number: 3,
            url: None,
            result: Some("SUCCESS".to_string()),
            timestamp: i64::MAX,
            duration: 0,
            building: false,
        };
        assert!(matches!(build.to_record(), Err(ClientError::ParseError(_))));
    }

    #[test]
    fn test_out_of_range_duration() {
        let mut build = BuildInfo {
            number: 3,
            url: None,
            result: Some("SUCCESS".to_string()),
            timestamp: 1483524000000,
            duration: 10_000_000_000_000_000,
            building: false,
        };
        assert!(matches!(build.to_record(), Err(ClientError::ParseError(_))));

        build.duration = u64::MAX;
        assert!(matches!(build.to_record(), Err(ClientError::ParseError(_))));

        build.duration = MAX_DURATION_MS;
        assert!(build.to_record().is_ok());
    }

    #[test]
    fn test_completion_past_supported_range() {
        let build = BuildInfo {
            number: 4,
            url: None,
            result: Some("SUCCESS".to_string()),
            timestamp: chrono::DateTime::<chrono::Utc>::MAX_UTC.timestamp_millis(),
            duration: 60_000,
            building: false,
        };
        assert!(matches!(build.to_record(), Err(ClientError::ParseError(_))));
    }
}
