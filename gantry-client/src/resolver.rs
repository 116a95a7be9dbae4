//! Build-server backed duration resolver

use async_trait::async_trait;
use gantry_core::LookupError;
use gantry_core::domain::{ReferenceDate, WorkItemId};
use gantry_core::resolver::{DurationResolver, ExecutionRecord, Resolution, select_latest_success};
use tracing::{debug, info};

use crate::JenkinsClient;

/// Resolves durations from a Jenkins server
///
/// One request fetches the job with a timing summary of every build. Builds
/// the server listed without timing fields cost one extra request each.
pub struct JenkinsDurationResolver {
    client: JenkinsClient,
}

impl JenkinsDurationResolver {
    pub fn new(client: JenkinsClient) -> Self {
        Self { client }
    }

    async fn execution_records(
        &self,
        work_item: &WorkItemId,
        builds: &[crate::BuildSummary],
    ) -> Result<Vec<ExecutionRecord>, LookupError> {
        let mut records = Vec::with_capacity(builds.len());

        for summary in builds {
            let record = match summary.to_record() {
                Some(record) => record?,
                None => {
                    let url = summary.url.as_deref().ok_or_else(|| {
                        LookupError::Malformed(format!(
                            "build #{} of {} has neither timing fields nor url",
                            summary.number, work_item
                        ))
                    })?;
                    debug!("Fetching build metadata: {}", url);
                    self.client.get_build(url).await?.to_record()?
                }
            };
            records.push(record);
        }

        Ok(records)
    }
}

#[async_trait]
impl DurationResolver for JenkinsDurationResolver {
    async fn resolve(
        &self,
        work_item: &WorkItemId,
        date: ReferenceDate,
    ) -> Result<Resolution, LookupError> {
        let job = self.client.get_job(work_item.as_str()).await?;
        info!("Job: {}", job.display_name);

        let records = self.execution_records(work_item, &job.builds).await?;

        match select_latest_success(&records, date) {
            Some(record) => {
                let execution = record.to_execution().ok_or_else(|| {
                    LookupError::Malformed(format!(
                        "build #{} of {} has no representable completion time",
                        record.number, work_item
                    ))
                })?;
                info!(
                    "Specific build found: completed {}, duration {} min, url {}",
                    execution.completed_at,
                    execution.duration_minutes,
                    execution.url.as_deref().unwrap_or("-")
                );
                Ok(Resolution::found(job.display_name, execution))
            }
            None => {
                debug!(
                    "No successful build of {} among {} build(s) as of {}",
                    work_item,
                    records.len(),
                    date
                );
                Ok(Resolution::not_found(job.display_name))
            }
        }
    }
}
