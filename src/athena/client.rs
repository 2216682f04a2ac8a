//! Athena and S3 clients built on the AWS SDK.

use super::{ExecutionHandle, ExecutionStatus, QuerySpec, QueryService, ResultStore, S3Location, StatusReport};
use crate::error::{DashError, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_sdk_athena::error::DisplayErrorContext;
use aws_sdk_athena::types::{QueryExecutionContext, QueryExecutionState, ResultConfiguration};
use tracing::debug;

/// Loads shared SDK configuration (credentials, retry defaults) for a region.
pub(super) async fn load_sdk_config(region: &str) -> SdkConfig {
    aws_config::defaults(BehaviorVersion::latest())
        .region(Region::new(region.to_string()))
        .load()
        .await
}

/// Query service backed by Amazon Athena.
pub struct AthenaService {
    client: aws_sdk_athena::Client,
    workgroup: Option<String>,
}

impl AthenaService {
    pub fn new(sdk_config: &SdkConfig, workgroup: Option<String>) -> Self {
        Self {
            client: aws_sdk_athena::Client::new(sdk_config),
            workgroup,
        }
    }
}

#[async_trait]
impl QueryService for AthenaService {
    async fn submit(&self, query: &QuerySpec) -> Result<ExecutionHandle> {
        let mut request = self
            .client
            .start_query_execution()
            .query_string(query.sql())
            .query_execution_context(
                QueryExecutionContext::builder()
                    .database(query.database())
                    .build(),
            )
            .result_configuration(
                ResultConfiguration::builder()
                    .output_location(query.result_location())
                    .build(),
            );
        if let Some(workgroup) = &self.workgroup {
            request = request.work_group(workgroup);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DashError::submission(DisplayErrorContext(&e).to_string()))?;

        let id = response
            .query_execution_id()
            .ok_or_else(|| DashError::submission("Athena returned no query execution id"))?;
        Ok(ExecutionHandle::new(id))
    }

    async fn status(&self, handle: &ExecutionHandle) -> Result<StatusReport> {
        let response = self
            .client
            .get_query_execution()
            .query_execution_id(handle.as_str())
            .send()
            .await
            .map_err(|e| {
                DashError::execution(format!(
                    "Failed to check status of {handle}: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        let execution = response.query_execution().ok_or_else(|| {
            DashError::execution(format!("Athena returned no execution details for {handle}"))
        })?;
        let status = execution.status();

        let state = match status.and_then(|s| s.state()) {
            Some(QueryExecutionState::Succeeded) => ExecutionStatus::Succeeded,
            Some(QueryExecutionState::Failed) => ExecutionStatus::Failed,
            Some(QueryExecutionState::Cancelled) => ExecutionStatus::Cancelled,
            // QUEUED, RUNNING, and anything newer than this client.
            _ => ExecutionStatus::Running,
        };
        debug!(handle = %handle, state = %state, "Polled query status");

        Ok(StatusReport {
            status: state,
            reason: status
                .and_then(|s| s.state_change_reason())
                .map(str::to_string),
            output_location: execution
                .result_configuration()
                .and_then(|rc| rc.output_location())
                .map(str::to_string),
        })
    }
}

/// Result store backed by Amazon S3.
pub struct S3ResultStore {
    client: aws_sdk_s3::Client,
}

impl S3ResultStore {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_s3::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl ResultStore for S3ResultStore {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        let target: S3Location = location.parse().map_err(DashError::fetch)?;
        if target.is_prefix() {
            return Err(DashError::fetch(format!(
                "{location} is a prefix, not a result file"
            )));
        }

        let object = self
            .client
            .get_object()
            .bucket(&target.bucket)
            .key(&target.key)
            .send()
            .await
            .map_err(|e| {
                DashError::fetch(format!(
                    "{location}: {}",
                    aws_sdk_s3::error::DisplayErrorContext(&e)
                ))
            })?;

        let body = object
            .body
            .collect()
            .await
            .map_err(|e| DashError::fetch(format!("Failed to read {location}: {e}")))?;
        Ok(body.into_bytes().to_vec())
    }
}
