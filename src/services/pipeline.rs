use log::{debug, error, warn};
use serde_json::Value;

use crate::dci::{DciApi, ListParams, Resource, RestApi};
use crate::error::Result;

use super::base::BaseService;
use super::payload;

/// Page size used when the caller does not set one.
pub const DEFAULT_LIMIT: u32 = 50;
pub const DEFAULT_OFFSET: u32 = 0;

/// Read access to DCI pipelines and their jobs.
///
/// Each operation comes in two flavours: `try_*` returns the classified
/// [`DciError`](crate::error::DciError), while the plain method logs the
/// failure and hands back an empty value so callers never deal with errors.
/// Callers of the plain methods cannot tell "not found" from "server
/// unreachable"; only the log level differs (`warn` vs `error`).
pub struct PipelineService<A = RestApi> {
    base: BaseService<A>,
}

impl<A: DciApi> PipelineService<A> {
    pub fn new(base: BaseService<A>) -> Self {
        Self { base }
    }

    /// Fetches one pipeline and returns the decoded payload unchanged.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be opened, the request fails or
    /// the body is not JSON.
    pub async fn try_get_pipeline(&self, pipeline_id: &str) -> Result<Value> {
        let ctx = self.base.context()?;
        let response = self
            .base
            .api()
            .get(&ctx, Resource::Pipelines, pipeline_id)
            .await?;
        response.into_payload()
    }

    /// Lists pipelines, defaulting to the first [`DEFAULT_LIMIT`] entries.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_get_pipeline`].
    pub async fn try_list_pipelines(&self, params: ListParams) -> Result<Vec<Value>> {
        let params = ListParams {
            limit: Some(params.limit.unwrap_or(DEFAULT_LIMIT)),
            offset: Some(params.offset.unwrap_or(DEFAULT_OFFSET)),
            ..params
        };

        let ctx = self.base.context()?;
        let response = self
            .base
            .api()
            .list(&ctx, Resource::Pipelines, &params)
            .await?;
        let pipelines = payload::decode_items(response, Resource::Pipelines.plural_key())?;

        debug!("Listed {} pipelines", pipelines.len());
        Ok(pipelines)
    }

    /// Fetches the jobs that ran as part of a pipeline.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_get_pipeline`].
    pub async fn try_get_pipeline_jobs(&self, pipeline_id: &str) -> Result<Vec<Value>> {
        let ctx = self.base.context()?;
        let response = self
            .base
            .api()
            .list_nested(&ctx, Resource::Pipelines, pipeline_id, Resource::Jobs)
            .await?;
        payload::decode_items(response, Resource::Jobs.plural_key())
    }

    pub async fn get_pipeline(&self, pipeline_id: &str) -> Option<Value> {
        match self.try_get_pipeline(pipeline_id).await {
            Ok(pipeline) => payload::entity(pipeline),
            Err(e) if e.is_not_found() => {
                warn!("Pipeline {pipeline_id} not found: {e}");
                None
            }
            Err(e) => {
                error!("Error getting pipeline {pipeline_id}: {e}");
                None
            }
        }
    }

    pub async fn list_pipelines(&self, params: ListParams) -> Vec<Value> {
        self.try_list_pipelines(params).await.unwrap_or_else(|e| {
            error!("Error listing pipelines: {e}");
            Vec::new()
        })
    }

    pub async fn get_pipeline_jobs(&self, pipeline_id: &str) -> Vec<Value> {
        match self.try_get_pipeline_jobs(pipeline_id).await {
            Ok(jobs) => jobs,
            Err(e) if e.is_not_found() => {
                warn!("Pipeline {pipeline_id} not found, no jobs: {e}");
                Vec::new()
            }
            Err(e) => {
                error!("Error getting jobs for pipeline {pipeline_id}: {e}");
                Vec::new()
            }
        }
    }
}
