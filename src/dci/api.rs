use async_trait::async_trait;

use crate::error::{DciError, Result};

use super::context::Context;
use super::resources::{ListParams, Resource};
use super::response::ApiResponse;

/// Read operations of the DCI v1 API.
///
/// Every call takes the [`Context`] it runs under; implementations hold no
/// session state of their own.
#[async_trait]
pub trait DciApi: Send + Sync {
    /// `GET /v1/{resource}/{id}`
    async fn get(&self, ctx: &Context, resource: Resource, id: &str) -> Result<ApiResponse>;

    /// `GET /v1/{resource}?limit=&offset=&where=&sort=`
    async fn list(
        &self,
        ctx: &Context,
        resource: Resource,
        params: &ListParams,
    ) -> Result<ApiResponse>;

    /// `GET /v1/{resource}/{id}/{nested}`
    async fn list_nested(
        &self,
        ctx: &Context,
        resource: Resource,
        id: &str,
        nested: Resource,
    ) -> Result<ApiResponse>;
}

/// Rejects identifiers that URL normalisation would fold into another path
/// (`..` on `pipelines/..` would hit the collection itself).
fn entity_segment(resource: Resource, id: &str) -> Result<&str> {
    match id {
        "" | "." | ".." => Err(DciError::NotFound {
            resource: resource.to_string(),
            id: id.to_string(),
        }),
        _ => Ok(id),
    }
}

/// [`DciApi`] over HTTP.
#[derive(Debug, Clone, Copy, Default)]
pub struct RestApi;

#[async_trait]
impl DciApi for RestApi {
    async fn get(&self, ctx: &Context, resource: Resource, id: &str) -> Result<ApiResponse> {
        let url = ctx.endpoint(&[resource.path(), entity_segment(resource, id)?]);
        ctx.get(url, &[], resource, id).await
    }

    async fn list(
        &self,
        ctx: &Context,
        resource: Resource,
        params: &ListParams,
    ) -> Result<ApiResponse> {
        let url = ctx.endpoint(&[resource.path()]);
        ctx.get(url, &params.query_pairs(), resource, "").await
    }

    async fn list_nested(
        &self,
        ctx: &Context,
        resource: Resource,
        id: &str,
        nested: Resource,
    ) -> Result<ApiResponse> {
        let url = ctx.endpoint(&[
            resource.path(),
            entity_segment(resource, id)?,
            nested.path(),
        ]);
        ctx.get(url, &[], resource, id).await
    }
}
