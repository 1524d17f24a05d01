use log::{error, warn};
use serde_json::Value;

use crate::dci::{DciApi, ListParams, Resource, RestApi};
use crate::error::Result;

use super::base::BaseService;
use super::payload;
use super::pipeline::{DEFAULT_LIMIT, DEFAULT_OFFSET};

/// Read access to DCI components, with the same fail-soft contract as
/// [`PipelineService`](super::PipelineService).
pub struct ComponentService<A = RestApi> {
    base: BaseService<A>,
}

impl<A: DciApi> ComponentService<A> {
    pub fn new(base: BaseService<A>) -> Self {
        Self { base }
    }

    pub async fn try_get_component(&self, component_id: &str) -> Result<Value> {
        let ctx = self.base.context()?;
        self.base
            .api()
            .get(&ctx, Resource::Components, component_id)
            .await?
            .into_payload()
    }

    pub async fn try_list_components(&self, params: ListParams) -> Result<Vec<Value>> {
        let params = ListParams {
            limit: Some(params.limit.unwrap_or(DEFAULT_LIMIT)),
            offset: Some(params.offset.unwrap_or(DEFAULT_OFFSET)),
            ..params
        };

        let ctx = self.base.context()?;
        let response = self
            .base
            .api()
            .list(&ctx, Resource::Components, &params)
            .await?;
        payload::decode_items(response, Resource::Components.plural_key())
    }

    pub async fn get_component(&self, component_id: &str) -> Option<Value> {
        match self.try_get_component(component_id).await {
            Ok(component) => payload::entity(component),
            Err(e) if e.is_not_found() => {
                warn!("Component {component_id} not found: {e}");
                None
            }
            Err(e) => {
                error!("Error getting component {component_id}: {e}");
                None
            }
        }
    }

    pub async fn list_components(&self, params: ListParams) -> Vec<Value> {
        self.try_list_components(params).await.unwrap_or_else(|e| {
            error!("Error listing components: {e}");
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing::{bad_gateway, base, capture_logs, logged, not_found, Call, Reply};

    #[tokio::test]
    async fn test_get_component() {
        let payload = json!({"component": {"id": "c1", "version": "4.16.0"}});
        let service = ComponentService::new(base(Reply::Raw(payload.clone())));

        assert_eq!(service.get_component("c1").await, Some(payload));
        assert_eq!(
            service.base.api().calls(),
            vec![Call::Get(Resource::Components, "c1".to_string())]
        );
    }

    #[tokio::test]
    async fn test_get_component_failure_is_none() {
        let service = ComponentService::new(base(Reply::Fail(bad_gateway)));
        assert_eq!(service.get_component("c1").await, None);
    }

    #[tokio::test]
    async fn test_list_components() {
        let service = ComponentService::new(base(Reply::Body(
            r#"{"components": [{"id": "c1"}, {"id": "c2"}]}"#,
        )));
        let params = ListParams {
            where_: Some("type:ocp".to_string()),
            ..ListParams::default()
        };

        let components = service.list_components(params).await;

        assert_eq!(components, vec![json!({"id": "c1"}), json!({"id": "c2"})]);
        assert_eq!(
            service.base.api().calls(),
            vec![Call::List(
                Resource::Components,
                ListParams {
                    limit: Some(50),
                    offset: Some(0),
                    where_: Some("type:ocp".to_string()),
                    query: None,
                    sort: None,
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_list_components_failure_is_empty() {
        let service = ComponentService::new(base(Reply::Fail(bad_gateway)));
        assert!(service.list_components(ListParams::default()).await.is_empty());
    }

    #[tokio::test]
    async fn test_get_component_logs_its_id() {
        capture_logs();

        let service = ComponentService::new(base(Reply::Fail(not_found)));
        assert_eq!(service.get_component("c-404-get").await, None);
        let service = ComponentService::new(base(Reply::Fail(bad_gateway)));
        assert_eq!(service.get_component("c-502-get").await, None);

        let missing = logged("c-404-get");
        assert_eq!(missing.len(), 1, "{missing:?}");
        assert!(missing[0].starts_with("WARN Component c-404-get not found"));

        let failed = logged("c-502-get");
        assert_eq!(failed.len(), 1, "{failed:?}");
        assert!(failed[0].starts_with("ERROR Error getting component c-502-get"));
    }
}
