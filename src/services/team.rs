use log::{debug, error, warn};
use serde_json::Value;

use crate::dci::{DciApi, ListParams, Resource, RestApi};
use crate::error::Result;

use super::base::BaseService;
use super::payload;

pub const DEFAULT_TEAM_LIMIT: u32 = 20;
pub const MAX_TEAM_LIMIT: u32 = 200;
pub const DEFAULT_TEAM_SORT: &str = "-created_at";

/// Read access to DCI teams.
///
/// Team listings are newest first and page through at most
/// [`MAX_TEAM_LIMIT`] entries at a time.
pub struct TeamService<A = RestApi> {
    base: BaseService<A>,
}

impl<A: DciApi> TeamService<A> {
    pub fn new(base: BaseService<A>) -> Self {
        Self { base }
    }

    fn team_params(params: ListParams) -> ListParams {
        let limit = params
            .limit
            .unwrap_or(DEFAULT_TEAM_LIMIT)
            .clamp(1, MAX_TEAM_LIMIT);
        ListParams {
            limit: Some(limit),
            offset: Some(params.offset.unwrap_or(0)),
            sort: Some(params.sort.unwrap_or_else(|| DEFAULT_TEAM_SORT.to_string())),
            ..params
        }
    }

    pub async fn try_get_team(&self, team_id: &str) -> Result<Value> {
        let ctx = self.base.context()?;
        self.base
            .api()
            .get(&ctx, Resource::Teams, team_id)
            .await?
            .into_payload()
    }

    /// Lists teams matching `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the context cannot be opened, the request fails or
    /// the body is not JSON.
    pub async fn try_list_teams(&self, params: ListParams) -> Result<Vec<Value>> {
        let params = Self::team_params(params);
        let ctx = self.base.context()?;
        let response = self.base.api().list(&ctx, Resource::Teams, &params).await?;
        let teams = payload::decode_items(response, Resource::Teams.plural_key())?;

        debug!("Listed {} teams", teams.len());
        Ok(teams)
    }

    /// Number of teams matching `query`, as reported in `_meta.count`.
    ///
    /// Only one entry is requested. `Ok(None)` means the server sent no count.
    ///
    /// # Errors
    ///
    /// Same as [`Self::try_list_teams`].
    pub async fn try_count_teams(&self, query: Option<String>) -> Result<Option<u64>> {
        let params = Self::team_params(ListParams {
            limit: Some(1),
            query,
            ..ListParams::default()
        });
        let ctx = self.base.context()?;
        let response = self.base.api().list(&ctx, Resource::Teams, &params).await?;
        Ok(payload::count(&response.into_payload()?))
    }

    pub async fn get_team(&self, team_id: &str) -> Option<Value> {
        match self.try_get_team(team_id).await {
            Ok(team) => payload::entity(team),
            Err(e) if e.is_not_found() => {
                warn!("Team {team_id} not found: {e}");
                None
            }
            Err(e) => {
                error!("Error getting team {team_id}: {e}");
                None
            }
        }
    }

    pub async fn list_teams(&self, params: ListParams) -> Vec<Value> {
        self.try_list_teams(params).await.unwrap_or_else(|e| {
            error!("Error listing teams: {e}");
            Vec::new()
        })
    }

    pub async fn count_teams(&self, query: Option<String>) -> Option<u64> {
        self.try_count_teams(query).await.unwrap_or_else(|e| {
            error!("Error counting teams: {e}");
            None
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::services::testing::{bad_gateway, base, not_found, Call, Reply};

    #[tokio::test]
    async fn test_get_team() {
        let payload = json!({"team": {"id": "t1", "name": "DCI"}});
        let service = TeamService::new(base(Reply::Raw(payload.clone())));

        assert_eq!(service.get_team("t1").await, Some(payload));
        assert_eq!(
            service.base.api().calls(),
            vec![Call::Get(Resource::Teams, "t1".to_string())]
        );

        let service = TeamService::new(base(Reply::Fail(not_found)));
        assert_eq!(service.get_team("missing").await, None);
    }

    #[tokio::test]
    async fn test_list_teams_applies_team_defaults() {
        let service = TeamService::new(base(Reply::Raw(
            json!({"teams": [{"id": "t1"}], "_meta": {"count": 1}}),
        )));

        let teams = service
            .list_teams(ListParams {
                query: Some("ilike(name,%qa%)".to_string()),
                ..ListParams::default()
            })
            .await;

        assert_eq!(teams, vec![json!({"id": "t1"})]);
        assert_eq!(
            service.base.api().calls(),
            vec![Call::List(
                Resource::Teams,
                ListParams {
                    limit: Some(20),
                    offset: Some(0),
                    where_: None,
                    query: Some("ilike(name,%qa%)".to_string()),
                    sort: Some("-created_at".to_string()),
                }
            )]
        );
    }

    #[tokio::test]
    async fn test_list_teams_clamps_limit() {
        let service = TeamService::new(base(Reply::Raw(json!({"teams": []}))));

        service
            .list_teams(ListParams {
                limit: Some(1000),
                sort: Some("name".to_string()),
                ..ListParams::default()
            })
            .await;
        service
            .list_teams(ListParams {
                limit: Some(0),
                ..ListParams::default()
            })
            .await;

        let limits: Vec<_> = service
            .base
            .api()
            .calls()
            .into_iter()
            .map(|call| match call {
                Call::List(_, params) => (params.limit, params.sort),
                other => panic!("unexpected call {other:?}"),
            })
            .collect();
        assert_eq!(
            limits,
            vec![
                (Some(200), Some("name".to_string())),
                (Some(1), Some("-created_at".to_string())),
            ]
        );
    }

    #[tokio::test]
    async fn test_count_teams_reads_meta() {
        let service = TeamService::new(base(Reply::Body(
            r#"{"teams": [{"id": "t1"}], "_meta": {"count": 10}}"#,
        )));

        assert_eq!(
            service.count_teams(Some("eq(name,DCI)".to_string())).await,
            Some(10)
        );
        let Call::List(resource, params) = &service.base.api().calls()[0] else {
            panic!("expected a list call");
        };
        assert_eq!(*resource, Resource::Teams);
        assert_eq!(params.limit, Some(1));
        assert_eq!(params.query.as_deref(), Some("eq(name,DCI)"));
    }

    #[tokio::test]
    async fn test_count_teams_without_meta() {
        let service = TeamService::new(base(Reply::Raw(json!({"teams": []}))));
        assert_eq!(service.count_teams(None).await, None);
    }

    #[tokio::test]
    async fn test_team_failures_are_empty() {
        let service = TeamService::new(base(Reply::Fail(bad_gateway)));

        assert_eq!(service.get_team("t1").await, None);
        assert!(service.list_teams(ListParams::default()).await.is_empty());
        assert_eq!(service.count_teams(None).await, None);
        assert!(service.try_count_teams(None).await.is_err());
    }
}
