use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use log::info;
use serde_json::Value;
use std::path::PathBuf;

use crate::config::{Config, DciConfig, OutputFormat};
use crate::dci::{ListParams, Resource};
use crate::output::{self, FetchProgress};
use crate::services::{payload, BaseService, ComponentService, PipelineService, TeamService};

#[derive(Parser)]
#[command(name = "dcilens")]
#[command(author, version, about = "Query DCI pipelines, jobs, components and teams", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./dcilens.toml and friends)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    #[arg(short, long, global = true, default_value_t = false)]
    pretty: bool,

    #[arg(short, long, global = true, value_enum)]
    format: Option<OutputFormat>,

    #[command(flatten)]
    connection: ConnectionArgs,
}

#[derive(Args)]
struct ConnectionArgs {
    /// DCI control server URL
    #[arg(long, global = true, env = "DCI_CS_URL")]
    url: Option<String>,

    #[arg(long, global = true, env = "DCI_LOGIN")]
    login: Option<String>,

    #[arg(long, global = true, env = "DCI_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[arg(long, global = true, env = "DCI_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl ConnectionArgs {
    fn apply(&self, dci: &mut DciConfig) {
        if let Some(url) = &self.url {
            dci.base_url.clone_from(url);
        }
        if self.login.is_some() {
            dci.login.clone_from(&self.login);
        }
        if self.password.is_some() {
            dci.password.clone_from(&self.password);
        }
        if self.token.is_some() {
            dci.token.clone_from(&self.token);
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Pipelines and the jobs they ran
    Pipelines {
        #[command(subcommand)]
        action: PipelineAction,
    },
    /// Components (products, versions, builds)
    Components {
        #[command(subcommand)]
        action: ComponentAction,
    },
    /// Teams owning jobs and pipelines
    Teams {
        #[command(subcommand)]
        action: TeamAction,
    },
}

#[derive(Subcommand)]
enum PipelineAction {
    Get { id: String },
    List(ListArgs),
    Jobs { id: String },
}

#[derive(Subcommand)]
enum ComponentAction {
    Get { id: String },
    List(ListArgs),
}

#[derive(Subcommand)]
enum TeamAction {
    Get {
        id: String,
    },
    /// Newest teams first, 20 per page (at most 200)
    List(ListArgs),
    /// Number of teams matching a query
    Count {
        #[arg(short, long, allow_hyphen_values = true)]
        query: Option<String>,
    },
}

#[derive(Args)]
struct ListArgs {
    /// Maximum number of entries (server default page: 50)
    #[arg(short, long)]
    limit: Option<u32>,

    #[arg(long)]
    offset: Option<u32>,

    /// Filter expression, e.g. "name:nightly"
    #[arg(short, long = "where", allow_hyphen_values = true)]
    where_: Option<String>,

    /// Query expression, e.g. "and(eq(name,DCI),contains(tags,ga))"
    #[arg(short, long, allow_hyphen_values = true)]
    query: Option<String>,

    /// Sort expression, e.g. "-created_at"
    #[arg(short, long, allow_hyphen_values = true)]
    sort: Option<String>,

    /// Only keep these fields of each entry; an empty list keeps no entries
    #[arg(long, value_delimiter = ',')]
    fields: Option<Vec<String>>,
}

impl ListArgs {
    fn fields(&self) -> Option<Vec<String>> {
        self.fields.as_ref().map(|fields| {
            fields
                .iter()
                .map(|field| field.trim())
                .filter(|field| !field.is_empty())
                .map(str::to_string)
                .collect()
        })
    }
}

impl From<&ListArgs> for ListParams {
    fn from(args: &ListArgs) -> Self {
        Self {
            limit: args.limit,
            offset: args.offset,
            where_: args.where_.clone(),
            query: args.query.clone(),
            sort: args.sort.clone(),
        }
    }
}

struct Render {
    format: OutputFormat,
    pretty: bool,
}

impl Render {
    fn entity(&self, resource: Resource, entity: Option<&Value>) -> Result<String> {
        match (self.format, entity) {
            (OutputFormat::Table, Some(entity)) => {
                Ok(output::entity_table(resource, entity).to_string())
            }
            _ => output::to_json(&entity, self.pretty),
        }
    }

    fn list(&self, resource: Resource, items: &[Value]) -> Result<String> {
        match self.format {
            OutputFormat::Table => Ok(output::list_table(resource, items).to_string()),
            OutputFormat::Json => output::to_json(&items, self.pretty),
        }
    }

    /// Like [`Self::list`], keeping only `fields` when the caller asked for some.
    fn projected(&self, resource: Resource, items: Vec<Value>, args: &ListArgs) -> Result<String> {
        let Some(fields) = args.fields() else {
            return self.list(resource, &items);
        };

        let items = payload::project(items, &fields);
        match self.format {
            OutputFormat::Table => Ok(output::projected_table(&fields, &items).to_string()),
            OutputFormat::Json => output::to_json(&items, self.pretty),
        }
    }

    fn count(&self, count: Option<u64>) -> Result<String> {
        match (self.format, count) {
            (OutputFormat::Table, Some(count)) => Ok(count.to_string()),
            (_, Some(count)) => output::to_json(&serde_json::json!({ "count": count }), self.pretty),
            (_, None) => output::to_json(&count, self.pretty),
        }
    }
}

impl Cli {
    async fn execute_pipelines(
        &self,
        base: BaseService,
        action: &PipelineAction,
        render: &Render,
    ) -> Result<String> {
        let service = PipelineService::new(base);

        match action {
            PipelineAction::Get { id } => {
                info!("Fetching pipeline {id}");
                let progress = FetchProgress::start("pipeline");
                let pipeline = service.get_pipeline(id).await;
                progress.finish(usize::from(pipeline.is_some()), "pipeline");
                render.entity(Resource::Pipelines, pipeline.as_ref())
            }
            PipelineAction::List(args) => {
                let progress = FetchProgress::start("pipelines");
                let pipelines = service.list_pipelines(args.into()).await;
                progress.finish(pipelines.len(), "pipelines");
                render.projected(Resource::Pipelines, pipelines, args)
            }
            PipelineAction::Jobs { id } => {
                info!("Fetching jobs of pipeline {id}");
                let progress = FetchProgress::start("jobs");
                let jobs = service.get_pipeline_jobs(id).await;
                progress.finish(jobs.len(), "jobs");
                render.list(Resource::Jobs, &jobs)
            }
        }
    }

    async fn execute_components(
        &self,
        base: BaseService,
        action: &ComponentAction,
        render: &Render,
    ) -> Result<String> {
        let service = ComponentService::new(base);

        match action {
            ComponentAction::Get { id } => {
                info!("Fetching component {id}");
                let progress = FetchProgress::start("component");
                let component = service.get_component(id).await;
                progress.finish(usize::from(component.is_some()), "component");
                render.entity(Resource::Components, component.as_ref())
            }
            ComponentAction::List(args) => {
                let progress = FetchProgress::start("components");
                let components = service.list_components(args.into()).await;
                progress.finish(components.len(), "components");
                render.projected(Resource::Components, components, args)
            }
        }
    }

    async fn execute_teams(
        &self,
        base: BaseService,
        action: &TeamAction,
        render: &Render,
    ) -> Result<String> {
        let service = TeamService::new(base);

        match action {
            TeamAction::Get { id } => {
                info!("Fetching team {id}");
                let progress = FetchProgress::start("team");
                let team = service.get_team(id).await;
                progress.finish(usize::from(team.is_some()), "team");
                render.entity(Resource::Teams, team.as_ref())
            }
            TeamAction::List(args) => {
                let progress = FetchProgress::start("teams");
                let teams = service.list_teams(args.into()).await;
                progress.finish(teams.len(), "teams");
                render.projected(Resource::Teams, teams, args)
            }
            TeamAction::Count { query } => {
                let progress = FetchProgress::start("team count");
                let count = service.count_teams(query.clone()).await;
                progress.finish(usize::from(count.is_some()), "team count");
                render.count(count)
            }
        }
    }

    pub async fn execute(&self) -> Result<()> {
        let mut config = Config::load(self.config.as_deref())?;
        self.connection.apply(&mut config.dci);

        let render = Render {
            format: self.format.unwrap_or(config.output.format),
            pretty: self.pretty || config.output.pretty,
        };

        info!("Using DCI control server: {}", config.dci.base_url);
        let base = BaseService::rest(config.dci.connection_settings());

        let rendered = match &self.command {
            Commands::Pipelines { action } => {
                self.execute_pipelines(base, action, &render).await?
            }
            Commands::Components { action } => {
                self.execute_components(base, action, &render).await?
            }
            Commands::Teams { action } => self.execute_teams(base, action, &render).await?,
        };

        output::emit(&rendered, self.output.as_deref())
    }
}
