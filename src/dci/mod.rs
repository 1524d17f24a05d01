//! Minimal client for the DCI control server REST API.

mod api;
mod context;
mod resources;
mod response;

pub use api::{DciApi, RestApi};
pub use context::{ConnectionSettings, Context, DEFAULT_BASE_URL};
pub use resources::{ListParams, Resource};
pub use response::ApiResponse;
