use crate::dci::{ConnectionSettings, Context, DciApi, RestApi};
use crate::error::Result;

/// Shared base of the DCI services: connection settings plus the API used to
/// reach the server.
#[derive(Debug, Clone)]
pub struct BaseService<A = RestApi> {
    settings: ConnectionSettings,
    api: A,
}

impl BaseService<RestApi> {
    pub fn rest(settings: ConnectionSettings) -> Self {
        Self::new(settings, RestApi)
    }
}

impl<A: DciApi> BaseService<A> {
    pub fn new(settings: ConnectionSettings, api: A) -> Self {
        Self { settings, api }
    }

    /// Opens a fresh authenticated context. Contexts are never reused.
    pub fn context(&self) -> Result<Context> {
        Context::new(&self.settings)
    }

    pub fn api(&self) -> &A {
        &self.api
    }
}
