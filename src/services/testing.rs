use std::sync::Mutex;

use async_trait::async_trait;
use log::{LevelFilter, Log, Metadata, Record};
use serde_json::Value;

use crate::dci::{ApiResponse, ConnectionSettings, Context, DciApi, ListParams, Resource};
use crate::error::{DciError, Result};

use super::BaseService;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(Resource, String),
    List(Resource, ListParams),
    ListNested(Resource, String, Resource),
}

/// What the fake answers to every call.
pub enum Reply {
    Raw(Value),
    Body(&'static str),
    Fail(fn() -> DciError),
}

/// In-memory [`DciApi`] recording the calls it receives.
pub struct FakeApi {
    reply: Reply,
    calls: Mutex<Vec<Call>>,
}

impl FakeApi {
    pub fn new(reply: Reply) -> Self {
        Self {
            reply,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn answer(&self, call: Call) -> Result<ApiResponse> {
        self.calls.lock().unwrap().push(call);
        match &self.reply {
            Reply::Raw(value) => Ok(ApiResponse::Raw(value.clone())),
            Reply::Body(body) => Ok(ApiResponse::Http {
                status: reqwest::StatusCode::OK,
                body: body.as_bytes().to_vec(),
            }),
            Reply::Fail(make_error) => Err(make_error()),
        }
    }
}

#[async_trait]
impl DciApi for FakeApi {
    async fn get(&self, _ctx: &Context, resource: Resource, id: &str) -> Result<ApiResponse> {
        self.answer(Call::Get(resource, id.to_string()))
    }

    async fn list(
        &self,
        _ctx: &Context,
        resource: Resource,
        params: &ListParams,
    ) -> Result<ApiResponse> {
        self.answer(Call::List(resource, params.clone()))
    }

    async fn list_nested(
        &self,
        _ctx: &Context,
        resource: Resource,
        id: &str,
        nested: Resource,
    ) -> Result<ApiResponse> {
        self.answer(Call::ListNested(resource, id.to_string(), nested))
    }
}

pub fn base(reply: Reply) -> BaseService<FakeApi> {
    BaseService::new(ConnectionSettings::default(), FakeApi::new(reply))
}

/// A base whose contexts can never be opened.
pub fn broken_base(reply: Reply) -> BaseService<FakeApi> {
    let settings = ConnectionSettings {
        base_url: "::not-a-url::".to_string(),
        ..ConnectionSettings::default()
    };
    BaseService::new(settings, FakeApi::new(reply))
}

pub fn bad_gateway() -> DciError {
    DciError::Api {
        status: 502,
        message: "Bad Gateway".to_string(),
    }
}

pub fn not_found() -> DciError {
    DciError::NotFound {
        resource: "pipeline".to_string(),
        id: "missing".to_string(),
    }
}

/// Log sink shared by every test in the binary; filter by a unique needle.
struct CapturedLogs {
    lines: Mutex<Vec<String>>,
}

impl Log for CapturedLogs {
    fn enabled(&self, _metadata: &Metadata<'_>) -> bool {
        true
    }

    fn log(&self, record: &Record<'_>) {
        self.lines
            .lock()
            .unwrap()
            .push(format!("{} {}", record.level(), record.args()));
    }

    fn flush(&self) {}
}

static LOGS: CapturedLogs = CapturedLogs {
    lines: Mutex::new(Vec::new()),
};

/// Routes `log` records into memory. Safe to call from every test.
pub fn capture_logs() {
    // fails once a previous test installed it
    let _ = log::set_logger(&LOGS);
    log::set_max_level(LevelFilter::Trace);
}

/// Captured lines (`"LEVEL message"`) mentioning `needle`.
pub fn logged(needle: &str) -> Vec<String> {
    LOGS.lines
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.contains(needle))
        .cloned()
        .collect()
}
