#![allow(dead_code)]

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use gestell_tools::gestell::{CollectionService, PromptRequest, SearchRequest, SearchResponse};
use once_cell::sync::Lazy;
use serde_json::Value;
use std::sync::{Arc, Mutex, Once};
use tracing_appender::rolling;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static START: Once = Once::new();
static _GUARD: Lazy<Mutex<Option<tracing_appender::non_blocking::WorkerGuard>>> = Lazy::new(|| Mutex::new(None));

pub const DEFAULT_COLLECTION: &str = "11111111-1111-1111-1111-111111111111";
pub const OTHER_COLLECTION: &str = "22222222-2222-2222-2222-222222222222";

/// Initialize test environment: dotenv and tracing (stderr + file).
/// Idempotent: safe to call multiple times.
pub fn init() {
    START.call_once(|| {
        let _ = dotenvy::dotenv();
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new("info"))
            .expect("env filter");

        let file_appender = rolling::daily("logs", "tests.log");
        let (file_nb, guard) = tracing_appender::non_blocking(file_appender);
        *_GUARD.lock().unwrap() = Some(guard);

        let stderr_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(std::io::stderr);

        let file_layer = fmt::layer()
            .with_ansi(false)
            .with_target(true)
            .with_thread_ids(true)
            .with_writer(file_nb);

        tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer)
            .with(file_layer)
            .init();

        tracing::info!(target: "test_init", "Test tracing initialized (stderr + rotating file)");
    });
}

/// Collection service stub: records every outgoing envelope and answers with a canned reply.
pub struct StubService {
    reply: std::result::Result<Value, String>,
    calls: Mutex<Vec<Value>>,
}

impl StubService {
    pub fn ok(reply: Value) -> Arc<Self> {
        Arc::new(Self { reply: Ok(reply), calls: Mutex::new(Vec::new()) })
    }

    pub fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(message.to_string()), calls: Mutex::new(Vec::new()) })
    }

    pub fn calls(&self) -> Vec<Value> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Value {
        self.calls().pop().expect("no call recorded")
    }

    fn answer(&self, envelope: Value) -> Result<Value> {
        self.calls.lock().unwrap().push(envelope);
        self.reply.clone().map_err(|m| eyre!(m))
    }
}

#[async_trait]
impl CollectionService for StubService {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse> {
        let reply = self.answer(request.to_envelope())?;
        Ok(serde_json::from_value(reply)?)
    }

    async fn prompt(&self, request: &PromptRequest) -> Result<Value> {
        self.answer(request.to_envelope())
    }
}
