//! Fixtures shared by the handler tests.

use crate::database::UserStore;
use crate::services::auth_service::TokenKeys;
use crate::services::PerformanceAnalyzer;
use crate::state::AppState;
use crate::utils::AppError;
use actix_web::dev::ServerHandle;
use actix_web::{web, App, HttpResponse, HttpServer};
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_SECRET: &str = "handler-test-secret";
pub const STUB_API_KEY: &str = "stub-api-key";

enum Script {
    Categories(Value),
    Upstream(String),
    Failure(String),
    UnexpectedFormat,
    Unused,
}

/// Analyzer that replays a fixed outcome and records the URLs it was given.
pub struct ScriptedAnalyzer {
    script: Script,
    calls: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl ScriptedAnalyzer {
    fn with(script: Script) -> Self {
        Self {
            script,
            calls: AtomicUsize::new(0),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn categories(value: Value) -> Self {
        Self::with(Script::Categories(value))
    }

    pub fn upstream_error(body: &str) -> Self {
        Self::with(Script::Upstream(body.to_string()))
    }

    pub fn failure(reason: &str) -> Self {
        Self::with(Script::Failure(reason.to_string()))
    }

    pub fn unexpected_format() -> Self {
        Self::with(Script::UnexpectedFormat)
    }

    pub fn unused() -> Self {
        Self::with(Script::Unused)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen(&self) -> Vec<String> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl PerformanceAnalyzer for ScriptedAnalyzer {
    async fn analyze(&self, target_url: &str) -> Result<Value, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen.lock().unwrap().push(target_url.to_string());
        match &self.script {
            Script::Categories(value) => Ok(value.clone()),
            Script::Upstream(body) => Err(AppError::Upstream(body.clone())),
            Script::Failure(reason) => Err(AppError::Analysis(reason.clone())),
            Script::UnexpectedFormat => Err(AppError::UnexpectedFormat(
                "Unexpected response format from Lighthouse API".to_string(),
            )),
            Script::Unused => panic!("analyzer called unexpectedly for {}", target_url),
        }
    }
}

pub fn scripted_app_state(
    users: Arc<dyn UserStore>,
    analyzer: Arc<dyn PerformanceAnalyzer>,
) -> web::Data<AppState> {
    web::Data::new(AppState::new(users, analyzer, TokenKeys::new(TEST_SECRET)))
}

pub fn stub_categories() -> Value {
    json!({
        "performance": { "id": "performance", "score": 0.73 },
        "accessibility": { "id": "accessibility", "score": 0.95 },
        "seo": { "id": "seo", "score": 0.82 }
    })
}

/// Stand-in for `runPagespeed`: `url=bad` gets a 403, `url=nocat` a 200
/// without categories, anything else the `stub_categories()` payload.
async fn stub_run(query: web::Query<Vec<(String, String)>>) -> HttpResponse {
    let param = |name: &str| {
        query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect::<Vec<_>>()
    };

    if param("key") != [STUB_API_KEY] {
        return HttpResponse::BadRequest().body("API key not valid");
    }
    if param("category") != ["performance", "accessibility", "seo"] {
        return HttpResponse::BadRequest().body("categories missing");
    }

    match param("url").first().copied() {
        Some("bad") => HttpResponse::Forbidden().body("quota exceeded"),
        Some("nocat") => HttpResponse::Ok().json(json!({ "lighthouseResult": { "audits": {} } })),
        _ => HttpResponse::Ok().json(json!({
            "id": "stub",
            "lighthouseResult": { "categories": stub_categories(), "audits": {} }
        })),
    }
}

/// Serves `stub_run` on an ephemeral localhost port. Returns the endpoint
/// URL, the categories a successful run yields, and a handle to stop it.
pub async fn start_pagespeed_stub() -> (String, Value, ServerHandle) {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind stub listener");
    let addr = listener.local_addr().expect("stub listener addr");
    let server = HttpServer::new(|| App::new().route("/run", web::get().to(stub_run)))
        .workers(1)
        .listen(listener)
        .expect("bind stub server")
        .disable_signals()
        .run();
    let handle = server.handle();
    actix_web::rt::spawn(server);

    (format!("http://{}/run", addr), stub_categories(), handle)
}
