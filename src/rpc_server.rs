//! marksync command server: newline-delimited JSON over stdin/stdout.
//!
//! Request:  {"id":1, "command":{"type":"deleteDuplicates","keepFirst":true}}
//! Response: {"id":1, "result":{...}} or {"id":1, "error":"..."}
//!
//! The alarm sync runs in the background for as long as stdin stays open.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use log::{error, info, warn};
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, BufReader};

use marksync::app::{lock_app, App};
use marksync::rpc_handler::handle_request;
use marksync::services::scheduler::Scheduler;
use marksync::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Simple rate limiter: max requests per second.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self { window_start: Instant::now(), request_count: 0, max_per_second }
    }

    /// Returns true if the request is allowed, false if rate-limited.
    fn check(&mut self) -> bool {
        if self.window_start.elapsed().as_secs() >= 1 {
            self.window_start = Instant::now();
            self.request_count = 0;
        }
        self.request_count += 1;
        self.request_count <= self.max_per_second
    }
}

fn respond(value: &Value) {
    let mut out = io::stdout().lock();
    if writeln!(out, "{}", value).and_then(|_| out.flush()).is_err() {
        warn!("stdout closed, dropping response");
    }
}

/// `--settings <path>` overrides the settings file location.
fn settings_path_arg() -> Option<String> {
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--settings" {
            return args.next();
        }
    }
    None
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut engine = SettingsEngine::new(settings_path_arg());
    let settings = match engine.load() {
        Ok(s) => s,
        Err(e) => {
            warn!("using default settings: {}", e);
            engine.get_settings().clone()
        }
    };

    let app = match App::new(engine) {
        Ok(app) => Arc::new(Mutex::new(app)),
        Err(e) => {
            error!("failed to initialize marksync: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = lock_app(&app).startup() {
        warn!("install check failed: {}", e);
    }

    let scheduler = Scheduler::from_settings(&settings);
    let alarm = scheduler.spawn(Arc::clone(&app));
    info!("alarm sync every {} minutes", scheduler.period().as_secs() / 60);

    respond(&json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")}));

    // At most 200 requests per second.
    let mut rate_limiter = RateLimiter::new(200);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(l)) => l,
            Ok(None) => break,
            Err(e) => {
                error!("stdin read failed: {}", e);
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: Value = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                respond(&json!({"id": null, "error": format!("parse error: {}", e)}));
                continue;
            }
        };

        let id = req.get("id").cloned().unwrap_or(Value::Null);

        if !rate_limiter.check() {
            respond(&json!({"id": id, "error": "rate limit exceeded"}));
            continue;
        }

        let command = req.get("command").cloned().unwrap_or(Value::Null);
        let shared = Arc::clone(&app);
        let result = tokio::task::spawn_blocking(move || handle_request(&shared, &command))
            .await
            .unwrap_or_else(|e| Err(format!("command task failed: {}", e)));

        let response = match result {
            Ok(val) => json!({"id": id, "result": val}),
            Err(err) => json!({"id": id, "error": err}),
        };
        respond(&response);
    }

    alarm.abort();
    info!("stdin closed, shutting down");
}
