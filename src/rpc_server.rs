//! LinkSafe RPC Server: JSON-RPC over stdin/stdout for a UI shell.
//!
//! Protocol: one JSON object per line (newline-delimited JSON).
//! Request:  {"id":1, "method":"link.add", "params":{"url":"...","title":"..."}}
//! Response: {"id":1, "result":{...}} or
//!           {"id":1, "error":{"kind":"...","message":"...","retryable":false}}

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use std::sync::Mutex;
use std::time::Instant;

use linksafe::app::App;
use linksafe::config::AppConfig;
use linksafe::logging::init_logging;
use linksafe::rpc_handler::{handle_method, RpcError};

use log::{error, info, warn};
use serde_json::{json, Value};

/// Requests accepted per one-second window.
const MAX_REQUESTS_PER_SECOND: u32 = 200;

/// Fixed-window rate limiter over all methods.
struct RateLimiter {
    window_start: Instant,
    request_count: u32,
    max_per_second: u32,
}

impl RateLimiter {
    fn new(max_per_second: u32) -> Self {
        Self {
            window_start: Instant::now(),
            request_count: 0,
            max_per_second,
        }
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

fn emit(out: &mut impl Write, value: &Value) -> io::Result<()> {
    writeln!(out, "{}", value)?;
    out.flush()
}

fn main() -> ExitCode {
    let config = AppConfig::from_env();
    if let Err(err) = init_logging(&config.log_level, &config.log_dir()) {
        eprintln!("linksafe-rpc: logging disabled: {}", err);
    }

    let app = match App::open(&config) {
        Ok(app) => Mutex::new(app),
        Err(err) => {
            error!("event=app_open module=rpc status=error error={}", err);
            eprintln!("linksafe-rpc: failed to open store: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if emit(&mut out, &json!({"event": "ready", "version": env!("CARGO_PKG_VERSION")})).is_err() {
        return ExitCode::FAILURE;
    }
    info!("event=rpc_ready module=rpc status=ok");

    let mut rate_limiter = RateLimiter::new(MAX_REQUESTS_PER_SECOND);

    for line in io::stdin().lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<Value>(&line) {
            Err(e) => {
                let err = RpcError::invalid_params(format!("parse error: {}", e));
                json!({"id": null, "error": err})
            }
            Ok(req) => {
                let id = req.get("id").cloned().unwrap_or(Value::Null);
                if !rate_limiter.check() {
                    warn!("event=rate_limited module=rpc status=rejected");
                    let err = RpcError {
                        kind: "rate_limited".to_string(),
                        message: "rate limit exceeded".to_string(),
                        retryable: true,
                    };
                    json!({"id": id, "error": err})
                } else {
                    let method = req.get("method").and_then(|v| v.as_str()).unwrap_or("");
                    let params = req.get("params").cloned().unwrap_or(json!({}));
                    match handle_method(&app, method, &params) {
                        Ok(val) => json!({"id": id, "result": val}),
                        Err(err) => {
                            warn!(
                                "event=rpc_call module=rpc method={} status=error kind={}",
                                method, err.kind
                            );
                            json!({"id": id, "error": err})
                        }
                    }
                }
            }
        };

        if emit(&mut out, &response).is_err() {
            break;
        }
    }

    info!("event=rpc_shutdown module=rpc status=ok");
    ExitCode::SUCCESS
}
