// src/sandbox.rs
//
// Sandboxed snippet execution via the Boa engine. Guest code gets a fresh
// context per run with no host bindings: no filesystem, no network, no
// timers. This replaces the browser's unrestricted dynamic-function
// construction with an actual isolation boundary.

use boa_engine::{Context, JsValue, Source};
use log::info;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("JavaScript execution error: {0}")]
    ExecutionError(String),

    #[error("Execution timeout after {0}ms")]
    Timeout(u64),
}

/// What a run produced: every captured console line, in call order, plus
/// the wrapper function's return value when it returned one.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub console: Vec<String>,
    pub value: Option<String>,
}

// Installed before the learner's code. All console-style calls append to a
// capture buffer which is drained after evaluation.
const CONSOLE_SHIM: &str = r#"
var __console_lines = [];
var console = (function () {
    function record(args) {
        var parts = [];
        for (var i = 0; i < args.length; i++) {
            var a = args[i];
            if (typeof a === "object" && a !== null) {
                try { parts.push(JSON.stringify(a)); }
                catch (_err) { parts.push(String(a)); }
            } else {
                parts.push(String(a));
            }
        }
        __console_lines.push(parts.join(" "));
    }
    return {
        log: function () { record(arguments); },
        info: function () { record(arguments); },
        warn: function () { record(arguments); },
        error: function () { record(arguments); },
        debug: function () { record(arguments); },
    };
})();
"#;

pub struct CodeSandbox {
    timeout_ms: u64,
}

impl CodeSandbox {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    /// Evaluates learner code wrapped in a function scope and captures its
    /// console output.
    ///
    /// Boa has no native preemption, so the timeout is a post-hoc check on
    /// wall-clock time rather than a hard interrupt.
    pub fn execute(&self, code: &str) -> Result<ExecutionOutcome, SandboxError> {
        let start = Instant::now();
        let mut context = Context::default();

        context
            .eval(Source::from_bytes(CONSOLE_SHIM))
            .map_err(|e| SandboxError::ExecutionError(e.to_string()))?;

        // Wrap in a function scope so a top-level `return` is legal, the
        // way the original ran snippets through a constructed function.
        let wrapped = format!("(function() {{\n{code}\n}})()");
        let result = context.eval(Source::from_bytes(&wrapped));

        let elapsed = start.elapsed();

        // Replay captured output to the real console right away.
        let console = drain_console(&mut context);
        for line in &console {
            info!("[sandbox] {line}");
        }

        if elapsed > Duration::from_millis(self.timeout_ms) {
            return Err(SandboxError::Timeout(self.timeout_ms));
        }

        match result {
            Ok(value) => {
                let value = if value.is_undefined() {
                    None
                } else {
                    Some(js_value_to_string(&value, &mut context))
                };
                Ok(ExecutionOutcome { console, value })
            }
            Err(e) => Err(SandboxError::ExecutionError(e.to_string())),
        }
    }
}

fn drain_console(context: &mut Context) -> Vec<String> {
    let Ok(buffer) = context.eval(Source::from_bytes("__console_lines")) else {
        return Vec::new();
    };
    match buffer.to_json(context) {
        Ok(serde_json::Value::Array(lines)) => lines
            .into_iter()
            .map(|line| match line {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn js_value_to_string(value: &JsValue, context: &mut Context) -> String {
    if value.is_null() {
        return "null".to_string();
    }

    // JSON first (best for objects/arrays), display string as fallback.
    if let Ok(json) = value.to_json(context) {
        return json.to_string();
    }
    value.display().to_string()
}
