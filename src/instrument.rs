//! Coarse-grained profiling instrumentation.
//!
//! A process-wide session brackets the run and collects scoped timer events
//! into a chrome://tracing JSON file (load it at `chrome://tracing` or in
//! Perfetto). Everything is no-op safe: timers dropped outside an active
//! session record nothing, and session failures degrade to logged warnings.

use std::collections::hash_map::DefaultHasher;
use std::fs::File;
use std::hash::{Hash, Hasher};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

use log::{info, warn};
use serde::Serialize;

/// One duration event in the chrome tracing format.
#[derive(Serialize)]
struct TraceEvent<'a> {
    cat: &'static str,
    /// Duration in microseconds
    dur: u128,
    name: &'a str,
    ph: &'static str,
    pid: u32,
    tid: u64,
    /// Start timestamp in microseconds since session begin
    ts: u128,
}

struct Session {
    writer: BufWriter<File>,
    epoch: Instant,
    event_count: usize,
}

static SESSION: Mutex<Option<Session>> = Mutex::new(None);

/// Begin the process-wide profiling session, writing to `path`.
///
/// A failure to create the trace file leaves profiling disabled for the run.
pub fn begin_session(name: &str, path: impl AsRef<Path>) {
    let path = path.as_ref();
    let file = match File::create(path) {
        Ok(file) => file,
        Err(e) => {
            warn!("Failed to create trace file {}: {}", path.display(), e);
            return;
        }
    };

    let mut session = Session {
        writer: BufWriter::new(file),
        epoch: Instant::now(),
        event_count: 0,
    };
    if let Err(e) = write!(session.writer, "{{\"otherData\":{{}},\"traceEvents\":[") {
        warn!("Failed to write trace header: {}", e);
        return;
    }

    info!("Profiling session '{}' writing to {}", name, path.display());
    *SESSION.lock().unwrap() = Some(session);
}

/// End the profiling session and flush the trace file.
pub fn end_session() {
    let mut guard = SESSION.lock().unwrap();
    if let Some(mut session) = guard.take() {
        let result = write!(session.writer, "]}}").and_then(|_| session.writer.flush());
        if let Err(e) = result {
            warn!("Failed to finalize trace file: {}", e);
        }
    }
}

/// Record one completed scope into the active session, if any.
fn write_profile(name: &str, start_us: u128, duration_us: u128) {
    let mut guard = SESSION.lock().unwrap();
    let Some(session) = guard.as_mut() else {
        return;
    };

    let event = TraceEvent {
        cat: "function",
        dur: duration_us,
        name,
        ph: "X",
        pid: 0,
        tid: current_thread_hash(),
        ts: start_us,
    };

    let prefix = if session.event_count > 0 { "," } else { "" };
    let serialized = match serde_json::to_string(&event) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize trace event: {}", e);
            return;
        }
    };
    if let Err(e) = write!(session.writer, "{}{}", prefix, serialized) {
        warn!("Failed to write trace event: {}", e);
        return;
    }
    session.event_count += 1;
}

/// Microseconds elapsed since the session epoch, or None without a session.
fn since_epoch() -> Option<u128> {
    let guard = SESSION.lock().unwrap();
    guard.as_ref().map(|s| s.epoch.elapsed().as_micros())
}

/// Stable per-thread id for the trace's tid column.
fn current_thread_hash() -> u64 {
    let mut hasher = DefaultHasher::new();
    std::thread::current().id().hash(&mut hasher);
    hasher.finish()
}

/// Scoped timer recording a duration event when dropped.
pub struct ScopeTimer {
    name: &'static str,
    start: Instant,
    start_us: Option<u128>,
}

impl ScopeTimer {
    /// Start timing a named scope.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            start_us: since_epoch(),
        }
    }
}

impl Drop for ScopeTimer {
    fn drop(&mut self) {
        // No session at construction time means nothing to record
        if let Some(start_us) = self.start_us {
            write_profile(self.name, start_us, self.start.elapsed().as_micros());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timer_without_session_is_noop() {
        // Must not panic or write anywhere
        let timer = ScopeTimer::new("orphan");
        drop(timer);
    }

    #[test]
    fn test_session_writes_trace_events() {
        let path = std::env::temp_dir().join("scanray_trace_test.json");
        begin_session("test", &path);
        {
            let _timer = ScopeTimer::new("scope_a");
            let _other = ScopeTimer::new("scope_b");
        }
        end_session();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\"otherData\":{}"));
        assert!(text.contains("\"traceEvents\":["));
        assert!(text.contains("scope_a"));
        assert!(text.contains("scope_b"));
        // Must be valid JSON end to end
        let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert!(parsed["traceEvents"].as_array().unwrap().len() >= 2);
        let _ = std::fs::remove_file(&path);
    }
}
