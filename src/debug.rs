//! Debug logging utilities
//!
//! Provides debug logging that only activates in debug builds.
//! In release builds, all debug_log! calls are no-ops.

use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

/// Log file written in the current directory
pub const DEBUG_LOG_FILE: &str = "threadsweep-debug.log";

static DEBUG_FILE: Mutex<Option<std::fs::File>> = Mutex::new(None);

/// Initialize debug logging (only in debug builds)
#[cfg(debug_assertions)]
pub fn init() {
    let Ok(mut file_guard) = DEBUG_FILE.lock() else {
        return;
    };
    if file_guard.is_none() {
        if let Ok(file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(DEBUG_LOG_FILE)
        {
            *file_guard = Some(file);
            drop(file_guard);
            log("=== Debug session started ===");
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn init() {}

/// Log a message to the debug log (only in debug builds)
#[cfg(debug_assertions)]
pub fn log(message: &str) {
    let timestamp = chrono::Local::now().format("%H:%M:%S%.3f");
    let line = format!("[{}] {}\n", timestamp, message);

    if let Ok(mut file_guard) = DEBUG_FILE.lock() {
        if let Some(ref mut file) = *file_guard {
            let _ = file.write_all(line.as_bytes());
            let _ = file.flush();
        }
    }
}

#[cfg(not(debug_assertions))]
pub fn log(_message: &str) {}

/// Log an HTTP exchange; `status` is `None` on transport failure
#[cfg(debug_assertions)]
pub fn log_request(method: &str, url: &str, status: Option<u16>) {
    match status {
        Some(code) => log(&format!("[HTTP] {} {} -> {}", method, url, code)),
        None => log(&format!("[HTTP] {} {} -> transport error", method, url)),
    }
}

#[cfg(not(debug_assertions))]
pub fn log_request(_method: &str, _url: &str, _status: Option<u16>) {}

/// Log a menu state change
#[cfg(debug_assertions)]
pub fn log_transition(from: &str, to: &str) {
    log(&format!("[MENU] {} -> {}", from, to));
}

#[cfg(not(debug_assertions))]
pub fn log_transition(_from: &str, _to: &str) {}

/// Log the outcome of a single thread deletion
#[cfg(debug_assertions)]
pub fn log_delete(thread_id: &str, outcome: &str) {
    let truncated = if outcome.len() > 200 {
        format!("{}...", outcome.chars().take(200).collect::<String>())
    } else {
        outcome.to_string()
    };
    log(&format!("[DELETE:{}] {}", thread_id, truncated));
}

#[cfg(not(debug_assertions))]
pub fn log_delete(_thread_id: &str, _outcome: &str) {}

/// Macro for convenient debug logging
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        $crate::debug::log(&format!($($arg)*))
    };
}
