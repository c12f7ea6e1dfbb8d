//! threadsweep - interactive thread cleanup
//!
//! This crate discovers the threads stored on a LangGraph-compatible server,
//! groups them for inspection, and deletes the subset an operator picks.
//!
//! # Modules
//!
//! - [`client`] - Threads API endpoints, paging and deletes
//! - [`discovery`] - Endpoint probing and full thread listing
//! - [`categorize`] - Status / run-count / graph partitions
//! - [`selection`] - Interactive selection menus
//! - [`deletion`] - Confirmed, sequential bulk delete
//! - [`session`] - One discover → select → delete pass
//! - [`console`] - Operator input/output seam
//! - [`config`] - `.threadsweep.toml` support

pub mod categorize;
pub mod client;
pub mod config;
pub mod console;
pub mod debug;
pub mod deletion;
pub mod discovery;
pub mod http;
pub mod selection;
pub mod session;
pub mod thread;

// Re-export commonly used types
pub use categorize::{CategoryIndex, RunBucket, categorize};
pub use client::{Endpoint, Method, ThreadsClient};
pub use config::Config;
pub use console::{Cancelled, Console, ScriptedConsole, StdConsole};
pub use deletion::{DeleteSummary, delete_threads};
pub use discovery::discover;
pub use http::{HttpClient, HttpResponse, UreqHttpClient};
pub use selection::Selector;
pub use session::run_session;
pub use thread::Thread;
