//! Clean command implementation

use crate::cli::Settings;
use anyhow::Result;
use threadsweep::debug_log;
use threadsweep::session::run_session;
use threadsweep::{StdConsole, ThreadsClient};

/// Run an interactive cleanup session against the configured server
pub fn run_clean(settings: &Settings) -> Result<()> {
    debug_log!("[SESSION] starting against {}", settings.base_url);

    let client = ThreadsClient::new(&settings.base_url, settings.api_key.clone(), settings.timeout)
        .with_page_size(settings.page_size);
    let mut console = StdConsole;

    let summary = run_session(&client, &mut console, settings.review_page_size)?;
    debug_log!(
        "[SESSION] finished: {} deleted, {} failed",
        summary.deleted,
        summary.failed
    );

    Ok(())
}
