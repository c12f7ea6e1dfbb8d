//! Thread discovery
//!
//! Probes the candidate listing endpoints, adopts the first one that answers
//! with a success status, then pages through it until an empty page.

use crate::client::{Endpoint, ThreadsClient};
use crate::console::Console;
use crate::debug_log;
use crate::http::HttpClient;
use crate::thread::Thread;
use anyhow::{Context, Result, bail};

/// Find the first listing endpoint that answers with a success status
pub fn find_working_endpoint<H: HttpClient>(
    client: &ThreadsClient<H>,
    console: &mut dyn Console,
) -> Result<Endpoint> {
    for endpoint in client.candidate_endpoints() {
        console.say(&format!("🔍 Trying {endpoint}"));

        match client.send_page(&endpoint, 0) {
            Ok(response) if response.is_success() => {
                console.say(&format!("✅ Found working endpoint: {endpoint}"));
                debug_log!("[DISCOVERY] adopted {endpoint}");
                return Ok(endpoint);
            }
            Ok(response) => {
                console.say(&format!(
                    "❌ {endpoint} failed: {} {}",
                    response.status, response.status_text
                ));
                if response.is_auth_error() {
                    console.say(&format!("   Error details: {}", response.body));
                }
            }
            Err(e) => {
                console.say(&format!("❌ {endpoint} error: {e:#}"));
            }
        }
    }

    console.say("\n❌ None of the thread endpoints worked. Please check:");
    console.say("1. Your server URL is correct");
    console.say("2. Your API key has the right permissions");
    console.say("3. The server is running and accessible");
    bail!("Could not find a working threads endpoint")
}

/// Page through `endpoint` until the server returns an empty page
///
/// The offset advances by the number of threads actually received, so a
/// server that caps pages below the requested size is still walked fully.
pub fn fetch_all_threads<H: HttpClient>(
    client: &ThreadsClient<H>,
    endpoint: &Endpoint,
    console: &mut dyn Console,
) -> Result<Vec<Thread>> {
    let mut all_threads = Vec::new();
    let mut offset = 0;

    loop {
        let response = client.send_page(endpoint, offset)?;
        if !response.is_success() {
            bail!(
                "Search request failed: {} {}",
                response.status,
                response.status_text
            );
        }

        let page: Vec<Thread> = serde_json::from_str(&response.body)
            .with_context(|| format!("Failed to parse threads page at offset {offset}"))?;
        if page.is_empty() {
            break;
        }

        offset += page.len();
        all_threads.extend(page);
        console.progress(&format!("Found: {} threads", all_threads.len()));
    }

    debug_log!(
        "[DISCOVERY] fetched {} threads from {endpoint}",
        all_threads.len()
    );
    Ok(all_threads)
}

/// Probe for a working endpoint and fetch every thread from it
pub fn discover<H: HttpClient>(
    client: &ThreadsClient<H>,
    console: &mut dyn Console,
) -> Result<Vec<Thread>> {
    console.say("🔍 Discovering threads...");
    console.say(&format!("📡 Connecting to: {}", client.base_url()));

    let endpoint = find_working_endpoint(client, console)?;
    fetch_all_threads(client, &endpoint, console)
}
