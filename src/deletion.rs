//! Bulk deletion of the selected threads
//!
//! Deletes run one at a time in selection order. A failed delete is reported
//! and counted, and the loop moves on to the next thread.

use crate::client::ThreadsClient;
use crate::console::Console;
use crate::debug;
use crate::http::HttpClient;
use crate::thread::Thread;
use anyhow::Result;

/// Tally of a deletion pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteSummary {
    pub deleted: usize,
    pub failed: usize,
}

impl DeleteSummary {
    /// Number of threads a delete was attempted for
    pub fn attempted(&self) -> usize {
        self.deleted + self.failed
    }
}

/// Confirm and delete `threads`
///
/// Anything other than "yes" (any case) at the confirmation prompt aborts
/// with nothing deleted. Only console errors (closed input) are returned as
/// `Err`; per-thread failures are counted in the summary.
pub fn delete_threads<H: HttpClient>(
    client: &ThreadsClient<H>,
    console: &mut dyn Console,
    threads: &[Thread],
) -> Result<DeleteSummary> {
    let mut summary = DeleteSummary::default();
    if threads.is_empty() {
        return Ok(summary);
    }

    let total = threads.len();
    console.say(&format!("\n🗑️  Deleting {total} threads..."));

    let confirm = console.ask(&format!(
        "Are you sure you want to delete {total} threads? (yes/no): "
    ))?;
    if !confirm.eq_ignore_ascii_case("yes") {
        console.say("Deletion cancelled.");
        return Ok(summary);
    }

    for thread in threads {
        let id = &thread.thread_id;
        if id.is_empty() {
            summary.failed += 1;
            debug::log_delete("?", "missing thread_id");
            console.say("❌ Failed to delete thread: server returned it without a thread_id");
            continue;
        }

        match client.delete_thread(id) {
            Ok(response) if response.is_success() => {
                summary.deleted += 1;
                debug::log_delete(id, "deleted");
                console.progress(&format!("✅ Deleted: {}/{total}", summary.deleted));
            }
            Ok(response) => {
                summary.failed += 1;
                let detail = format!("{} {}", response.status, response.status_text);
                debug::log_delete(id, &detail);
                console.say(&format!("❌ Failed to delete thread {id}: {detail}"));
            }
            Err(e) => {
                summary.failed += 1;
                debug::log_delete(id, &format!("{e:#}"));
                console.say(&format!("❌ Error deleting thread {id}: {e:#}"));
            }
        }
    }

    console.say(&format!(
        "\n\n📈 Summary: {} deleted, {} failed",
        summary.deleted, summary.failed
    ));
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::ScriptedConsole;
    use crate::http::{Headers, HttpResponse, MockHttpClient};
    use mockall::Sequence;

    fn threads(count: usize) -> Vec<Thread> {
        (1..=count)
            .map(|i| Thread {
                thread_id: format!("t{i}"),
                created_at: None,
                status: Some("idle".to_string()),
                runs: None,
                metadata: None,
            })
            .collect()
    }

    fn response(status: u16, status_text: &str) -> HttpResponse {
        HttpResponse {
            status,
            status_text: status_text.to_string(),
            body: String::new(),
        }
    }

    #[test]
    fn test_failures_are_isolated_and_order_is_kept() {
        let mut seq = Sequence::new();
        let mut mock = MockHttpClient::new();
        for i in 1..=5 {
            let expected = format!("http://h/threads/t{i}");
            mock.expect_delete()
                .withf(move |url: &str, _: &Headers| url == expected)
                .times(1)
                .in_sequence(&mut seq)
                .returning(move |_, _| {
                    if i == 3 {
                        Err(anyhow::anyhow!("connection reset by peer"))
                    } else {
                        Ok(response(200, "OK"))
                    }
                });
        }

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["yes"]);

        let summary = delete_threads(&client, &mut console, &threads(5)).unwrap();

        assert_eq!(summary, DeleteSummary { deleted: 4, failed: 1 });
        assert_eq!(summary.attempted(), 5);
        assert!(console.printed("Error deleting thread t3"));
        assert!(console.printed("connection reset by peer"));
        assert!(console.printed("Summary: 4 deleted, 1 failed"));
    }

    #[test]
    fn test_error_status_counts_as_failure() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete()
            .withf(|url: &str, _: &Headers| url.ends_with("/t1"))
            .times(1)
            .returning(|_, _| Ok(response(404, "Not Found")));
        mock.expect_delete()
            .withf(|url: &str, _: &Headers| url.ends_with("/t2"))
            .times(1)
            .returning(|_, _| Ok(response(204, "No Content")));

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["YES"]);

        let summary = delete_threads(&client, &mut console, &threads(2)).unwrap();

        assert_eq!(summary, DeleteSummary { deleted: 1, failed: 1 });
        assert!(console.printed("Failed to delete thread t1: 404 Not Found"));
    }

    #[test]
    fn test_declined_confirmation_deletes_nothing() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete().times(0);

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["y"]);

        let summary = delete_threads(&client, &mut console, &threads(3)).unwrap();

        assert_eq!(summary, DeleteSummary::default());
        assert!(console.printed("Deletion cancelled."));
    }

    #[test]
    fn test_empty_selection_skips_confirmation() {
        let mock = MockHttpClient::new();
        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["yes"]);

        let summary = delete_threads(&client, &mut console, &[]).unwrap();

        assert_eq!(summary.attempted(), 0);
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_api_key_sent_on_delete() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete()
            .withf(|_: &str, headers: &Headers| {
                headers.contains(&("X-Api-Key".to_string(), "lsv2_pt_abc".to_string()))
            })
            .times(1)
            .returning(|_, _| Ok(response(200, "OK")));

        let client = ThreadsClient::with_http_client("http://h", Some("lsv2_pt_abc".to_string()), mock);
        let mut console = ScriptedConsole::new(["yes"]);

        let summary = delete_threads(&client, &mut console, &threads(1)).unwrap();
        assert_eq!(summary.deleted, 1);
    }

    #[test]
    fn test_thread_without_id_counts_as_failure() {
        let mut mock = MockHttpClient::new();
        mock.expect_delete()
            .withf(|url: &str, _: &Headers| url == "http://h/threads/t2")
            .times(1)
            .returning(|_, _| Ok(response(200, "OK")));

        let mut selection = threads(2);
        selection[0].thread_id = String::new();

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["yes"]);

        let summary = delete_threads(&client, &mut console, &selection).unwrap();

        assert_eq!(summary, DeleteSummary { deleted: 1, failed: 1 });
        assert!(console.printed("without a thread_id"));
    }
}
