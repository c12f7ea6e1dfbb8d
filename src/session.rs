//! One cleanup session: discover, select, delete

use crate::client::ThreadsClient;
use crate::console::Console;
use crate::deletion::{DeleteSummary, delete_threads};
use crate::discovery::discover;
use crate::http::HttpClient;
use crate::selection::Selector;
use anyhow::Result;

/// Run a full interactive cleanup against `client`
///
/// Returns the deletion tally; an operator who exits from the menus, or a
/// server with no threads, yields an empty tally.
pub fn run_session<H: HttpClient>(
    client: &ThreadsClient<H>,
    console: &mut dyn Console,
    review_page_size: usize,
) -> Result<DeleteSummary> {
    let threads = discover(client, console)?;
    if threads.is_empty() {
        console.say("\n📋 No threads found.");
        return Ok(DeleteSummary::default());
    }

    let selection = Selector::new(&threads, &mut *console)
        .with_page_size(review_page_size)
        .run()?;

    let summary = match selection {
        Some(selected) => delete_threads(client, console, &selected)?,
        None => DeleteSummary::default(),
    };

    if summary.deleted > 0 {
        console.say(&format!(
            "\n🎉 Cleanup completed. Total threads deleted: {}",
            summary.deleted
        ));
    } else {
        console.say("\n✅ No threads were deleted.");
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::{Cancelled, ScriptedConsole};
    use crate::http::{Headers, HttpResponse, MockHttpClient};
    use mockall::Sequence;

    fn ok(body: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            status_text: "OK".to_string(),
            body: body.to_string(),
        }
    }

    const TWO_THREADS: &str = r#"[
        {"thread_id": "idle-1", "status": "idle", "runs": []},
        {"thread_id": "done-1", "status": "completed", "runs": [{}, {}]}
    ]"#;

    /// Probe, one full page, then the terminating empty page
    fn listing_mock() -> MockHttpClient {
        let mut seq = Sequence::new();
        let mut mock = MockHttpClient::new();
        mock.expect_post()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(ok(TWO_THREADS)));
        mock.expect_post()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(ok(TWO_THREADS)));
        mock.expect_post()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(ok("[]")));
        mock
    }

    #[test]
    fn test_session_deletes_selected_status() {
        let mut mock = listing_mock();
        mock.expect_delete()
            .withf(|url: &str, _: &Headers| url == "http://h/threads/idle-1")
            .times(1)
            .returning(|_, _| Ok(ok("")));

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["2", "1", "2", "yes"]);

        let summary = run_session(&client, &mut console, 5).unwrap();

        assert_eq!(summary, DeleteSummary { deleted: 1, failed: 0 });
        assert!(console.printed("Cleanup completed. Total threads deleted: 1"));
    }

    #[test]
    fn test_session_exit_deletes_nothing() {
        let mut mock = listing_mock();
        mock.expect_delete().times(0);

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["7"]);

        let summary = run_session(&client, &mut console, 5).unwrap();

        assert_eq!(summary, DeleteSummary::default());
        assert!(console.printed("No threads were deleted."));
    }

    #[test]
    fn test_session_without_threads_skips_menus() {
        let mut mock = MockHttpClient::new();
        mock.expect_post().times(2).returning(|_, _, _| Ok(ok("[]")));

        let client = ThreadsClient::with_http_client("http://h", None, mock);
        let mut console = ScriptedConsole::new(["7"]);

        let summary = run_session(&client, &mut console, 5).unwrap();

        assert_eq!(summary, DeleteSummary::default());
        assert!(console.printed("No threads found."));
        assert_eq!(console.remaining(), 1);
    }

    #[test]
    fn test_session_closed_input_is_cancellation() {
        let client = ThreadsClient::with_http_client("http://h", None, listing_mock());
        let mut console = ScriptedConsole::new(Vec::<String>::new());

        let err = run_session(&client, &mut console, 5).unwrap_err();
        assert!(err.is::<Cancelled>());
    }
}
