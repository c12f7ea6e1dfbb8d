//! Interactive selection menus
//!
//! The menus form a state machine driven by [`Selector::run`]: each state
//! prints its options, reads one answer and either moves to another state or
//! finishes with a selection. Going back to the main menu rebuilds the
//! category index from the full thread set.

use crate::categorize::{CategoryIndex, categorize, status_icon};
use crate::console::Console;
use crate::debug;
use crate::debug_log;
use crate::thread::Thread;
use anyhow::Result;
use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

/// Default number of threads shown per preview/review page
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// Phrase the operator must type to confirm deleting everything
pub const DELETE_ALL_PHRASE: &str = "DELETE ALL";

/// Preset creation-time windows ending at "now"
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeWindow {
    LastHour,
    LastWeek,
    LastMonth,
    AllTime,
}

impl TimeWindow {
    /// Map a time-menu answer to a window
    pub fn from_choice(choice: &str) -> Option<Self> {
        match choice {
            "1" => Some(TimeWindow::LastHour),
            "2" => Some(TimeWindow::LastWeek),
            "3" => Some(TimeWindow::LastMonth),
            "4" => Some(TimeWindow::AllTime),
            _ => None,
        }
    }

    /// Inclusive `[start, end]` bounds relative to `now`
    pub fn bounds(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            TimeWindow::LastHour => now - Duration::hours(1),
            TimeWindow::LastWeek => now - Duration::days(7),
            TimeWindow::LastMonth => now - Duration::days(30),
            TimeWindow::AllTime => DateTime::<Utc>::UNIX_EPOCH,
        };
        (start, now)
    }

    pub fn description(&self) -> &'static str {
        match self {
            TimeWindow::LastHour => "within the last hour",
            TimeWindow::LastWeek => "within the last week",
            TimeWindow::LastMonth => "within the last month",
            TimeWindow::AllTime => "from all time",
        }
    }
}

/// Threads created inside `[start, end]`; threads without a usable
/// timestamp never match
pub fn filter_window(threads: &[Thread], start: DateTime<Utc>, end: DateTime<Utc>) -> Vec<Thread> {
    threads
        .iter()
        .filter(|t| t.created_at_utc().is_some_and(|at| start <= at && at <= end))
        .cloned()
        .collect()
}

/// Threads created strictly before `cutoff`
pub fn filter_before(threads: &[Thread], cutoff: DateTime<Utc>) -> Vec<Thread> {
    threads
        .iter()
        .filter(|t| t.created_at_utc().is_some_and(|at| at < cutoff))
        .cloned()
        .collect()
}

/// Parse a cutoff typed by the operator, interpreted as UTC.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD HH:MM` and
/// `YYYY-MM-DD HH:MM:SS`.
pub fn parse_cutoff(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if input.contains(' ') {
        ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
            .map(|naive| naive.and_utc())
    } else {
        NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Which filter menu produced a [`Filtered`] set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Time,
    CustomRange,
    Status,
    Runs,
    Graph,
}

/// Result of a filter step, pending the operator's decision
#[derive(Debug, Clone, PartialEq)]
pub struct Filtered {
    pub threads: Vec<Thread>,
    /// Phrase completing "Reviewing N threads ..."
    pub description: String,
    pub origin: Origin,
}

/// Menu states
#[derive(Debug, Clone, PartialEq)]
enum Menu {
    Main,
    ByTime,
    CustomRange,
    ByStatus,
    ByRuns,
    ByGraph,
    Preview { start: usize },
    ConfirmDeleteAll,
    Review { filtered: Filtered, start: usize },
}

impl Menu {
    fn name(&self) -> &'static str {
        match self {
            Menu::Main => "main",
            Menu::ByTime => "time",
            Menu::CustomRange => "custom-range",
            Menu::ByStatus => "status",
            Menu::ByRuns => "runs",
            Menu::ByGraph => "graph",
            Menu::Preview { .. } => "preview",
            Menu::ConfirmDeleteAll => "confirm-delete-all",
            Menu::Review { .. } => "review",
        }
    }
}

/// Outcome of one menu interaction
enum Step {
    Goto(Menu),
    Done(Option<Vec<Thread>>),
}

/// Answer to a numbered bucket menu with a trailing "back" entry
enum Pick {
    Bucket(usize),
    Back,
    Nothing,
}

fn pick(choice: &str, bucket_count: usize) -> Pick {
    match choice.parse::<usize>() {
        Ok(n) if (1..=bucket_count).contains(&n) => Pick::Bucket(n - 1),
        Ok(n) if n == bucket_count + 1 => Pick::Back,
        _ => Pick::Nothing,
    }
}

/// Drives the selection menus over a fetched thread set
pub struct Selector<'a> {
    threads: &'a [Thread],
    console: &'a mut dyn Console,
    index: CategoryIndex,
    page_size: usize,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> Selector<'a> {
    pub fn new(threads: &'a [Thread], console: &'a mut dyn Console) -> Self {
        Self {
            threads,
            console,
            index: CategoryIndex::default(),
            page_size: DEFAULT_PAGE_SIZE,
            clock: Utc::now,
        }
    }

    /// Threads per preview/review page (minimum 1)
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Replace the source of "now" used by time filters
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Run the menus until the operator picks a selection or exits.
    ///
    /// `Ok(None)` means the operator chose to exit; `Ok(Some(v))` is the
    /// selection to delete, which may be empty.
    pub fn run(mut self) -> Result<Option<Vec<Thread>>> {
        let mut menu = Menu::Main;
        loop {
            let from = menu.name();
            match self.step(menu)? {
                Step::Goto(next) => {
                    debug::log_transition(from, next.name());
                    menu = next;
                }
                Step::Done(selection) => {
                    debug_log!(
                        "[MENU] {from} finished with {}",
                        selection
                            .as_ref()
                            .map_or("no selection".to_string(), |s| format!("{} threads", s.len()))
                    );
                    return Ok(selection);
                }
            }
        }
    }

    fn step(&mut self, menu: Menu) -> Result<Step> {
        match menu {
            Menu::Main => self.main_menu(),
            Menu::ByTime => self.time_menu(),
            Menu::CustomRange => self.custom_range(),
            Menu::ByStatus => self.status_menu(),
            Menu::ByRuns => self.runs_menu(),
            Menu::ByGraph => self.graph_menu(),
            Menu::Preview { start } => self.preview(start),
            Menu::ConfirmDeleteAll => self.confirm_delete_all(),
            Menu::Review { filtered, start } => self.review(filtered, start),
        }
    }

    fn say(&mut self, text: &str) {
        self.console.say(text);
    }

    fn main_menu(&mut self) -> Result<Step> {
        self.index = categorize(self.threads);
        let report = self.index.report();
        self.say(&report);

        self.say("\n🎯 What would you like to delete?");
        self.say("1. ⏰ Delete by TIME");
        self.say("2. 📝 Delete by STATUS");
        self.say("3. 🏃 Delete by RUNS COUNT");
        self.say("4. 🔧 Delete by GRAPH ID");
        self.say("5. 👁️  PREVIEW all threads");
        self.say("6. ⚠️  Delete ALL threads - DANGEROUS!");
        self.say("7. 🚪 Exit without deleting");

        let choice = self.console.ask("\nSelect option (1-7): ")?;
        let step = match choice.as_str() {
            "1" => Step::Goto(Menu::ByTime),
            "2" => Step::Goto(Menu::ByStatus),
            "3" => Step::Goto(Menu::ByRuns),
            "4" => Step::Goto(Menu::ByGraph),
            "5" => Step::Goto(Menu::Preview { start: 0 }),
            "6" => Step::Goto(Menu::ConfirmDeleteAll),
            "7" => {
                self.say("Exiting without deleting anything.");
                Step::Done(None)
            }
            _ => {
                self.say("Invalid choice. Exiting.");
                Step::Done(None)
            }
        };
        Ok(step)
    }

    fn time_menu(&mut self) -> Result<Step> {
        self.say("\n⏰ Delete threads created:");
        self.say("1. Within the last hour");
        self.say("2. Within the last week");
        self.say("3. Within the last month");
        self.say("4. All time (any date)");
        self.say("5. Custom date range");
        self.say("6. 🚪 Go back to main menu");

        let choice = self.console.ask("\nSelect time option (1-6): ")?;
        let window = match choice.as_str() {
            "5" => return Ok(Step::Goto(Menu::CustomRange)),
            "6" => return Ok(Step::Goto(Menu::Main)),
            other => match TimeWindow::from_choice(other) {
                Some(window) => window,
                None => {
                    self.say("Invalid choice. Going back.");
                    return Ok(Step::Goto(Menu::ByTime));
                }
            },
        };

        let (start, end) = window.bounds((self.clock)());
        let threads = filter_window(self.threads, start, end);
        self.say(&format!(
            "\nFound {} threads created {}.",
            threads.len(),
            window.description()
        ));

        if threads.is_empty() {
            self.say("No threads match your time criteria.");
            return Ok(Step::Goto(Menu::ByTime));
        }

        self.offer(Filtered {
            threads,
            description: window.description().to_string(),
            origin: Origin::Time,
        })
    }

    fn custom_range(&mut self) -> Result<Step> {
        self.say("\n📅 Delete threads created before a specific date:");
        self.say("Enter date in format: YYYY-MM-DD HH:MM (24-hour format, UTC)");
        self.say("Or just YYYY-MM-DD for whole day");
        self.say("Example: 2024-01-15 14:30 or 2024-01-15");
        self.say("All threads created BEFORE this date will be deleted.\n");

        let input = self.console.ask("Delete threads created before: ")?;
        let Some(cutoff) = parse_cutoff(&input) else {
            self.say("❌ Invalid date format. Please use YYYY-MM-DD or YYYY-MM-DD HH:MM");
            return Ok(Step::Goto(Menu::CustomRange));
        };
        if cutoff > (self.clock)() {
            self.say("❌ Cutoff date cannot be in the future.");
            return Ok(Step::Goto(Menu::CustomRange));
        }

        let threads = filter_before(self.threads, cutoff);
        let cutoff_str = cutoff.format("%m/%d/%Y, %I:%M:%S %p UTC").to_string();
        self.say(&format!(
            "\nFound {} threads created before {cutoff_str}.",
            threads.len()
        ));

        if threads.is_empty() {
            self.say("No threads were created before this date.");
            self.say("1. Try different date");
            self.say("2. 🚪 Go back to time menu");

            let choice = self.console.ask("\nSelect option (1-2): ")?;
            let next = if choice == "1" {
                Menu::CustomRange
            } else {
                Menu::ByTime
            };
            return Ok(Step::Goto(next));
        }

        self.offer(Filtered {
            threads,
            description: format!("created before {cutoff_str}"),
            origin: Origin::CustomRange,
        })
    }

    fn status_menu(&mut self) -> Result<Step> {
        self.say("\n📝 Select Status:");
        let entries: Vec<(String, Vec<Thread>)> = self
            .index
            .by_status
            .buckets()
            .iter()
            .map(|b| (b.key.clone(), b.threads.clone()))
            .collect();
        for (i, (status, threads)) in entries.iter().enumerate() {
            self.say(&format!(
                "{}. {} {} ({} threads)",
                i + 1,
                status_icon(status),
                status,
                threads.len()
            ));
        }
        self.say(&format!("{}. 🚪 Go back to main menu", entries.len() + 1));

        let choice = self
            .console
            .ask(&format!("Select status (1-{}): ", entries.len() + 1))?;
        match pick(&choice, entries.len()) {
            Pick::Bucket(i) => {
                let (status, threads) = entries[i].clone();
                self.say(&format!(
                    "\nFound {} threads with status \"{status}\".",
                    threads.len()
                ));
                self.offer(Filtered {
                    threads,
                    description: format!("with status \"{status}\""),
                    origin: Origin::Status,
                })
            }
            Pick::Back => Ok(Step::Goto(Menu::Main)),
            Pick::Nothing => Ok(Step::Done(Some(Vec::new()))),
        }
    }

    fn runs_menu(&mut self) -> Result<Step> {
        self.say("\n🏃 Select by Runs Count:");
        let entries: Vec<_> = self
            .index
            .runs_ascending()
            .into_iter()
            .map(|b| (b.key, b.threads.clone()))
            .collect();
        for (i, (bucket, threads)) in entries.iter().enumerate() {
            self.say(&format!(
                "{}. {} {} ({} threads)",
                i + 1,
                bucket.icon(),
                bucket,
                threads.len()
            ));
        }
        self.say(&format!("{}. 🚪 Go back to main menu", entries.len() + 1));

        let choice = self
            .console
            .ask(&format!("Select runs category (1-{}): ", entries.len() + 1))?;
        match pick(&choice, entries.len()) {
            Pick::Bucket(i) => {
                let (bucket, threads) = entries[i].clone();
                self.say(&format!("\nFound {} threads with {bucket}.", threads.len()));
                self.offer(Filtered {
                    threads,
                    description: format!("with {bucket}"),
                    origin: Origin::Runs,
                })
            }
            Pick::Back => Ok(Step::Goto(Menu::Main)),
            Pick::Nothing => Ok(Step::Done(Some(Vec::new()))),
        }
    }

    fn graph_menu(&mut self) -> Result<Step> {
        self.say("\n🔧 Select by Graph ID:");
        let entries: Vec<(String, Vec<Thread>)> = self
            .index
            .by_graph
            .buckets()
            .iter()
            .map(|b| (b.key.clone(), b.threads.clone()))
            .collect();
        for (i, (graph, threads)) in entries.iter().enumerate() {
            self.say(&format!("{}. 📊 {graph} ({} threads)", i + 1, threads.len()));
        }
        self.say(&format!("{}. 🚪 Go back to main menu", entries.len() + 1));

        let choice = self
            .console
            .ask(&format!("Select graph (1-{}): ", entries.len() + 1))?;
        match pick(&choice, entries.len()) {
            Pick::Bucket(i) => {
                let (graph, threads) = entries[i].clone();
                self.say(&format!(
                    "\nFound {} threads for graph \"{graph}\".",
                    threads.len()
                ));
                self.offer(Filtered {
                    threads,
                    description: format!("for graph \"{graph}\""),
                    origin: Origin::Graph,
                })
            }
            Pick::Back => Ok(Step::Goto(Menu::Main)),
            Pick::Nothing => Ok(Step::Done(Some(Vec::new()))),
        }
    }

    /// Ask what to do with a filter result: review, delete now, or go back
    fn offer(&mut self, filtered: Filtered) -> Result<Step> {
        self.say("\nDo you want to:");
        self.say("1. 👁️  Review threads before deleting");
        self.say("2. Delete immediately");

        let choice = if filtered.origin == Origin::CustomRange {
            self.say("3. Try different date");
            self.say("4. 🚪 Go back to time menu");
            self.console.ask("\nSelect option (1-4): ")?
        } else {
            let menu_name = match filtered.origin {
                Origin::Status => "status",
                Origin::Runs => "runs",
                Origin::Graph => "graphs",
                Origin::Time | Origin::CustomRange => "time",
            };
            self.say(&format!("3. 🚪 Go back to {menu_name} menu"));
            self.console.ask("\nSelect option (1-3): ")?
        };

        let step = match (choice.as_str(), filtered.origin) {
            ("1", _) => Step::Goto(Menu::Review { filtered, start: 0 }),
            ("3", Origin::Time) => Step::Goto(Menu::ByTime),
            ("3", Origin::CustomRange) => Step::Goto(Menu::CustomRange),
            ("3", Origin::Status) => Step::Goto(Menu::ByStatus),
            ("3", Origin::Runs) => Step::Goto(Menu::ByRuns),
            ("3", Origin::Graph) => Step::Goto(Menu::ByGraph),
            ("4", Origin::CustomRange) => Step::Goto(Menu::ByTime),
            _ => Step::Done(Some(filtered.threads)),
        };
        Ok(step)
    }

    /// Print one page of `threads` and return the index just past it
    fn show_page(&mut self, threads: &[Thread], start: usize, heading: &str) -> usize {
        let end = (start + self.page_size).min(threads.len());
        self.say(&format!(
            "\n--- {heading} {}-{end} of {} ---",
            start + 1,
            threads.len()
        ));
        for (offset, thread) in threads[start..end].iter().enumerate() {
            self.say(&format!("\n[{}]", start + offset + 1));
            self.say(&thread.summary());
        }
        end
    }

    fn preview(&mut self, start: usize) -> Result<Step> {
        let threads = self.threads;
        if start == 0 {
            self.say(&format!("\n👁️  Previewing all {} threads:", threads.len()));
        }

        if threads.is_empty() {
            self.say("No threads found.");
            self.say("1. 🚪 Go back to main menu");
            self.console.ask("\nSelect option (1): ")?;
            return Ok(Step::Goto(Menu::Main));
        }

        let end = self.show_page(threads, start, "All Threads");
        if end < threads.len() {
            self.say("\n1. Continue to next page");
            self.say("2. 🚪 Go back to main menu");

            let choice = self.console.ask("\nSelect option (1-2): ")?;
            if choice == "2" {
                return Ok(Step::Goto(Menu::Main));
            }
            Ok(Step::Goto(Menu::Preview { start: end }))
        } else {
            self.say("\n--- End of all threads ---");
            self.say("1. 🚪 Go back to main menu");
            self.console.ask("\nSelect option (1): ")?;
            Ok(Step::Goto(Menu::Main))
        }
    }

    fn review(&mut self, filtered: Filtered, start: usize) -> Result<Step> {
        if start == 0 {
            self.say(&format!(
                "\n👁️  Reviewing {} threads {}:",
                filtered.threads.len(),
                filtered.description
            ));
        }
        if filtered.threads.is_empty() {
            return Ok(Step::Done(Some(Vec::new())));
        }

        let end = self.show_page(&filtered.threads, start, "Threads");
        if end < filtered.threads.len() {
            self.say("\n1. Continue to next page");
            self.say("2. Delete all these threads");
            self.say("3. 🚪 Cancel and return to main menu");

            let choice = self.console.ask("\nSelect option (1-3): ")?;
            let step = match choice.as_str() {
                "2" => Step::Done(Some(filtered.threads)),
                "3" => Step::Goto(Menu::Main),
                _ => Step::Goto(Menu::Review {
                    filtered,
                    start: end,
                }),
            };
            Ok(step)
        } else {
            self.say("\n--- End of threads ---");
            self.say("1. Delete all reviewed threads");
            self.say("2. 🚪 Cancel and return to main menu");

            let choice = self.console.ask("\nSelect option (1-2): ")?;
            if choice == "2" {
                return Ok(Step::Goto(Menu::Main));
            }
            Ok(Step::Done(Some(filtered.threads)))
        }
    }

    fn confirm_delete_all(&mut self) -> Result<Step> {
        let total = self.threads.len();
        self.say(&format!(
            "\n⚠️  WARNING: You are about to delete ALL {total} threads!"
        ));
        self.say("This action cannot be undone.");
        self.say("\n1. Continue with deletion");
        self.say("2. 🚪 Go back to main menu");

        if self.console.ask("\nSelect option (1-2): ")? != "1" {
            return Ok(Step::Goto(Menu::Main));
        }

        let phrase = self
            .console
            .ask(&format!("\nType \"{DELETE_ALL_PHRASE}\" to confirm: "))?;
        if phrase != DELETE_ALL_PHRASE {
            self.say("Confirmation failed. Returning to main menu.");
            return Ok(Step::Goto(Menu::Main));
        }

        let last = self.console.ask(&format!(
            "\nFinal confirmation: Delete all {total} threads? (yes/no): "
        ))?;
        if !last.eq_ignore_ascii_case("yes") {
            self.say("Deletion cancelled. Returning to main menu.");
            return Ok(Step::Goto(Menu::Main));
        }

        Ok(Step::Done(Some(self.threads.to_vec())))
    }
}
