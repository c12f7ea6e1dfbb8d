//! Thread categorization
//!
//! Partitions a thread set three ways (status, run-count bucket, graph id)
//! for the selection menus. The index is derived data and is rebuilt from
//! the full thread set every time the main menu is shown.

use crate::thread::Thread;
use std::fmt;

/// Run-count bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunBucket {
    Zero,
    One,
    /// 2, 3 or 4 runs, labelled with the exact count
    Exact(usize),
    FiveToNine,
    TenToNineteen,
    TwentyPlus,
}

impl RunBucket {
    pub fn for_count(count: usize) -> Self {
        match count {
            0 => RunBucket::Zero,
            1 => RunBucket::One,
            2..=4 => RunBucket::Exact(count),
            5..=9 => RunBucket::FiveToNine,
            10..=19 => RunBucket::TenToNineteen,
            _ => RunBucket::TwentyPlus,
        }
    }

    /// Smallest run count that falls in this bucket
    pub fn lower_bound(&self) -> usize {
        match self {
            RunBucket::Zero => 0,
            RunBucket::One => 1,
            RunBucket::Exact(n) => *n,
            RunBucket::FiveToNine => 5,
            RunBucket::TenToNineteen => 10,
            RunBucket::TwentyPlus => 20,
        }
    }

    pub fn label(&self) -> String {
        match self {
            RunBucket::Zero => "0 runs".to_string(),
            RunBucket::One => "1 run".to_string(),
            RunBucket::Exact(n) => format!("{n} runs"),
            RunBucket::FiveToNine => "5-9 runs".to_string(),
            RunBucket::TenToNineteen => "10-19 runs".to_string(),
            RunBucket::TwentyPlus => "20+ runs".to_string(),
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            RunBucket::Zero => "🚫",
            RunBucket::One => "1️⃣",
            RunBucket::TwentyPlus => "🔥",
            _ => "🔢",
        }
    }
}

impl fmt::Display for RunBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

/// Icon shown next to a status tag
pub fn status_icon(status: &str) -> &'static str {
    match status {
        "idle" => "😴",
        "running" | "busy" => "🏃",
        "completed" => "✅",
        "failed" | "error" => "❌",
        "pending" | "interrupted" => "⏳",
        _ => "❓",
    }
}

/// One group of threads sharing a key
#[derive(Debug, Clone, PartialEq)]
pub struct Bucket<K> {
    pub key: K,
    pub threads: Vec<Thread>,
}

impl<K> Bucket<K> {
    /// Threads in this bucket; never zero, a bucket is created by its first thread
    pub fn count(&self) -> usize {
        self.threads.len()
    }
}

/// Buckets kept in first-seen key order
///
/// Menu numbering is derived from this order, so it must be stable for the
/// same input.
#[derive(Debug, Clone, PartialEq)]
pub struct Grouping<K> {
    buckets: Vec<Bucket<K>>,
}

impl<K> Default for Grouping<K> {
    fn default() -> Self {
        Self { buckets: Vec::new() }
    }
}

impl<K: PartialEq> Grouping<K> {
    /// Append `thread` to the bucket for `key`, creating it at the end if new
    pub fn insert(&mut self, key: K, thread: Thread) {
        match self.buckets.iter_mut().find(|b| b.key == key) {
            Some(bucket) => bucket.threads.push(thread),
            None => self.buckets.push(Bucket {
                key,
                threads: vec![thread],
            }),
        }
    }

    pub fn get(&self, key: &K) -> Option<&Bucket<K>> {
        self.buckets.iter().find(|b| &b.key == key)
    }
}

impl<K> Grouping<K> {
    pub fn buckets(&self) -> &[Bucket<K>] {
        &self.buckets
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of threads across all buckets
    pub fn thread_count(&self) -> usize {
        self.buckets.iter().map(Bucket::count).sum()
    }
}

/// Three parallel partitions of one thread set
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryIndex {
    pub total: usize,
    pub by_status: Grouping<String>,
    pub by_runs: Grouping<RunBucket>,
    /// Only threads that carry a graph id
    pub by_graph: Grouping<String>,
}

impl CategoryIndex {
    /// Run buckets ordered by their lower bound instead of first-seen order
    pub fn runs_ascending(&self) -> Vec<&Bucket<RunBucket>> {
        let mut buckets: Vec<_> = self.by_runs.buckets().iter().collect();
        buckets.sort_by_key(|b| b.key.lower_bound());
        buckets
    }

    /// Human-readable category report
    pub fn report(&self) -> String {
        let mut lines = vec![format!("\n📋 Total threads found: {}", self.total)];

        if !self.by_status.is_empty() {
            lines.push("\n📝 By Status:".to_string());
            for bucket in self.by_status.buckets() {
                lines.push(format!(
                    "├─ {} {}: {}",
                    status_icon(&bucket.key),
                    bucket.key,
                    bucket.count()
                ));
            }
        }

        if !self.by_runs.is_empty() {
            lines.push("\n🏃 By Runs:".to_string());
            for bucket in self.by_runs.buckets() {
                lines.push(format!("├─ {} {}: {}", bucket.key.icon(), bucket.key, bucket.count()));
            }
        }

        if !self.by_graph.is_empty() {
            lines.push("\n🔧 By Graph ID:".to_string());
            for bucket in self.by_graph.buckets() {
                lines.push(format!("├─ 📊 {}: {}", bucket.key, bucket.count()));
            }
        }

        lines.join("\n")
    }
}

/// Build the category index for `threads`
pub fn categorize(threads: &[Thread]) -> CategoryIndex {
    let mut index = CategoryIndex {
        total: threads.len(),
        ..CategoryIndex::default()
    };

    for thread in threads {
        if let Some(graph_id) = thread.graph_id() {
            index.by_graph.insert(graph_id.to_string(), thread.clone());
        }
        index
            .by_status
            .insert(thread.status().to_string(), thread.clone());
        index
            .by_runs
            .insert(RunBucket::for_count(thread.run_count()), thread.clone());
    }

    index
}
