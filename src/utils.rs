use crate::models::QuestionEntry;
use anyhow::{Context, Result};
use std::path::Path;

/// Install the stderr log subscriber used by the binaries
/// Honors RUST_LOG and defaults to `info`
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Read a question bank: a JSON array of question entries
pub fn read_question_bank(path: &Path) -> Result<Vec<QuestionEntry>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read question bank: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse question bank: {}", path.display()))
}

/// Write a question bank back as pretty-printed JSON
pub fn write_question_bank(path: &Path, entries: &[QuestionEntry]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries).context("Failed to serialize question bank")?;
    std::fs::write(path, json + "\n")
        .with_context(|| format!("Failed to write question bank: {}", path.display()))
}

fn subject_matches(entry: &QuestionEntry, subject: &str) -> bool {
    entry
        .subject
        .as_deref()
        .map(|s| s.trim().eq_ignore_ascii_case(subject.trim()))
        .unwrap_or(false)
}

/// Pick up to `limit` tagged entries to use as few-shot examples
///
/// Entries filed under `subject` come first, then entries with no subject.
/// Entries for other subjects are never used. Within each group the most
/// recent (last in the bank) win, returned in bank order.
pub fn select_examples(entries: &[QuestionEntry], subject: &str, limit: usize) -> Vec<QuestionEntry> {
    if limit == 0 {
        return Vec::new();
    }

    let usable = |e: &&QuestionEntry| e.is_tagged() && e.has_text();

    let mut picked: Vec<usize> = entries
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, e)| usable(e) && subject_matches(e, subject))
        .map(|(i, _)| i)
        .take(limit)
        .collect();

    if picked.len() < limit {
        let remaining = limit - picked.len();
        picked.extend(
            entries
                .iter()
                .enumerate()
                .rev()
                .filter(|(_, e)| usable(e) && e.subject.is_none())
                .map(|(i, _)| i)
                .take(remaining),
        );
    }

    picked.sort_unstable();
    picked.into_iter().map(|i| entries[i].clone()).collect()
}
