/*!
 * Common test utilities for the hansub test suite
 */

use std::fs;
use std::path::{Path, PathBuf};
use anyhow::Result;
use tempfile::TempDir;

use hansub::{Config, SubtitleEditor, SubtitleEntry};

/// Sample SRT document with two entries
pub const SAMPLE_SRT: &str = "1\n00:00:01,000 --> 00:00:04,500\n첫 번째 자막\n\n2\n00:00:05,000 --> 00:00:09,000\n두 번째\n자막\n";

/// Route library logs to the test output; safe to call from every test
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Build entries from `(id, start_ms, end_ms, text)` tuples
pub fn entries(items: &[(&str, u64, u64, &str)]) -> Vec<SubtitleEntry> {
    items
        .iter()
        .map(|&(id, start, end, text)| SubtitleEntry::new(id, start, end, text))
        .collect()
}

/// Editor with default config loaded with the given entries
pub fn editor_with(items: &[(&str, u64, u64, &str)]) -> SubtitleEditor {
    let mut editor = SubtitleEditor::new(&Config::default());
    editor
        .load(entries(items))
        .expect("fixture entries should load");
    editor
}

/// Assert that no two entries in start order overlap
pub fn assert_no_overlaps(entries: &[SubtitleEntry]) {
    for pair in entries.windows(2) {
        assert!(
            pair[0].end_time_ms <= pair[1].start_time_ms,
            "{} overlaps {}",
            pair[0],
            pair[1]
        );
    }
}
