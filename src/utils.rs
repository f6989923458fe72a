//! Utility functions for logging, ordering, and file system checks.
//!
//! - String truncation for log previews of fetched HTML
//! - Ordering saved articles by topic id
//! - File system validation for output directories

use crate::models::Article;
use itertools::Itertools;
use std::cmp::Reverse;
use std::error::Error;
use std::fs as stdfs;
use std::path::Path;
use tokio::fs;
use tracing::{info, instrument};

/// Truncate a string for logging purposes.
///
/// Long strings are cut to at most `max` bytes (on a char boundary) with an
/// ellipsis and the number of dropped bytes appended.
///
/// # Arguments
///
/// * `s` - The string to potentially truncate
/// * `max` - Maximum number of bytes to keep
///
/// # Returns
///
/// The original string if it fits in `max` bytes, otherwise a truncated
/// version with `"…(+N bytes)"` appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log(&"a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Order articles newest topic first.
///
/// # Arguments
///
/// * `articles` - Articles in aggregation order
///
/// # Returns
///
/// The same articles sorted by descending topic id. Articles without a
/// numeric `id=` sort last, keeping their relative order.
pub fn sort_by_topic_id(articles: Vec<Article>) -> Vec<Article> {
    articles
        .into_iter()
        .sorted_by_key(|a| Reverse(a.topic_id().unwrap_or(0)))
        .collect()
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
///
/// # Arguments
///
/// * `path` - Directory the output file will be written into
///
/// # Errors
///
/// Returns an error if the directory cannot be created or written to.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn ensure_writable_dir(path: &Path) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    // Sync write; the error surface is simpler than tokio's.
    let scratch = path.join("..__write_check__");
    stdfs::File::create(&scratch)?;
    let _ = stdfs::remove_file(&scratch);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundary() {
        // Each Hangul syllable is 3 bytes in UTF-8.
        let result = truncate_for_log("긱뉴스", 4);
        assert_eq!(result, "긱…(+6 bytes)");
    }

    #[test]
    fn test_sort_by_topic_id() {
        let articles = vec![
            Article::new("old", "https://news.hada.io/topic?id=5"),
            Article::new("external", "https://example.com/post"),
            Article::new("new", "https://news.hada.io/topic?id=20"),
            Article::new("mid", "https://news.hada.io/topic?id=10"),
        ];
        let titles: Vec<String> = sort_by_topic_id(articles)
            .into_iter()
            .map(|a| a.title)
            .collect();
        assert_eq!(titles, vec!["new", "mid", "old", "external"]);
    }

    #[tokio::test]
    async fn test_ensure_writable_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("a/b");
        ensure_writable_dir(&target).await.unwrap();
        assert!(target.is_dir());
        assert!(!target.join("..__write_check__").exists());
    }
}
