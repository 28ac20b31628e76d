//! # Append-Only Job Logs
//!
//! Newline-delimited, best-effort log appends. A failed write is reported via
//! `tracing::error!` and swallowed; no job ever aborts because its log file
//! is unavailable.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tracing::error;

/// Appends one line (newline added) to the file at `path`, creating it if
/// needed.
pub fn append_line(path: &Path, line: &str) {
    let result = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .and_then(|mut file| writeln!(file, "{line}"));

    if let Err(err) = result {
        error!(path = %path.display(), %err, "Failed to append to job log");
    }
}


#[cfg(test)]
mod tests {
    use super::tests_support::temp_log;
    use super::*;

    #[test]
    fn test_append_creates_and_appends() {
        let path = temp_log("crm_append_test");

        append_line(&path, "first");
        append_line(&path, "second");

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents, "first\nsecond\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_failed_write_does_not_panic() {
        // A directory path cannot be opened as a file; the append degrades to
        // an error log.
        append_line(&std::env::temp_dir(), "ignored");
    }
}
