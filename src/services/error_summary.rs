//! Log line cleaning and search term extraction.
//!
//! Failing log lines carry harness prefixes, process ids, and paths that
//! vary run to run. Matchers compare and search on cleaned forms so the
//! same underlying failure keeps producing the same evidence.

use std::sync::LazyLock;

use regex::Regex;

static HARNESS_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+:\d+:\d+[ ]+(?:DEBUG|INFO|WARNING|ERROR|CRITICAL|FATAL) - [ ]?")
        .expect("valid regex")
});

static PROCESS_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:PID \d+|GECKO\(\d+\)) \| +").expect("valid regex"));

static LEAK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+ bytes leaked \((.+)\)$|leak at (.+)$").expect("valid regex"));

static CRASH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".+ application crashed \[@ (.+)\]$").expect("valid regex"));

static REFTEST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+[=!]=\s+.*").expect("valid regex"));

/// Bugzilla summaries are capped well below this; longer terms add noise
/// without adding selectivity.
const MAX_SEARCH_TERM_LEN: usize = 100;

/// Search terms that would match far too many bug summaries to be useful.
const UNHELPFUL_TERMS: &[&str] = &[
    "automation.py",
    "remoteautomation.py",
    "Shutdown",
    "undefined",
    "Main app process exited normally",
    "Traceback (most recent call last):",
    "Return code: 0",
    "Return code: 1",
    "Return code: 2",
    "Return code: 10",
    "leakcheck",
];

/// Strip harness log prefixes and process ids from a raw log line.
pub fn get_cleaned_line(line: &str) -> String {
    let without_prefix = HARNESS_PREFIX_RE.replace(line, "");
    PROCESS_ID_RE
        .replace(without_prefix.trim(), "")
        .into_owned()
}

/// Generate a search term from an error line, suitable for a full-text
/// bug search. Returns `None` when no selective term can be built.
pub fn get_error_search_term(error_line: &str) -> Option<String> {
    if error_line.is_empty() {
        return None;
    }

    let tokens: Vec<&str> = error_line.split(" | ").collect();
    let mut search_term: Option<String> = None;

    if tokens.len() >= 3 {
        // "FAILURE-TYPE | testNameOrFilePath | message" format
        let test_name_or_path = tokens[1];
        let message = tokens[2];

        if let Some(caps) = LEAK_RE.captures(message) {
            search_term = caps
                .get(1)
                .or_else(|| caps.get(2))
                .map(|m| m.as_str().to_string());
        } else {
            // Reference paths of reftests are not very unique; strip them,
            // then keep only the last path component.
            let stripped = REFTEST_RE.replace(test_name_or_path, "");
            let name = stripped
                .rsplit(['/', '\\'])
                .next()
                .unwrap_or(&stripped)
                .to_string();
            search_term = Some(name);
        }
    }

    let helpful = search_term
        .as_deref()
        .is_some_and(is_helpful_search_term);
    if !helpful {
        search_term = if is_helpful_search_term(error_line) {
            Some(error_line.to_string())
        } else {
            None
        };
    }

    search_term.map(|term| truncate(&term, MAX_SEARCH_TERM_LEN))
}

/// Extract a crash signature (`... application crashed [@ sig]`) from an
/// error line.
pub fn get_crash_signature(error_line: &str) -> Option<String> {
    let caps = CRASH_RE.captures(error_line)?;
    let signature = caps.get(1)?.as_str();
    if is_helpful_search_term(signature) {
        Some(signature.to_string())
    } else {
        None
    }
}

/// Whether a search term is selective enough to be worth searching for.
pub fn is_helpful_search_term(search_term: &str) -> bool {
    let term = search_term.trim();
    term.chars().count() > 4 && !UNHELPFUL_TERMS.contains(&term)
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
