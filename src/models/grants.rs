//! Raw grants and the grant summarizer
//!
//! Snapshots carry either a single privilege string (MySQL `SHOW GRANTS`
//! output) or an ordered list of role names (DocumentDB/Atlas). Diffing
//! compares grants as opaque values; the summarizer condenses them into a
//! short label for change descriptions and coarse role inference. The
//! summary is lossy and presentation-oriented, never a security input.

use serde::{Deserialize, Serialize};

/// A raw privilege specification attached to an account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GrantSet {
    /// A single grant statement string
    Text(String),
    /// An ordered list of role names
    List(Vec<String>),
}

impl GrantSet {
    /// Whether this grant set carries no privilege text at all
    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Text(s) if s.is_empty())
    }
}

impl Default for GrantSet {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl From<&str> for GrantSet {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Summary label length above which the text form is truncated
const MAX_SUMMARY_LEN: usize = 50;

/// Condense a raw grant set into a short canonical label
///
/// Rules, first match wins:
/// 1. Absent grants -> `"NONE"`.
/// 2. A role list -> its comma-joined representation, as-is.
/// 3. `ALL PRIVILEGES` or more than 10 comma-separated clauses -> `"ALL"`,
///    or `"ALL + GRANT OPTION"` when the grant-option marker is present.
/// 4. Otherwise the statement is reduced to its privilege list: every
///    `GRANT ` keyword and the trailing `ON *.* TO ...` clause are removed,
///    long remainders are truncated with an ellipsis, and an empty
///    remainder falls back to the original raw string.
pub fn summarize_grants(grants: &GrantSet) -> String {
    if grants.is_absent() {
        return "NONE".to_string();
    }

    let raw = match grants {
        GrantSet::Text(s) => s.as_str(),
        GrantSet::List(roles) => return roles.join(","),
    };

    if raw.contains("ALL PRIVILEGES") || raw.split(',').count() > 10 {
        if raw.contains("GRANT OPTION") {
            return "ALL + GRANT OPTION".to_string();
        }
        return "ALL".to_string();
    }

    let stripped = strip_on_clause(&strip_grant_keyword(raw));
    let simplified = stripped.trim();

    if simplified.chars().count() > MAX_SUMMARY_LEN {
        let head: String = simplified.chars().take(MAX_SUMMARY_LEN - 3).collect();
        return format!("{}...", head);
    }

    if simplified.is_empty() {
        raw.to_string()
    } else {
        simplified.to_string()
    }
}

/// Remove every case-insensitive `GRANT` keyword and its trailing whitespace
fn strip_grant_keyword(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = String::with_capacity(s.len());
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if i + 5 <= bytes.len()
            && bytes[i..i + 5].eq_ignore_ascii_case(b"GRANT")
            && bytes.get(i + 5).is_some_and(|b| b.is_ascii_whitespace())
        {
            out.push_str(&s[start..i]);
            i += 5;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            start = i;
        } else {
            i += 1;
        }
    }

    out.push_str(&s[start..]);
    out
}

/// Cut the statement at the first case-insensitive `ON *.* TO ` clause
fn strip_on_clause(s: &str) -> String {
    const PATTERN: &[u8] = b"ON *.* TO ";
    let bytes = s.as_bytes();

    if bytes.len() >= PATTERN.len() {
        for i in 0..=bytes.len() - PATTERN.len() {
            if bytes[i..i + PATTERN.len()].eq_ignore_ascii_case(PATTERN) {
                return s[..i].to_string();
            }
        }
    }

    s.to_string()
}
