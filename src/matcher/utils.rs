//! Matcher grammar helpers, grounded on
//! `original_source/arki/matcher/utils.cc`: AND-level clause splitting,
//! OR-level alternative splitting, and the `OptionalCommaList` used by
//! most per-kind sub-patterns (`GRIB1,200` parses the same way
//! `GRIB1,200,,1` would, with missing fields left as wildcards).

use crate::{err_at, Result};

/// Split an expression into AND-ed clauses on `;` or newline, the way
/// `Matcher::parse` splits its top-level string.
pub fn split_and(expr: &str) -> Vec<&str> {
    expr.split(|c| c == ';' || c == '\n')
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Split a single clause into its kind name and pattern, on the first `:`.
pub fn split_clause(clause: &str) -> Result<(&str, &str)> {
    match clause.find(':') {
        Some(idx) => Ok((clause[..idx].trim(), clause[idx + 1..].trim())),
        None => err_at!(ParseError, msg: "clause {:?} is missing a ':'", clause),
    }
}

/// Split a pattern into OR-ed alternatives on a case-insensitive " or ".
pub fn split_or(pattern: &str) -> Vec<&str> {
    let mut parts = vec![];
    let bytes = pattern.as_bytes();
    let lower = pattern.to_lowercase();
    let mut start = 0;
    let mut i = 0;
    while i + 4 <= bytes.len() {
        if &lower[i..i + 4] == " or " {
            parts.push(pattern[start..i].trim());
            i += 4;
            start = i;
            continue;
        }
        i += 1;
    }
    parts.push(pattern[start..].trim());
    parts.into_iter().filter(|s| !s.is_empty()).collect()
}

/// A comma-separated style pattern with optional fields: `GRIB1,200,,1`
/// means "style GRIB1, field 0 = 200, field 1 = wildcard, field 2 = 1".
/// The first field (before the first comma) is the style tag.
#[derive(Debug, Clone)]
pub struct OptionalCommaList {
    pub style: String,
    pub fields: Vec<Option<String>>,
}

impl OptionalCommaList {
    pub fn parse(pattern: &str) -> OptionalCommaList {
        let mut parts = pattern.split(',').map(|s| s.trim());
        let style = parts.next().unwrap_or("").to_string();
        let fields = parts
            .map(|s| if s.is_empty() { None } else { Some(s.to_string()) })
            .collect();
        OptionalCommaList { style, fields }
    }

    pub fn get_int(&self, idx: usize) -> Result<Option<i64>> {
        match self.fields.get(idx).and_then(|f| f.as_ref()) {
            None => Ok(None),
            Some(s) => {
                let v = err_at!(ParseError, s.parse::<i64>())?;
                Ok(Some(v))
            }
        }
    }

    pub fn get_str(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).and_then(|f| f.as_deref())
    }
}

/// Compares an optional pattern field against a concrete value: `None`
/// (absent/wildcard) always matches.
pub fn field_matches_i64(pattern: Option<i64>, actual: i64) -> bool {
    pattern.map_or(true, |p| p == actual)
}

#[cfg(test)]
#[path = "utils_test.rs"]
mod utils_test;
