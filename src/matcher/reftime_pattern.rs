//! Reftime matcher clause: a date range restriction plus SQL rendering for
//! the sqlite-backed index.

use chrono::{NaiveDate, NaiveDateTime};

use crate::{err_at, types::Reftime, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReftimePattern {
    pub min: Option<NaiveDateTime>,
    pub max: Option<NaiveDateTime>,
}

fn parse_datetime(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S") {
        return Ok(dt);
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Ok(date.and_hms_opt(0, 0, 0).unwrap());
    }
    err_at!(ParseError, msg: "unrecognized reftime {:?}", text)
}

impl ReftimePattern {
    /// Parses `">=2021-01-01"`, `"2021-01-01 to 2021-01-31"`, `"=2021-01-01"`,
    /// or a bare date/time treated as an exact match.
    pub fn parse(pattern: &str) -> Result<ReftimePattern> {
        let pattern = pattern.trim();
        if let Some(rest) = pattern.strip_prefix(">=") {
            return Ok(ReftimePattern { min: Some(parse_datetime(rest.trim())?), max: None });
        }
        if let Some(rest) = pattern.strip_prefix("<=") {
            return Ok(ReftimePattern { min: None, max: Some(parse_datetime(rest.trim())?) });
        }
        if let Some(rest) = pattern.strip_prefix('>') {
            let t = parse_datetime(rest.trim())?;
            return Ok(ReftimePattern { min: Some(t + chrono::Duration::seconds(1)), max: None });
        }
        if let Some(rest) = pattern.strip_prefix('<') {
            let t = parse_datetime(rest.trim())?;
            return Ok(ReftimePattern { min: None, max: Some(t - chrono::Duration::seconds(1)) });
        }
        if let Some(rest) = pattern.strip_prefix('=') {
            let t = parse_datetime(rest.trim())?;
            return Ok(ReftimePattern { min: Some(t), max: Some(t) });
        }
        if let Some(idx) = pattern.to_lowercase().find(" to ") {
            let min = parse_datetime(pattern[..idx].trim())?;
            let max = parse_datetime(pattern[idx + 4..].trim())?;
            return Ok(ReftimePattern { min: Some(min), max: Some(max) });
        }
        let t = parse_datetime(pattern)?;
        Ok(ReftimePattern { min: Some(t), max: Some(t) })
    }

    /// True if `reftime` overlaps the restricted range (§4.2: a period
    /// matches if any instant in it falls within the range).
    pub fn matches(&self, reftime: &Reftime) -> bool {
        let (begin, end) = (reftime.begin(), reftime.end());
        if let Some(min) = self.min {
            if end < min {
                return false;
            }
        }
        if let Some(max) = self.max {
            if begin > max {
                return false;
            }
        }
        true
    }

    /// Render as a `column BETWEEN ...`-shaped SQL fragment for the
    /// sqlite index. The `reftime` column holds zero-padded ISO8601 text
    /// (`YYYY-MM-DDTHH:MM:SS`), which sorts lexicographically in the same
    /// order as chronologically, so a quoted string literal pushes the
    /// range down to SQLite same as a numeric column would.
    pub fn to_sql(&self, column: &str) -> String {
        fn literal(t: NaiveDateTime) -> String {
            format!("'{}'", t.format("%Y-%m-%dT%H:%M:%S"))
        }
        match (self.min, self.max) {
            (Some(min), Some(max)) => {
                format!("{} >= {} AND {} <= {}", column, literal(min), column, literal(max))
            }
            (Some(min), None) => format!("{} >= {}", column, literal(min)),
            (None, Some(max)) => format!("{} <= {}", column, literal(max)),
            (None, None) => "1".to_string(),
        }
    }
}

#[cfg(test)]
#[path = "reftime_pattern_test.rs"]
mod reftime_pattern_test;
