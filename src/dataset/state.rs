//! Dataset and per-segment state (§4.9): health as observed by the
//! checker, plus the archive/delete age classification derived from
//! `archive_age`/`delete_age` (Open Question resolution: age is measured
//! from a period's *end*, via `Reftime::age_instant`).

use chrono::NaiveDateTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Ok,
    Dirty,
    Unaligned,
    Missing,
    Deleted,
    Corrupted,
    ArchiveAge,
    DeleteAge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeClass {
    Current,
    Archive,
    Delete,
}

/// Classify a reftime's age instant against the dataset's configured
/// thresholds. `delete_age` takes priority over `archive_age` when both
/// apply, since delete is the more drastic action (§4.9).
pub fn classify_age(
    instant: NaiveDateTime,
    now: NaiveDateTime,
    archive_age_days: Option<i64>,
    delete_age_days: Option<i64>,
) -> AgeClass {
    let age_days = (now - instant).num_days();
    if let Some(delete_age) = delete_age_days {
        if age_days >= delete_age {
            return AgeClass::Delete;
        }
    }
    if let Some(archive_age) = archive_age_days {
        if age_days >= archive_age {
            return AgeClass::Archive;
        }
    }
    AgeClass::Current
}

#[cfg(test)]
#[path = "state_test.rs"]
mod state_test;
