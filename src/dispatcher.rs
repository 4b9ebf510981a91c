//! Routes an incoming message to the dataset whose filter claims it
//! (§4.8). A dataset pool is split into *normal* datasets (exactly one
//! must match), *outbound* datasets (every match gets a copy, failures
//! there don't change the main outcome), a required *error* dataset, and
//! an optional *duplicates* dataset.

use chrono::Utc;
use log::{debug, info};

use crate::{
    dataset::writer::{AcquireMode, AcquireOutcome, Writer},
    types::{note::NoteEntry, Item, ItemSet, KindCode, Note},
    Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Ok,
    DuplicateError,
    Error,
    NotWritten,
}

pub struct Dispatcher {
    normal: Vec<Writer>,
    outbound: Vec<Writer>,
    error: Writer,
    duplicates: Option<Writer>,
}

fn annotate(set: &mut ItemSet, text: impl Into<String>) {
    let entry = NoteEntry { timestamp: Utc::now().timestamp(), text: text.into() };
    match set.remove(KindCode::Note) {
        Some(Item::Note(mut note)) => {
            note.entries.push(entry);
            set.set(Item::Note(note));
        }
        _ => set.set(Item::Note(Note { entries: vec![entry] })),
    }
}

impl Dispatcher {
    pub fn new(normal: Vec<Writer>, outbound: Vec<Writer>, error: Writer, duplicates: Option<Writer>) -> Dispatcher {
        Dispatcher { normal, outbound, error, duplicates }
    }

    /// Route one message. `set` is mutated in place with any routing
    /// annotations (validation failures, ambiguous-match notes) before
    /// being written to whichever dataset ends up taking it.
    pub fn dispatch(&mut self, payload: &[u8], set: &mut ItemSet, mode: AcquireMode) -> Result<DispatchOutcome> {
        if set.get(KindCode::Reftime).is_none() {
            annotate(set, "no reftime: cannot assign to a time-partitioned dataset");
            return self.send_to_error(payload, set);
        }

        for writer in self.outbound.iter_mut() {
            if writer.accepts(set)? {
                if let Err(e) = writer.acquire(payload, set, mode) {
                    debug!("outbound dataset {:?} failed to acquire: {}", writer.name(), e);
                }
            }
        }

        let matches: Vec<usize> =
            self.normal.iter().enumerate().filter_map(|(i, w)| w.accepts(set).ok().filter(|ok| *ok).map(|_| i)).collect();

        match matches.len() {
            0 => {
                annotate(set, "no dataset filter matched");
                self.send_to_error(payload, set)
            }
            1 => {
                let idx = matches[0];
                let name = self.normal[idx].name().to_string();
                debug!("routing to dataset {:?}", name);
                match self.normal[idx].acquire(payload, set, mode)? {
                    AcquireOutcome::Ok => {
                        info!("acquired into {:?}", name);
                        Ok(DispatchOutcome::Ok)
                    }
                    AcquireOutcome::Duplicate => match &mut self.duplicates {
                        Some(dup) => {
                            dup.acquire(payload, set, AcquireMode::ReplaceAlways)?;
                            Ok(DispatchOutcome::DuplicateError)
                        }
                        None => {
                            annotate(set, format!("duplicate in dataset {:?}", name));
                            self.error.acquire(payload, set, AcquireMode::ReplaceAlways)?;
                            Ok(DispatchOutcome::DuplicateError)
                        }
                    },
                    AcquireOutcome::NotWritten => {
                        annotate(set, format!("dataset {:?} refused the message after matching", name));
                        self.send_to_error(payload, set)
                    }
                }
            }
            _ => {
                let names: Vec<&str> = matches.iter().map(|&i| self.normal[i].name()).collect();
                annotate(set, format!("ambiguous: matched {} datasets: {:?}", names.len(), names));
                self.send_to_error(payload, set)
            }
        }
    }

    fn send_to_error(&mut self, payload: &[u8], set: &mut ItemSet) -> Result<DispatchOutcome> {
        match self.error.acquire(payload, set, AcquireMode::ReplaceAlways) {
            Ok(_) => Ok(DispatchOutcome::Error),
            Err(_) => Ok(DispatchOutcome::NotWritten),
        }
    }
}

/// Performs the same routing decisions as [`Dispatcher`] but never writes;
/// each decision is appended to `sink` as a human-readable line, for dry
/// runs.
pub struct TestDispatcher<'a> {
    normal: Vec<Writer>,
    sink: &'a mut Vec<String>,
}

impl<'a> TestDispatcher<'a> {
    pub fn new(normal: Vec<Writer>, sink: &'a mut Vec<String>) -> TestDispatcher<'a> {
        TestDispatcher { normal, sink }
    }

    pub fn dispatch(&mut self, set: &ItemSet) -> Result<()> {
        if set.get(KindCode::Reftime).is_none() {
            self.sink.push("error: no reftime".to_string());
            return Ok(());
        }
        let matches: Vec<&str> =
            self.normal.iter().filter_map(|w| w.accepts(set).ok().filter(|ok| *ok).map(|_| w.name())).collect();
        match matches.len() {
            0 => self.sink.push("error: no dataset matched".to_string()),
            1 => self.sink.push(format!("would route to {:?}", matches[0])),
            _ => self.sink.push(format!("error: ambiguous match {:?}", matches)),
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "dispatcher_test.rs"]
mod dispatcher_test;
