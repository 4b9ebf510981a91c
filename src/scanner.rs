//! The boundary to format-specific scanning (GRIB/BUFR/ODIMH5/VM2/text),
//! which is explicitly out of scope here (§1): the core only consumes
//! whatever a `Scanner` yields, never parses a wire format itself.

use crate::{types::ItemSet, Result};

/// One scanned message: its raw payload and the metadata extracted from
/// it, before a reftime check or dispatch has happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedMessage {
    pub payload: Vec<u8>,
    pub metadata: ItemSet,
}

/// Yields `(payload, metadata)` pairs from some external source (a GRIB
/// file, a BUFR stream, ...). Implementations live outside this crate;
/// this trait is only the seam.
pub trait Scanner {
    /// Pull the next message, or `Ok(None)` at end of stream. A scanner
    /// that cannot interpret one payload should record the failure as a
    /// `FormatError` and be able to continue to the next one rather than
    /// aborting the whole stream (§7's propagation policy).
    fn next_message(&mut self) -> Result<Option<ScannedMessage>>;
}

/// A `Scanner` over an in-memory list, useful for tests and for hosts that
/// have already separated payloads out-of-band.
pub struct SliceScanner {
    messages: std::vec::IntoIter<ScannedMessage>,
}

impl SliceScanner {
    pub fn new(messages: Vec<ScannedMessage>) -> SliceScanner {
        SliceScanner { messages: messages.into_iter() }
    }
}

impl Scanner for SliceScanner {
    fn next_message(&mut self) -> Result<Option<ScannedMessage>> {
        Ok(self.messages.next())
    }
}

#[cfg(test)]
#[path = "scanner_test.rs"]
mod scanner_test;
