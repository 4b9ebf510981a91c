//! Turns a reader's query results into whichever output shape a caller
//! asked for (§4.9's "emit output in requested shape"): metadata only,
//! metadata+bytes, a rolled-up summary, or bytes piped through a
//! caller-supplied post-processing hook.

use log::info;

use crate::{dataset::reader::Reader, index::DataQuery, summary::Summary, types::ItemSet, Result};

/// The shape a [`Processor`] run should produce.
pub enum OutputMode<'a> {
    /// Metadata records only, no segment reads.
    Metadata,
    /// Metadata plus the raw payload bytes.
    Data,
    /// A single rolled-up [`Summary`] over every matching message.
    Summary,
    /// Payload bytes passed through `hook` one message at a time; the
    /// actual subprocess/pipe machinery is a host concern (spec's
    /// postprocessor Non-goal) — this only drives the callback.
    Postproc(&'a mut dyn FnMut(&ItemSet, &[u8]) -> Result<()>),
}

/// Per-run counters, mirroring the historical "N OK, M duplicates, K
/// not-imported, T seconds" human-readable summary (§7's user-visible
/// surface); here it's just the `N` for a read-only processor run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProcessorStats {
    pub records: u64,
}

pub enum ProcessorOutput {
    Metadata(Vec<ItemSet>),
    Data(Vec<(ItemSet, Vec<u8>)>),
    Summary(Summary),
    Postproc(ProcessorStats),
}

pub struct Processor;

impl Processor {
    /// Run `query` against `reader` and produce `mode`'s output shape.
    pub fn run(reader: &mut Reader, query: &DataQuery, mode: OutputMode) -> Result<ProcessorOutput> {
        match mode {
            OutputMode::Metadata => {
                let rows = reader.query_metadata(query)?;
                info!("processor: {} metadata records", rows.len());
                Ok(ProcessorOutput::Metadata(rows))
            }
            OutputMode::Data => {
                let rows = reader.query(query)?;
                info!("processor: {} data records", rows.len());
                Ok(ProcessorOutput::Data(rows))
            }
            OutputMode::Summary => {
                let summary = reader.query_summary(query.matcher.as_ref())?;
                info!("processor: summary over {} rows", summary.rows().len());
                Ok(ProcessorOutput::Summary(summary))
            }
            OutputMode::Postproc(hook) => {
                let rows = reader.query(query)?;
                let mut stats = ProcessorStats::default();
                for (metadata, bytes) in &rows {
                    hook(metadata, bytes)?;
                    stats.records += 1;
                }
                info!("processor: piped {} records through postproc hook", stats.records);
                Ok(ProcessorOutput::Postproc(stats))
            }
        }
    }
}

#[cfg(test)]
#[path = "processor_test.rs"]
mod processor_test;
