//! metarc: an archiving and retrieval engine for meteorological message
//! streams (GRIB1, GRIB2, BUFR, ODIMH5, line-oriented CSV point data).
//!
//! A dataset is a directory tree of segments plus a secondary index and a
//! summary cache; a dispatcher routes incoming messages to the dataset
//! whose matcher accepts them. The pieces:
//!
//! - [`types`]: metadata item kinds and the `ItemSet` they assemble into.
//! - [`matcher`]: the boolean expression language used to route and query.
//! - [`summary`]: coarse per-dataset statistics, cached and composable.
//! - [`segment`]: the concrete storage of message bytes on disk.
//! - [`index`]: the secondary index over a dataset's segments.
//! - [`cache`]: the on-disk summary cache and its invalidation rules.
//! - [`dataset`]: the reader/writer/checker facade tying the above together.
//! - [`dispatcher`]: routes scanned messages across a set of datasets.
//! - [`processor`]: turns a reader plus a query into metadata/data output.
//! - [`scanner`]: the boundary trait format-specific scanners implement.

pub mod error;

pub mod cache;
pub mod dataset;
pub mod dispatcher;
pub mod index;
pub mod matcher;
pub mod processor;
pub mod scanner;
pub mod segment;
pub mod summary;
pub mod types;
pub mod util;

pub use error::{Error, Result};
