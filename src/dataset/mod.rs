//! A dataset: a named, configured store of messages (§4.7-§4.10). Ties
//! together a [`config::Config`], a [`writer::Writer`] for acquiring new
//! messages, a [`reader::Reader`] for querying existing ones, and a
//! [`checker::Checker`] for offline maintenance.

pub mod checker;
pub mod config;
pub mod reader;
pub mod state;
pub mod writer;

pub use checker::{Checker, Issue};
pub use config::{Config, IndexFlavour};
pub use reader::Reader;
pub use state::{classify_age, AgeClass, State};
pub use writer::{AcquireMode, AcquireOutcome, Writer};
