//! Error kinds used across the crate.
//!
//! Construction goes through the [err_at] macro so that every error carries
//! the `file!():line!()` of the call site that raised it, the way the rest
//! of this codebase threads errors.

use std::{fmt, io, result};

/// Crate-wide result alias.
pub type Result<T> = result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// Malformed matcher, config, or metadata bundle.
    ParseError(String, String),
    /// Scanner could not interpret a payload; caller may continue.
    FormatError(String, String),
    /// Filesystem/syscall failure, with pathname context folded into the message.
    IOError(String, String),
    /// Uniqueness violation.
    DuplicateError(String, String),
    /// An invariant checked at runtime failed.
    ConsistencyError(String, String),
    /// Operation not supported for this dataset flavour.
    NotImplementedError(String, String),
    /// Caller passed something the API cannot accept.
    InvalidInput(String, String),
    /// A path did not resolve to the expected file.
    InvalidFile(String, String),
    /// A numeric conversion failed.
    FailConvert(String, String),
    /// sqlite reported an error.
    SqlError(String, String),
    /// Anything that should never happen.
    Fatal(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> result::Result<(), fmt::Error> {
        let (kind, prefix, msg) = match self {
            Error::ParseError(p, m) => ("ParseError", p, m),
            Error::FormatError(p, m) => ("FormatError", p, m),
            Error::IOError(p, m) => ("IOError", p, m),
            Error::DuplicateError(p, m) => ("DuplicateError", p, m),
            Error::ConsistencyError(p, m) => ("ConsistencyError", p, m),
            Error::NotImplementedError(p, m) => ("NotImplementedError", p, m),
            Error::InvalidInput(p, m) => ("InvalidInput", p, m),
            Error::InvalidFile(p, m) => ("InvalidFile", p, m),
            Error::FailConvert(p, m) => ("FailConvert", p, m),
            Error::SqlError(p, m) => ("SqlError", p, m),
            Error::Fatal(p, m) => ("Fatal", p, m),
        };
        write!(f, "{} {} {}", kind, prefix, msg)
    }
}

impl std::error::Error for Error {}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Error {
        Error::IOError("<io>".to_string(), err.to_string())
    }
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Error {
        Error::SqlError("<sqlite>".to_string(), err.to_string())
    }
}

impl From<std::num::TryFromIntError> for Error {
    fn from(err: std::num::TryFromIntError) -> Error {
        Error::FailConvert("<int>".to_string(), err.to_string())
    }
}

/// Build an [Error] value, stamped with the call site, and optionally
/// `return`s it wrapped in `Err(..)` when used in tail position with `?`.
///
/// ```ignore
/// err_at!(IOError, msg: "could not open {:?}", path)?
/// err_at!(IOError, fs::File::open(path))?
/// ```
#[macro_export]
macro_rules! err_at {
    ($variant:ident, msg: $($arg:expr),+) => {{
        let prefix = format!("{}:{}", file!(), line!());
        Err($crate::Error::$variant(prefix, format!($($arg),+)))
    }};
    ($variant:ident, $expr:expr) => {{
        match $expr {
            Ok(val) => Ok(val),
            Err(err) => {
                let prefix = format!("{}:{}", file!(), line!());
                Err($crate::Error::$variant(prefix, format!("{}", err)))
            }
        }
    }};
}
