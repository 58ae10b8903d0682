//! Bifrost Lookup Library
#![deny(clippy::unwrap_used, clippy::expect_used)]
//!
//! Read-only point lookups over the databases built by `bifrost-ingest`.
//!
//! - **atlas**: geo location by postal code
//! - **finly**: bank branch by IFSC, and the ingested release tag
//!
//! # Example
//!
//! ```no_run
//! use bifrost_lookup::Finly;
//!
//! fn main() -> Result<(), bifrost_lookup::LookupError> {
//!     let finly = Finly::open("finly/data/finly.db")?;
//!     let bank = finly.bank_by_ifsc("ABHY0065001")?;
//!     println!("{} ({})", bank.name, bank.code);
//!     Ok(())
//! }
//! ```

pub mod atlas;
pub mod error;
pub mod finly;

pub use atlas::Atlas;
pub use error::{LookupError, Result};
pub use finly::Finly;

use rusqlite::{Connection, OpenFlags};
use std::path::Path;

/// Open an existing database without write access
pub(crate) fn open_read_only(path: &Path) -> Result<Connection> {
    let conn = Connection::open_with_flags(
        path,
        OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
    )
    .map_err(LookupError::database("open database"))?;

    tracing::debug!(path = %path.display(), "Opened lookup database");
    Ok(conn)
}
