//! Transactional table rebuilds against a local SQLite database
//!
//! A [`Materializer`] owns one write connection. Each call to
//! [`Materializer::replace`] runs a single transaction: the dataset's schema
//! is dropped and recreated, every record is inserted through one prepared
//! statement, and the transaction commits only once the record stream is
//! exhausted without error. Any failure or cancellation drops the
//! transaction, which rolls it back, so readers only ever see the previous
//! or the complete new state.

use crate::error::{IngestError, Result, Stage};
use rusqlite::{Connection, Statement, Transaction};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Emit a progress record every this many inserted rows
const PROGRESS_INTERVAL: u64 = 100_000;

/// A table (or group of tables) that can be rebuilt from a record stream
pub trait Dataset {
    /// Typed record inserted as one row
    type Record;

    /// Table name, used for logging
    const TABLE: &'static str;

    /// Statements run in order at the start of the transaction
    const SCHEMA: &'static [&'static str];

    /// Parameterized INSERT executed once per record
    const INSERT: &'static str;

    /// Bind `record` to the prepared INSERT and execute it
    fn insert(statement: &mut Statement<'_>, record: &Self::Record) -> rusqlite::Result<usize>;
}

/// Write session against one database file
pub struct Materializer {
    conn: Connection,
}

impl Materializer {
    /// Open (or create) the database at `path`, creating parent directories
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(IngestError::filesystem(
                Stage::Materialize,
                format!("create directory {}", parent.display()),
            ))?;
        }

        let conn = Connection::open(path).map_err(IngestError::database("open database"))?;
        debug!(path = %path.display(), "Opened database");
        Ok(Self { conn })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Rebuild `D`'s tables from `records` in one transaction
    ///
    /// `finish` runs after the last row and before commit, inside the same
    /// transaction. Returns the number of rows inserted.
    pub fn replace<D, I, F>(
        &mut self,
        records: I,
        cancel: &CancellationToken,
        finish: F,
    ) -> Result<u64>
    where
        D: Dataset,
        I: IntoIterator<Item = Result<D::Record>>,
        F: FnOnce(&Transaction<'_>) -> Result<()>,
    {
        let tx = self
            .conn
            .transaction()
            .map_err(IngestError::database("begin transaction"))?;

        for statement in D::SCHEMA {
            tx.execute_batch(statement)
                .map_err(IngestError::database("rebuild schema"))?;
        }
        debug!(table = D::TABLE, "Rebuilt schema");

        let mut rows = 0u64;
        {
            let mut insert = tx
                .prepare(D::INSERT)
                .map_err(IngestError::database("prepare insert"))?;

            for record in records {
                if cancel.is_cancelled() {
                    return Err(IngestError::Canceled {
                        stage: Stage::Materialize,
                    });
                }

                let record = record?;
                D::insert(&mut insert, &record).map_err(IngestError::database("insert row"))?;
                rows += 1;

                if rows % PROGRESS_INTERVAL == 0 {
                    debug!(table = D::TABLE, rows, "Inserted rows");
                }
            }
        }

        finish(&tx)?;

        if cancel.is_cancelled() {
            return Err(IngestError::Canceled {
                stage: Stage::Materialize,
            });
        }

        tx.commit().map_err(|source| IngestError::Database {
            stage: Stage::Commit,
            operation: "commit transaction",
            source,
        })?;

        info!(table = D::TABLE, rows, "Committed table rebuild");
        Ok(rows)
    }
}
