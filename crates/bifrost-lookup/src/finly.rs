//! Bank directory lookups over `finly.db`

use crate::error::{LookupError, Result};
use bifrost_common::Bank;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const BANK_BY_IFSC: &str = "SELECT name, code, ifsc, branch, center,
    district, state, address, contact,
    imps, rtgs, city, iso3166,
    neft, micr, upi, swift
    FROM bank WHERE ifsc = ?1";

const CURRENT_VERSION: &str = "SELECT version FROM version ORDER BY id DESC LIMIT 1";

/// Read-only handle on the bank directory database
pub struct Finly {
    conn: Connection,
}

impl Finly {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: crate::open_read_only(path.as_ref())?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn bank_by_ifsc(&self, ifsc: &str) -> Result<Bank> {
        self.conn
            .query_row(BANK_BY_IFSC, [ifsc], |row| {
                Ok(Bank {
                    name: row.get(0)?,
                    code: row.get(1)?,
                    ifsc: row.get(2)?,
                    branch: row.get(3)?,
                    center: row.get(4)?,
                    district: row.get(5)?,
                    state: row.get(6)?,
                    address: row.get(7)?,
                    contact: row.get(8)?,
                    imps: row.get(9)?,
                    rtgs: row.get(10)?,
                    city: row.get(11)?,
                    iso3166: row.get(12)?,
                    neft: row.get(13)?,
                    micr: row.get(14)?,
                    upi: row.get(15)?,
                    swift: row.get(16)?,
                })
            })
            .optional()
            .map_err(LookupError::database("query bank"))?
            .ok_or_else(|| LookupError::BankNotFound(ifsc.to_string()))
    }

    /// Release tag of the most recent ingestion, if any
    pub fn current_version(&self) -> Result<Option<String>> {
        self.conn
            .query_row(CURRENT_VERSION, [], |row| row.get(0))
            .optional()
            .map_err(LookupError::database("query version"))
    }
}
