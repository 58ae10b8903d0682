//! `bank` and `version` table layout

use crate::common::Dataset;
use crate::error::{IngestError, Result};
use bifrost_common::Bank;
use rusqlite::{params, Connection, Statement};

/// The `bank` table of `finly.db`, rebuilt together with `version`
pub struct Banks;

impl Dataset for Banks {
    type Record = Bank;

    const TABLE: &'static str = "bank";

    const SCHEMA: &'static [&'static str] = &[
        "DROP TABLE IF EXISTS bank",
        "DROP TABLE IF EXISTS version",
        "CREATE TABLE IF NOT EXISTS bank (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            code TEXT,
            ifsc TEXT UNIQUE,
            branch TEXT,
            center TEXT,
            district TEXT,
            state TEXT,
            address TEXT,
            contact TEXT,
            imps BOOLEAN,
            rtgs BOOLEAN,
            city TEXT,
            iso3166 TEXT,
            neft BOOLEAN,
            micr TEXT,
            upi BOOLEAN,
            swift TEXT,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        "CREATE TABLE IF NOT EXISTS version (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT,
            version TEXT UNIQUE,
            created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
            updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
        )",
    ];

    const INSERT: &'static str = "INSERT INTO bank (
            name,
            ifsc,
            branch,
            center,
            district,
            state,
            address,
            contact,
            imps,
            rtgs,
            city,
            iso3166,
            neft,
            micr,
            upi,
            swift,
            code
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)";

    fn insert(statement: &mut Statement<'_>, bank: &Bank) -> rusqlite::Result<usize> {
        statement.execute(params![
            bank.name,
            bank.ifsc,
            bank.branch,
            bank.center,
            bank.district,
            bank.state,
            bank.address,
            bank.contact,
            bank.imps,
            bank.rtgs,
            bank.city,
            bank.iso3166,
            bank.neft,
            bank.micr,
            bank.upi,
            bank.swift,
            bank.code,
        ])
    }
}

/// Record the ingested release inside the load transaction
pub fn insert_version(conn: &Connection, asset_name: &str, tag: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO version (name, version) VALUES (?1, ?2)",
        params![asset_name, tag],
    )
    .map_err(IngestError::database("insert version"))?;
    Ok(())
}
