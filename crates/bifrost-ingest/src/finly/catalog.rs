//! Bank-code catalog (`banks.json`) and the IFSC enrichment join

use std::collections::{BTreeMap, HashMap};

use bifrost_common::Bank;
use serde::Deserialize;
use tracing::debug;

use super::parser::BankRow;
use crate::error::{IngestError, Result};

/// One value of the `banks.json` object
///
/// Every field is optional; only `ifsc` and `code` take part in the join.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogEntry {
    pub code: Option<String>,
    pub ifsc: Option<String>,
    pub micr: Option<String>,
    pub iin: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub ach_credit: Option<bool>,
    pub ach_debit: Option<bool>,
    pub apbs: Option<bool>,
    pub nach_debit: Option<bool>,
}

/// `banks.json` as published: an object keyed by bank code
///
/// Ordered so that rebuilding the catalog is deterministic.
pub type CatalogDocument = BTreeMap<String, CatalogEntry>;

/// Mapping from IFSC to four-letter bank code
#[derive(Debug, Clone, Default)]
pub struct BankCodeCatalog {
    codes: HashMap<String, String>,
}

impl BankCodeCatalog {
    /// Build the join table; on duplicate IFSCs the later entry wins
    pub fn from_document(document: CatalogDocument) -> Self {
        let mut codes = HashMap::with_capacity(document.len());
        for (key, entry) in document {
            match (entry.ifsc, entry.code) {
                (Some(ifsc), Some(code)) => {
                    codes.insert(ifsc, code);
                },
                _ => debug!(key = %key, "Skipping catalog entry without ifsc or code"),
            }
        }

        Self { codes }
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn code_for(&self, ifsc: &str) -> Option<&str> {
        self.codes.get(ifsc).map(String::as_str)
    }

    /// Attach the bank code to a normalized row
    ///
    /// Falls back to the first four characters of the IFSC when the catalog
    /// has no entry for it.
    pub fn enrich(&self, row: BankRow) -> Result<Bank> {
        let BankRow { line, mut bank } = row;

        let Some(prefix) = bank_prefix(&bank.ifsc) else {
            return Err(IngestError::CorruptRecord {
                line,
                ifsc: bank.ifsc,
            });
        };

        bank.code = self.code_for(&bank.ifsc).unwrap_or(prefix).to_string();
        Ok(bank)
    }
}

/// Leftmost four characters of an IFSC, if it has that many
fn bank_prefix(ifsc: &str) -> Option<&str> {
    match ifsc.char_indices().nth(4) {
        Some((end, _)) => Some(&ifsc[..end]),
        None if ifsc.chars().count() == 4 => Some(ifsc),
        None => None,
    }
}
