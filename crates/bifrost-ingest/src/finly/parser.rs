//! Razorpay `IFSC.csv` record normalization
//!
//! Column order of the published CSV:
//!
//! ```text
//! BANK IFSC BRANCH CENTRE DISTRICT STATE ADDRESS CONTACT IMPS RTGS CITY
//! ISO3166 NEFT MICR UPI SWIFT
//! ```
//!
//! Later releases may omit trailing columns, which then read as empty.

use crate::common::RawRecord;
use crate::error::{IngestError, Result};
use bifrost_common::Bank;

/// Number of columns in the published CSV
pub const FIELD_COUNT: usize = 16;

const NAME: usize = 0;
const IFSC: usize = 1;
const BRANCH: usize = 2;
const CENTER: usize = 3;
const DISTRICT: usize = 4;
const STATE: usize = 5;
const ADDRESS: usize = 6;
const CONTACT: usize = 7;
const IMPS: usize = 8;
const RTGS: usize = 9;
const CITY: usize = 10;
const ISO3166: usize = 11;
const NEFT: usize = 12;
const MICR: usize = 13;
const UPI: usize = 14;
const SWIFT: usize = 15;

/// A normalized branch awaiting its bank code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BankRow {
    /// Source line, for error reporting
    pub line: u64,

    /// Every column but `code`, which enrichment fills in
    pub bank: Bank,
}

/// Convert one raw CSV record into a [`BankRow`]
pub fn normalize(record: &RawRecord) -> Result<BankRow> {
    let line = record.line;

    if record.fields.len() > FIELD_COUNT {
        return Err(IngestError::Parse {
            line,
            column: "record",
            message: format!(
                "expected at most {} fields, found {}",
                FIELD_COUNT,
                record.fields.len()
            ),
        });
    }

    let ifsc = record.field(IFSC);
    if ifsc.is_empty() {
        return Err(IngestError::Parse {
            line,
            column: "ifsc",
            message: "value is empty".to_string(),
        });
    }

    let text = |index: usize| record.field(index).to_string();

    Ok(BankRow {
        line,
        bank: Bank {
            name: text(NAME),
            code: String::new(),
            ifsc: ifsc.to_string(),
            branch: text(BRANCH),
            center: text(CENTER),
            district: text(DISTRICT),
            state: text(STATE),
            address: text(ADDRESS),
            contact: text(CONTACT),
            imps: parse_flag(line, "imps", record.field(IMPS))?,
            rtgs: parse_flag(line, "rtgs", record.field(RTGS))?,
            city: text(CITY),
            iso3166: text(ISO3166),
            neft: parse_flag(line, "neft", record.field(NEFT))?,
            micr: text(MICR),
            upi: parse_flag(line, "upi", record.field(UPI))?,
            swift: text(SWIFT),
        },
    })
}

/// Boolean column: `1`/`0` or `true`/`false` in any case, blank is false
fn parse_flag(line: u64, column: &'static str, value: &str) -> Result<bool> {
    let value = value.trim();
    if value.is_empty() || value == "0" || value.eq_ignore_ascii_case("false") {
        Ok(false)
    } else if value == "1" || value.eq_ignore_ascii_case("true") {
        Ok(true)
    } else {
        Err(IngestError::Parse {
            line,
            column,
            message: format!("'{}' is not a boolean", value),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn record(fields: &[&str]) -> RawRecord {
        RawRecord {
            line: 5,
            fields: fields.iter().map(|f| f.to_string()).collect(),
        }
    }

    const ABHYUDAYA: [&str; 16] = [
        "Abhyudaya Co-operative Bank",
        "ABHY0065001",
        "RTGS-HO",
        "MUMBAI",
        "MUMBAI",
        "MAHARASHTRA",
        "Abhyudaya Bank Bldg., Sion, Mumbai",
        "+912224070043",
        "1",
        "1",
        "MUMBAI",
        "IN-MH",
        "1",
        "400065001",
        "0",
        "",
    ];

    #[test]
    fn test_normalize_full_row() {
        let row = normalize(&record(&ABHYUDAYA)).unwrap();

        assert_eq!(row.line, 5);
        assert_eq!(row.bank.name, "Abhyudaya Co-operative Bank");
        assert_eq!(row.bank.ifsc, "ABHY0065001");
        assert_eq!(row.bank.center, "MUMBAI");
        assert_eq!(row.bank.iso3166, "IN-MH");
        assert_eq!(row.bank.micr, "400065001");
        assert!(row.bank.imps && row.bank.rtgs && row.bank.neft);
        assert!(!row.bank.upi);
        assert_eq!(row.bank.swift, "");
        assert_eq!(row.bank.code, "");
    }

    #[test]
    fn test_short_rows_are_padded() {
        let row = normalize(&record(&["HDFC Bank", "HDFC0000123", "Whitefield"])).unwrap();

        assert_eq!(row.bank.branch, "Whitefield");
        assert_eq!(row.bank.city, "");
        assert!(!row.bank.imps);
        assert!(!row.bank.upi);
    }

    #[test]
    fn test_textual_booleans() {
        let mut fields = ABHYUDAYA;
        fields[IMPS] = "true";
        fields[RTGS] = "FALSE";
        fields[UPI] = "True";
        let row = normalize(&record(&fields)).unwrap();

        assert!(row.bank.imps);
        assert!(!row.bank.rtgs);
        assert!(row.bank.upi);
    }

    #[test]
    fn test_invalid_boolean() {
        let mut fields = ABHYUDAYA;
        fields[NEFT] = "yes";
        let err = normalize(&record(&fields)).unwrap_err();

        assert!(matches!(err, IngestError::Parse { column: "neft", line: 5, .. }));
    }

    #[test]
    fn test_missing_ifsc() {
        let err = normalize(&record(&["Orphan Bank"])).unwrap_err();
        assert!(matches!(err, IngestError::Parse { column: "ifsc", .. }));
    }

    #[test]
    fn test_too_many_fields() {
        let mut fields = ABHYUDAYA.to_vec();
        fields.push("extra");
        let err = normalize(&record(&fields)).unwrap_err();

        assert!(matches!(err, IngestError::Parse { column: "record", .. }));
    }
}
