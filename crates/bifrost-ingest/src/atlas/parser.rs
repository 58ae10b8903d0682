//! GeoNames postal-code record normalization
//!
//! `allCountries.txt` is tab separated with exactly twelve columns:
//!
//! ```text
//! country_code postal_code place_name admin_name1 admin_code1 admin_name2
//! admin_code2 admin_name3 admin_code3 latitude longitude accuracy
//! ```
//!
//! Text columns are taken verbatim. Coordinates must be finite floats;
//! accuracy is an integer and a blank value means 0.

use crate::common::RawRecord;
use crate::error::{IngestError, Result};
use bifrost_common::GeoLocation;

/// Number of columns in a GeoNames postal-code record
pub const FIELD_COUNT: usize = 12;

/// Convert one raw record into a [`GeoLocation`]
pub fn normalize(record: &RawRecord) -> Result<GeoLocation> {
    if record.fields.len() != FIELD_COUNT {
        return Err(IngestError::Parse {
            line: record.line,
            column: "record",
            message: format!(
                "expected {} fields, found {}",
                FIELD_COUNT,
                record.fields.len()
            ),
        });
    }

    let f = &record.fields;
    Ok(GeoLocation {
        country_code: f[0].clone(),
        postal_code: f[1].clone(),
        place_name: f[2].clone(),
        admin_name1: f[3].clone(),
        admin_code1: f[4].clone(),
        admin_name2: f[5].clone(),
        admin_code2: f[6].clone(),
        admin_name3: f[7].clone(),
        admin_code3: f[8].clone(),
        latitude: parse_coordinate(record.line, "latitude", &f[9])?,
        longitude: parse_coordinate(record.line, "longitude", &f[10])?,
        accuracy: parse_accuracy(record.line, &f[11])?,
    })
}

fn parse_coordinate(line: u64, column: &'static str, value: &str) -> Result<f64> {
    let parsed: f64 = value.parse().map_err(|e| IngestError::Parse {
        line,
        column,
        message: format!("'{}': {}", value, e),
    })?;

    if !parsed.is_finite() {
        return Err(IngestError::Parse {
            line,
            column,
            message: format!("'{}' is not a finite number", value),
        });
    }

    Ok(parsed)
}

fn parse_accuracy(line: u64, value: &str) -> Result<i64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0);
    }

    value.parse().map_err(|e| IngestError::Parse {
        line,
        column: "accuracy",
        message: format!("'{}': {}", value, e),
    })
}
