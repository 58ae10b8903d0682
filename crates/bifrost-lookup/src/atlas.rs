//! Postal-code lookups over `atlas.db`

use crate::error::{LookupError, Result};
use bifrost_common::GeoLocation;
use rusqlite::{Connection, OptionalExtension};
use std::path::Path;

const GEO_LOCATION_BY_POSTAL_CODE: &str = "SELECT country_code, postal_code, place_name,
    admin_name1, admin_code1, admin_name2,
    admin_code2, admin_name3, admin_code3,
    latitude, longitude, accuracy
    FROM geo_location WHERE postal_code = ?1";

/// Read-only handle on the geo location database
pub struct Atlas {
    conn: Connection,
}

impl Atlas {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            conn: crate::open_read_only(path.as_ref())?,
        })
    }

    pub fn from_connection(conn: Connection) -> Self {
        Self { conn }
    }

    /// First geo location registered for `postal_code`
    pub fn geo_location_by_postal_code(&self, postal_code: &str) -> Result<GeoLocation> {
        self.conn
            .query_row(GEO_LOCATION_BY_POSTAL_CODE, [postal_code], |row| {
                Ok(GeoLocation {
                    country_code: row.get(0)?,
                    postal_code: row.get(1)?,
                    place_name: row.get(2)?,
                    admin_name1: row.get(3)?,
                    admin_code1: row.get(4)?,
                    admin_name2: row.get(5)?,
                    admin_code2: row.get(6)?,
                    admin_name3: row.get(7)?,
                    admin_code3: row.get(8)?,
                    latitude: row.get(9)?,
                    longitude: row.get(10)?,
                    accuracy: row.get(11)?,
                })
            })
            .optional()
            .map_err(LookupError::database("query geo location"))?
            .ok_or_else(|| LookupError::GeoLocationNotFound(postal_code.to_string()))
    }
}
