//! `geo_location` table layout

use crate::common::Dataset;
use bifrost_common::GeoLocation;
use rusqlite::{params, Statement};

/// The `geo_location` table of `atlas.db`
pub struct GeoLocations;

impl Dataset for GeoLocations {
    type Record = GeoLocation;

    const TABLE: &'static str = "geo_location";

    const SCHEMA: &'static [&'static str] = &[
        "DROP TABLE IF EXISTS geo_location",
        "CREATE TABLE IF NOT EXISTS geo_location (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            country_code TEXT,
            postal_code TEXT,
            place_name TEXT,
            admin_name1 TEXT,
            admin_code1 TEXT,
            admin_name2 TEXT,
            admin_code2 TEXT,
            admin_name3 TEXT,
            admin_code3 TEXT,
            latitude REAL,
            longitude REAL,
            accuracy INTEGER,
            created_at DATETIME DEFAULT CURRENT_TIMESTAMP,
            updated_at DATETIME DEFAULT CURRENT_TIMESTAMP
        )",
        "CREATE INDEX IF NOT EXISTS idx_geo_location_postal_code ON geo_location(postal_code)",
    ];

    const INSERT: &'static str = "INSERT INTO geo_location (
            country_code,
            postal_code,
            place_name,
            admin_name1,
            admin_code1,
            admin_name2,
            admin_code2,
            admin_name3,
            admin_code3,
            latitude,
            longitude,
            accuracy
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)";

    fn insert(statement: &mut Statement<'_>, geo: &GeoLocation) -> rusqlite::Result<usize> {
        statement.execute(params![
            geo.country_code,
            geo.postal_code,
            geo.place_name,
            geo.admin_name1,
            geo.admin_code1,
            geo.admin_name2,
            geo.admin_code2,
            geo.admin_name3,
            geo.admin_code3,
            geo.latitude,
            geo.longitude,
            geo.accuracy,
        ])
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::common::Materializer;
    use rusqlite::Connection;
    use tokio_util::sync::CancellationToken;

    fn koramangala() -> GeoLocation {
        GeoLocation {
            country_code: "IN".to_string(),
            postal_code: "560095".to_string(),
            place_name: "Koramangala VI Bk".to_string(),
            admin_name1: "Karnataka".to_string(),
            admin_code1: "19".to_string(),
            admin_name2: "Bengaluru".to_string(),
            admin_code2: "583".to_string(),
            admin_name3: "Bangalore South".to_string(),
            admin_code3: String::new(),
            latitude: 13.1077,
            longitude: 77.581,
            accuracy: 1,
        }
    }

    #[test]
    fn test_geo_location_columns() {
        let mut materializer = Materializer::from_connection(Connection::open_in_memory().unwrap());
        let rows = materializer
            .replace::<GeoLocations, _, _>(vec![Ok(koramangala())], &CancellationToken::new(), |_| Ok(()))
            .unwrap();
        assert_eq!(rows, 1);

        let (place, lat, lon, accuracy, code3): (String, f64, f64, i64, String) = materializer
            .connection()
            .query_row(
                "SELECT place_name, latitude, longitude, accuracy, admin_code3
                 FROM geo_location WHERE postal_code = ?1",
                ["560095"],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?, row.get(4)?)),
            )
            .unwrap();

        assert_eq!(place, "Koramangala VI Bk");
        assert_eq!(lat, 13.1077);
        assert_eq!(lon, 77.581);
        assert_eq!(accuracy, 1);
        assert_eq!(code3, "");
    }

    #[test]
    fn test_postal_code_index_exists() {
        let mut materializer = Materializer::from_connection(Connection::open_in_memory().unwrap());
        materializer
            .replace::<GeoLocations, _, _>(Vec::new(), &CancellationToken::new(), |_| Ok(()))
            .unwrap();

        let indexes: i64 = materializer
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master
                 WHERE type = 'index' AND name = 'idx_geo_location_postal_code'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(indexes, 1);
    }
}
