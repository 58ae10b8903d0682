//! Lookup error types

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LookupError>;

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Geo location not found for postal code '{0}'")]
    GeoLocationNotFound(String),

    #[error("Bank not found for IFSC '{0}'")]
    BankNotFound(String),

    #[error("Database error ({operation}): {source}")]
    Database {
        operation: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}

impl LookupError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, LookupError::GeoLocationNotFound(_) | LookupError::BankNotFound(_))
    }

    pub(crate) fn database(operation: &'static str) -> impl FnOnce(rusqlite::Error) -> Self {
        move |source| LookupError::Database { operation, source }
    }
}
