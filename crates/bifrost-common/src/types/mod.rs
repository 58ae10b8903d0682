//! Record types stored in the lookup databases

use serde::{Deserialize, Serialize};

/// A postal code and its geographical details, as published by GeoNames
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GeoLocation {
    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,

    /// Postal code or zip code
    pub postal_code: String,

    /// Name of the place
    pub place_name: String,

    /// First-order administrative division (state, province, region)
    #[serde(rename = "admin_name_1")]
    pub admin_name1: String,

    /// Code for the first-order administrative division
    #[serde(rename = "admin_code_1")]
    pub admin_code1: String,

    /// Second-order administrative division (county, district)
    #[serde(rename = "admin_name_2")]
    pub admin_name2: String,

    /// Code for the second-order administrative division
    #[serde(rename = "admin_code_2")]
    pub admin_code2: String,

    /// Third-order administrative division (township, municipality)
    #[serde(rename = "admin_name_3")]
    pub admin_name3: String,

    /// Code for the third-order administrative division
    #[serde(rename = "admin_code_3")]
    pub admin_code3: String,

    pub latitude: f64,

    pub longitude: f64,

    /// GeoNames accuracy of the coordinates, 0 when the source leaves it blank
    pub accuracy: i64,
}

/// A bank branch in the Indian banking system, keyed by IFSC
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Bank {
    pub name: String,

    /// Four-letter bank code
    pub code: String,

    /// Indian Financial System Code of the branch
    pub ifsc: String,

    pub branch: String,

    pub center: String,

    pub district: String,

    pub state: String,

    pub address: String,

    pub contact: String,

    /// Branch supports IMPS transfers
    pub imps: bool,

    /// Branch supports RTGS transfers
    pub rtgs: bool,

    pub city: String,

    /// ISO 3166-2 subdivision code of the branch state
    pub iso3166: String,

    /// Branch supports NEFT transfers
    pub neft: bool,

    pub micr: String,

    /// Branch supports UPI
    pub upi: bool,

    pub swift: String,
}
