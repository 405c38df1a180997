//! # Constants and type definitions for Overhead
//!
//! This module centralizes the **physical constants**, **calibration values**, and
//! **common type aliases** used by the correlation pipeline.
//!
//! ## Overview
//!
//! - Spherical Earth radius used by the great-circle distance
//! - Default visibility threshold
//! - Two-line element epoch calibration (two-digit year pivot)
//! - Names of the three derived output columns

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Mean Earth radius in kilometers (spherical model used by the haversine formula)
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Default great-circle distance under which the satellite counts as overhead, in kilometers
pub const VISIBILITY_THRESHOLD_KM: f64 = 2000.0;

/// Number of minutes in a day
pub const MINUTES_PER_DAY: f64 = 1440.0;

/// Two-digit element-set years at or above this value belong to the 1900s, the others to the 2000s
pub const TLE_YEAR_PIVOT: i32 = 57;

// -------------------------------------------------------------------------------------------------
// Output layout
// -------------------------------------------------------------------------------------------------

/// Derived sub-satellite latitude column
pub const ISS_LAT_COLUMN: &str = "iss_lat";

/// Derived sub-satellite longitude column
pub const ISS_LON_COLUMN: &str = "iss_lon";

/// Derived visibility flag column
pub const ISS_VISIBLE_COLUMN: &str = "iss_visible_in_sky";

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Angle in degrees
pub type Degree = f64;
/// Distance in kilometers
pub type Kilometer = f64;
/// Julian day number (days)
pub type JulianDay = f64;
