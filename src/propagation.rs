//! # Orbit propagation
//!
//! Position of the satellite at an arbitrary instant, computed from a two-line element set.
//!
//! The numerical model is behind the [`OrbitPropagator`] trait so that the correlator only
//! sees a position vector or a failure. [`Sgp4Propagator`] is the production implementation,
//! delegating to the [`sgp4`] crate (WGS72 gravity constants, improved mode).
//! Element lines are re-laid to 69 columns with a recomputed checksum before parsing, so a
//! stale or stripped checksum digit never makes an otherwise readable element set fail.
//!
//! ## Units & Conventions
//! -----------------
//! * **Time:** target instant as a split UTC [`JulianDate`]; minutes since the element-set
//!   epoch are measured on the same split representation.
//! * **Position:** TEME inertial frame, **kilometers**.
//!
//! ## Error Handling
//! -----------------
//! Every failure (unreadable elements, decayed orbit, diverging model) is a
//! [`PropagationError`] value. The caller turns it into a no-data record; nothing here panics.
use nalgebra::Vector3;
use thiserror::Error;

use crate::time::{tle_epoch_to_utc, JulianDate};

/// Propagation failures.
///
/// Variants
/// -----------------
/// * `InvalidElements` – The two lines cannot be read as an element set by the model.
/// * `ModelFailure` – The model rejected the elements or diverged at the requested time
///   (e.g. decayed orbit, eccentricity out of range).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropagationError {
    #[error("Invalid element set: {0}")]
    InvalidElements(String),
    #[error("Propagation failed: {0}")]
    ModelFailure(String),
}

/// A numerical model turning an element set and an instant into an inertial position.
pub trait OrbitPropagator {
    /// Inertial position (km) of the satellite described by `line1`/`line2` at `at`.
    fn propagate(
        &self,
        line1: &str,
        line2: &str,
        at: &JulianDate,
    ) -> Result<Vector3<f64>, PropagationError>;
}

/// SGP4/SDP4 propagator backed by the `sgp4` crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sgp4Propagator;

/// Width of a two-line element line without its checksum column.
const TLE_LINE_BODY: usize = 68;

/// Pad or cut `line` to 68 columns and append a freshly computed modulo-10 checksum.
fn normalize_tle_line(line: &str) -> Vec<u8> {
    let mut bytes: Vec<u8> = line.trim_end().bytes().take(TLE_LINE_BODY).collect();
    bytes.resize(TLE_LINE_BODY, b' ');

    let checksum = bytes.iter().fold(0u8, |sum, byte| match byte {
        b'0'..=b'9' => (sum + (byte - b'0')) % 10,
        b'-' => (sum + 1) % 10,
        _ => sum,
    });
    bytes.push(b'0' + checksum);
    bytes
}

impl OrbitPropagator for Sgp4Propagator {
    fn propagate(
        &self,
        line1: &str,
        line2: &str,
        at: &JulianDate,
    ) -> Result<Vector3<f64>, PropagationError> {
        let elements = sgp4::Elements::from_tle(
            None,
            &normalize_tle_line(line1),
            &normalize_tle_line(line2),
        )
        .map_err(|e| PropagationError::InvalidElements(e.to_string()))?;

        // WGS72 gravity model with IAU sidereal time (improved mode)
        let orbit = sgp4::Orbit::from_kozai_elements(
            &sgp4::WGS72,
            elements.inclination.to_radians(),
            elements.right_ascension.to_radians(),
            elements.eccentricity,
            elements.argument_of_perigee.to_radians(),
            elements.mean_anomaly.to_radians(),
            elements.mean_motion * std::f64::consts::PI / 720.0,
        )
        .map_err(|e| PropagationError::ModelFailure(e.to_string()))?;

        let constants = sgp4::Constants::new(
            sgp4::WGS72,
            sgp4::iau_epoch_to_sidereal_time,
            elements.epoch(),
            elements.drag_term,
            orbit,
        )
        .map_err(|e| PropagationError::ModelFailure(e.to_string()))?;

        let epoch_field = line1
            .get(18..32)
            .ok_or_else(|| PropagationError::InvalidElements("missing epoch field".to_string()))?;
        let epoch = tle_epoch_to_utc(epoch_field).map_err(PropagationError::InvalidElements)?;
        let minutes_since_epoch = at.minutes_since(&JulianDate::from_epoch(&epoch));

        let prediction = constants
            .propagate(sgp4::MinutesSinceEpoch(minutes_since_epoch))
            .map_err(|e| PropagationError::ModelFailure(e.to_string()))?;

        let position = Vector3::from(prediction.position);
        if position.iter().all(|c| c.is_finite()) {
            Ok(position)
        } else {
            Err(PropagationError::ModelFailure(
                "non finite position".to_string(),
            ))
        }
    }
}
