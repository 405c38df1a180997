//! # Ground projection and surface distances
//!
//! Spherical-Earth helpers used to decide whether the satellite was overhead a report:
//!
//! * [`GroundPosition::from_inertial`] – Sub-satellite point of an inertial position vector.
//! * [`distance_km`] / [`GroundPosition::distance_to`] – Haversine great-circle distance.
//! * [`is_visible`] / [`is_visible_within`] – Distance threshold (inclusive).
//!
//! ## Conventions
//! -----------------
//! The projection reads longitude and latitude straight off the inertial vector: Earth rotation
//! is not removed and the Earth is a sphere. The resulting "longitude" is therefore an inertial
//! right ascension, not a geodetic ground-track longitude. Output of the correlation table
//! depends on this convention.
use nalgebra::Vector3;

use crate::constants::{Degree, Kilometer, EARTH_RADIUS_KM, VISIBILITY_THRESHOLD_KM};

/// A point on the sphere, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroundPosition {
    pub lat: Degree,
    pub lon: Degree,
}

impl GroundPosition {
    pub fn new(lat: Degree, lon: Degree) -> Self {
        GroundPosition { lat, lon }
    }

    /// Project an inertial position vector onto the sphere.
    ///
    /// Arguments
    /// -----------------
    /// * `position`: inertial position, any length unit.
    ///
    /// Return
    /// ----------
    /// * `lon = atan2(y, x)` and `lat = atan2(z, sqrt(x² + y²))`, both in degrees.
    pub fn from_inertial(position: &Vector3<f64>) -> Self {
        let lon = position.y.atan2(position.x).to_degrees();
        let hyp = (position.x * position.x + position.y * position.y).sqrt();
        let lat = position.z.atan2(hyp).to_degrees();
        GroundPosition { lat, lon }
    }

    pub fn distance_to(&self, other: &GroundPosition) -> Kilometer {
        distance_km(self.lat, self.lon, other.lat, other.lon)
    }
}

/// Haversine great-circle distance between two points given in degrees, on a sphere of
/// radius [`EARTH_RADIUS_KM`].
pub fn distance_km(lat1: Degree, lon1: Degree, lat2: Degree, lon2: Degree) -> Kilometer {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dphi = (lat2 - lat1).to_radians();
    let dlambda = (lon2 - lon1).to_radians();

    let a = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    // rounding can push `a` past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);

    EARTH_RADIUS_KM * 2.0 * a.sqrt().atan2((1.0 - a).sqrt())
}

/// `true` when `distance` is at most [`VISIBILITY_THRESHOLD_KM`].
pub fn is_visible(distance: Kilometer) -> bool {
    is_visible_within(distance, VISIBILITY_THRESHOLD_KM)
}

pub fn is_visible_within(distance: Kilometer, threshold: Kilometer) -> bool {
    distance <= threshold
}
