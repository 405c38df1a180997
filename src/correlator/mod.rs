//! # Sighting correlator
//!
//! Per-record pipeline joining a sighting report with the satellite's ground position at the
//! report's timestamp.
//!
//! ## Pipeline
//! -----------------
//! 1. Parse the report timestamp ([`parse_sighting_datetime`]).
//! 2. Select the latest element set not after that instant ([`ElementSetArchive::select`]).
//! 3. Propagate it to the instant ([`OrbitPropagator`]).
//! 4. Project the position onto the sphere ([`GroundPosition::from_inertial`]).
//! 5. When both report coordinates are numeric, compare the great-circle distance to the
//!    visibility threshold.
//!
//! ## Outcomes
//! -----------------
//! Each record yields exactly one [`Correlation`]:
//! * [`Correlation::Full`] – Ground position and visibility flag.
//! * [`Correlation::Partial`] – Ground position only; report coordinates missing or non-numeric.
//! * [`Correlation::NoData`] – Steps 1 to 3 failed; the [`NoDataReason`] says which.
//!
//! A failing record never affects another one: the archive is only read, and every step
//! returns a value instead of raising.
//!
//! Modules
//! -----------------
//! * [`csv_stream`](crate::correlator::csv_stream) – Drives the correlator over a CSV table.
pub mod csv_stream;
mod progress_bar;

use std::fmt;

use hifitime::Epoch;
use tracing::debug;

use crate::{
    constants::{Degree, Kilometer, VISIBILITY_THRESHOLD_KM},
    element_sets::ElementSetArchive,
    geodesy::{is_visible_within, GroundPosition},
    propagation::OrbitPropagator,
    time::{parse_sighting_datetime, JulianDate},
};

/// Why a record has no derived data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NoDataReason {
    /// The timestamp is missing, malformed, or not a calendar instant.
    UnparsableTimestamp,
    /// The timestamp predates the earliest element set of the archive.
    BeforeArchive,
    /// The propagator rejected the element set or failed at that instant.
    PropagationFailed,
}

impl fmt::Display for NoDataReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoDataReason::UnparsableTimestamp => write!(f, "unparsable timestamp"),
            NoDataReason::BeforeArchive => write!(f, "timestamp before archive start"),
            NoDataReason::PropagationFailed => write!(f, "propagation failed"),
        }
    }
}

/// Result of correlating one sighting report.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Correlation {
    Full {
        ground: GroundPosition,
        visible: bool,
    },
    Partial {
        ground: GroundPosition,
    },
    NoData(NoDataReason),
}

/// The three derived output fields of a record, empty strings meaning unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub iss_lat: String,
    pub iss_lon: String,
    pub iss_visible_in_sky: String,
}

impl Correlation {
    pub fn ground(&self) -> Option<GroundPosition> {
        match self {
            Correlation::Full { ground, .. } | Correlation::Partial { ground } => Some(*ground),
            Correlation::NoData(_) => None,
        }
    }

    pub fn visible(&self) -> Option<bool> {
        match self {
            Correlation::Full { visible, .. } => Some(*visible),
            _ => None,
        }
    }

    /// Format the outcome as output fields.
    ///
    /// Latitude and longitude use six decimals, visibility is `True`/`False`, and unknown
    /// values are empty strings so they never read as a legitimate `0` or `False`.
    pub fn derived_fields(&self) -> DerivedFields {
        let (iss_lat, iss_lon) = match self.ground() {
            Some(ground) => (format!("{:.6}", ground.lat), format!("{:.6}", ground.lon)),
            None => (String::new(), String::new()),
        };
        let iss_visible_in_sky = match self.visible() {
            Some(true) => "True".to_string(),
            Some(false) => "False".to_string(),
            None => String::new(),
        };

        DerivedFields {
            iss_lat,
            iss_lon,
            iss_visible_in_sky,
        }
    }
}

/// Parse a report coordinate, `None` when blank or non-numeric.
///
/// `nan` and `inf` are numbers: the distance they give is never within the threshold.
fn parse_coordinate(text: Option<&str>) -> Option<Degree> {
    text.map(str::trim).and_then(|t| t.parse::<f64>().ok())
}

/// Correlates sighting reports against a shared, read-only element-set archive.
#[derive(Debug, Clone)]
pub struct SightingCorrelator<'a, P> {
    archive: &'a ElementSetArchive,
    propagator: P,
    visibility_threshold: Kilometer,
}

impl<'a, P: OrbitPropagator> SightingCorrelator<'a, P> {
    pub fn new(archive: &'a ElementSetArchive, propagator: P) -> Self {
        SightingCorrelator {
            archive,
            propagator,
            visibility_threshold: VISIBILITY_THRESHOLD_KM,
        }
    }

    pub fn with_visibility_threshold(mut self, threshold: Kilometer) -> Self {
        self.visibility_threshold = threshold;
        self
    }

    pub fn archive(&self) -> &ElementSetArchive {
        self.archive
    }

    /// Sub-satellite point at `at`, from the latest element set not after `at`.
    pub fn ground_position(&self, at: &Epoch) -> Result<GroundPosition, NoDataReason> {
        let entry = self.archive.select(at).ok_or(NoDataReason::BeforeArchive)?;

        let position = self
            .propagator
            .propagate(entry.line1(), entry.line2(), &JulianDate::from_epoch(at))
            .map_err(|err| {
                debug!(target_epoch = %at, element_epoch = %entry.epoch(), %err, "propagation failed");
                NoDataReason::PropagationFailed
            })?;

        Ok(GroundPosition::from_inertial(&position))
    }

    /// Correlate one report.
    ///
    /// Arguments
    /// -----------------
    /// * `datetime`: the report timestamp text, `None` when the record has no such field.
    /// * `latitude`, `longitude`: the report coordinates text, `None` when absent.
    pub fn correlate(
        &self,
        datetime: Option<&str>,
        latitude: Option<&str>,
        longitude: Option<&str>,
    ) -> Correlation {
        let at = match datetime.map(parse_sighting_datetime) {
            Some(Ok(at)) => at,
            _ => return Correlation::NoData(NoDataReason::UnparsableTimestamp),
        };

        let ground = match self.ground_position(&at) {
            Ok(ground) => ground,
            Err(reason) => return Correlation::NoData(reason),
        };

        match (parse_coordinate(latitude), parse_coordinate(longitude)) {
            (Some(lat), Some(lon)) => {
                let distance = GroundPosition::new(lat, lon).distance_to(&ground);
                Correlation::Full {
                    ground,
                    visible: is_visible_within(distance, self.visibility_threshold),
                }
            }
            _ => Correlation::Partial { ground },
        }
    }
}
