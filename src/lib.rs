//! # Overhead
//!
//! Correlate a catalog of sighting reports with the ground position of an orbiting satellite
//! at each report's timestamp, flagging reports made while the satellite was within a fixed
//! great-circle distance of the observer.
//!
//! ## Pipeline
//!
//! 1. [`ElementSetArchive::from_tle_file`] loads a historical two-line element archive once.
//! 2. For each report, [`SightingCorrelator::correlate`] selects the latest element set not
//!    after the report, propagates it ([`Sgp4Propagator`]), projects the position on the
//!    sphere and thresholds the distance to the report.
//! 3. [`correlate_csv`] streams a whole table through the correlator, appending
//!    `iss_lat`, `iss_lon` and `iss_visible_in_sky` to every row.
//!
//! ```rust,no_run
//! use camino::Utf8Path;
//! use overhead::{correlate_csv, ElementSetArchive, OverheadConfig, SightingCorrelator, Sgp4Propagator};
//!
//! let archive = ElementSetArchive::from_tle_file(Utf8Path::new("zarya.txt")).unwrap();
//! let correlator = SightingCorrelator::new(&archive, Sgp4Propagator);
//!
//! let input = std::fs::File::open("scrubbed.csv").unwrap();
//! let output = std::fs::File::create("scrubbed_with_iss.csv").unwrap();
//! let summary = correlate_csv(&correlator, &OverheadConfig::default(), input, output).unwrap();
//! assert_eq!(summary.rows, summary.full + summary.partial + summary.no_data());
//! ```
pub mod config;
pub mod constants;
pub mod correlator;
pub mod element_sets;
pub mod geodesy;
pub mod overhead_errors;
pub mod propagation;
pub mod time;

pub use config::OverheadConfig;
pub use correlator::csv_stream::{correlate_csv, ColumnLayout, CorrelationSummary};
#[cfg(feature = "parallel")]
pub use correlator::csv_stream::correlate_csv_parallel;
pub use correlator::{Correlation, DerivedFields, NoDataReason, SightingCorrelator};
pub use element_sets::{ElementSetArchive, ElementSetEntry};
pub use geodesy::GroundPosition;
pub use overhead_errors::OverheadError;
pub use propagation::{OrbitPropagator, PropagationError, Sgp4Propagator};
