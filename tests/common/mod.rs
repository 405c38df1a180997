#![allow(dead_code)]

use camino::Utf8Path;
use overhead::{
    correlate_csv, CorrelationSummary, ElementSetArchive, OverheadConfig, SightingCorrelator,
    Sgp4Propagator,
};

pub const ARCHIVE_PATH: &str = "tests/data/iss_archive.txt";
pub const SIGHTINGS_PATH: &str = "tests/data/sightings.csv";

/// Lines of the element set whose epoch is 2020-07-18 12:00 UTC.
pub const E3_LINE1: &str = "1 25544U 98067A   20200.50000000 -.00002218  00000-0 -31515-4 0  9993";
pub const E3_LINE2: &str = "2 25544  51.6461 221.2784 0001413  89.1723 280.4612 15.49507896236008";

pub fn load_archive() -> ElementSetArchive {
    ElementSetArchive::from_tle_file(Utf8Path::new(ARCHIVE_PATH)).unwrap()
}

/// Run the SGP4-backed correlation on `input` with the default configuration.
pub fn run_correlation(archive: &ElementSetArchive, input: &[u8]) -> (Vec<u8>, CorrelationSummary) {
    let correlator = SightingCorrelator::new(archive, Sgp4Propagator);
    let mut output = Vec::new();
    let summary = correlate_csv(&correlator, &OverheadConfig::default(), input, &mut output).unwrap();
    (output, summary)
}

/// Parse an output table into its header and data rows.
pub fn read_table(output: &[u8]) -> (csv::StringRecord, Vec<csv::StringRecord>) {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(output);
    let header = reader.headers().unwrap().clone();
    let rows = reader.records().collect::<Result<Vec<_>, _>>().unwrap();
    (header, rows)
}

/// The three trailing derived fields of an output row.
pub fn derived(row: &csv::StringRecord) -> (String, String, String) {
    let n = row.len();
    (
        row[n - 3].to_string(),
        row[n - 2].to_string(),
        row[n - 1].to_string(),
    )
}
