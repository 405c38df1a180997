//! # Two-line element archive reader
//!
//! Parse a plain-text archive of **two-line element sets** into an
//! [`ElementSetArchive`].
//!
//! ## Overview
//! -----------------
//! The archive is a sequence of consecutive line pairs (no name line). Each pair becomes one
//! [`ElementSetEntry`] whose epoch is decoded from the fixed-width epoch field of line 1.
//!
//! ## Field Layout
//! -----------------
//! * `18..32` (line 1) – Epoch: two-digit year (`18..20`) and fractional day of year (`20..32`).
//!
//! Line 2 is kept verbatim; the orbital elements themselves are only read at propagation time.
//!
//! ## Error Handling
//! -----------------
//! The archive is foundational: a single malformed pair aborts the whole load. Failures are
//! reported as [`OverheadError::ElementSetParsing`] carrying the 1-based line number of the
//! offending pair and a [`ParseTleError`]. There is no per-entry recovery.
use camino::Utf8Path;
use itertools::Itertools;
use thiserror::Error;
use tracing::info;

use crate::{
    element_sets::{ElementSetArchive, ElementSetEntry},
    overhead_errors::OverheadError,
    time::tle_epoch_to_utc,
};

const EPOCH_FIELD: std::ops::Range<usize> = 18..32;

/// Pair-level parsing errors for two-line element archives.
///
/// Variants
/// -----------------
/// * `OddLineCount` – The archive ends with a line 1 that has no line 2; payload is the line count.
/// * `TooShortLine` – Line 1 does not reach the end of the epoch field (32 characters).
/// * `InvalidEpoch` – The epoch field (`line1[18..32]`) cannot be decoded; payload carries the slice.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseTleError {
    #[error("The archive has an odd number of lines ({0})")]
    OddLineCount(usize),
    #[error("The first line is too short to hold an epoch")]
    TooShortLine,
    #[error("Invalid epoch field: {0}")]
    InvalidEpoch(String),
}

/// Parse one line pair into an [`ElementSetEntry`].
fn from_tle_pair(line1: &str, line2: &str) -> Result<ElementSetEntry, ParseTleError> {
    let field = line1
        .get(EPOCH_FIELD)
        .ok_or(ParseTleError::TooShortLine)?;

    let epoch =
        tle_epoch_to_utc(field).map_err(|_| ParseTleError::InvalidEpoch(field.to_string()))?;

    Ok(ElementSetEntry::new(
        epoch,
        line1.to_string(),
        line2.to_string(),
    ))
}

impl ElementSetArchive {
    /// Parse an archive from its full text.
    ///
    /// The text is trimmed, split on `\n` and every line is trimmed, so CRLF files and
    /// trailing blank lines are accepted. Lines are then grouped by two.
    ///
    /// Return
    /// ----------
    /// * The sorted archive, [`OverheadError::EmptyArchive`] for a blank text, or
    ///   [`OverheadError::ElementSetParsing`] for the first malformed pair.
    pub fn from_tle_text(text: &str) -> Result<Self, OverheadError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(OverheadError::EmptyArchive);
        }

        let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
        if lines.len() % 2 != 0 {
            return Err(OverheadError::ElementSetParsing {
                line: lines.len(),
                source: ParseTleError::OddLineCount(lines.len()),
            });
        }

        let entries = lines
            .into_iter()
            .tuples()
            .enumerate()
            .map(|(pair_idx, (line1, line2))| {
                from_tle_pair(line1, line2).map_err(|source| OverheadError::ElementSetParsing {
                    line: 2 * pair_idx + 1,
                    source,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        ElementSetArchive::new(entries)
    }

    /// Read and parse an archive file.
    ///
    /// See also
    /// ------------
    /// * [`ElementSetArchive::from_tle_text`] – Parsing rules.
    pub fn from_tle_file(path: &Utf8Path) -> Result<Self, OverheadError> {
        let text = std::fs::read_to_string(path)?;
        let archive = ElementSetArchive::from_tle_text(&text)?;

        info!(
            path = %path,
            entries = archive.len(),
            first_epoch = %archive.first_epoch(),
            last_epoch = %archive.last_epoch(),
            "loaded element-set archive"
        );
        Ok(archive)
    }
}
