//! # Element sets: archive and epoch selection
//!
//! A historical archive of two-line element sets for a single satellite, loaded once and
//! shared read-only by every per-record computation.
//!
//! Modules
//! -----------------
//! * [`tle_archive_reader`](crate::element_sets::tle_archive_reader) – Parser for plain-text
//!   archives made of consecutive line pairs.
//!
//! Data Model
//! -----------------
//! * [`ElementSetEntry`] – Epoch (UTC) plus the two raw element lines, immutable once parsed.
//! * [`ElementSetArchive`] – Non-empty sequence of entries sorted ascending by epoch.
//!   Entries sharing the same epoch keep their file order.
//!
//! Selection
//! -----------------
//! [`ElementSetArchive::select`] returns the entry with the **latest epoch `<=` target**.
//! A future-dated entry is never returned, whatever the gap to the nearest prior epoch.
//! The archive is sorted, so selection is a binary search.
//!
//! ## See also
//! ------------
//! * [`tle_epoch_to_utc`](crate::time::tle_epoch_to_utc) – Epoch field decoding.
//! * [`OrbitPropagator`](crate::propagation::OrbitPropagator) – Consumer of the selected lines.
pub mod tle_archive_reader;

use hifitime::Epoch;

pub use tle_archive_reader::ParseTleError;

use crate::overhead_errors::OverheadError;

/// One two-line element set and the epoch decoded from its first line.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSetEntry {
    epoch: Epoch,
    line1: String,
    line2: String,
}

impl ElementSetEntry {
    pub(crate) fn new(epoch: Epoch, line1: String, line2: String) -> Self {
        ElementSetEntry {
            epoch,
            line1,
            line2,
        }
    }

    /// Epoch the element set is valid as of (UTC)
    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn line1(&self) -> &str {
        &self.line1
    }

    pub fn line2(&self) -> &str {
        &self.line2
    }
}

/// Chronologically sorted, never empty, never mutated once built.
#[derive(Debug, Clone)]
pub struct ElementSetArchive {
    entries: Vec<ElementSetEntry>,
}

impl ElementSetArchive {
    /// Build an archive from entries in any order.
    ///
    /// Arguments
    /// -----------------
    /// * `entries`: parsed element sets. They are sorted by epoch with a stable sort, so
    ///   entries sharing an epoch keep their relative order.
    ///
    /// Return
    /// ----------
    /// * The archive, or [`OverheadError::EmptyArchive`] when `entries` is empty.
    pub fn new(mut entries: Vec<ElementSetEntry>) -> Result<Self, OverheadError> {
        if entries.is_empty() {
            return Err(OverheadError::EmptyArchive);
        }
        entries.sort_by(|a, b| a.epoch.cmp(&b.epoch));
        Ok(ElementSetArchive { entries })
    }

    /// Most recent entry whose epoch is `<=` `target`, `None` if `target` predates the archive.
    pub fn select(&self, target: &Epoch) -> Option<&ElementSetEntry> {
        let after = self.entries.partition_point(|entry| entry.epoch <= *target);
        after.checked_sub(1).map(|idx| &self.entries[idx])
    }

    /// Epoch of the oldest entry
    pub fn first_epoch(&self) -> Epoch {
        self.entries[0].epoch
    }

    /// Epoch of the most recent entry
    pub fn last_epoch(&self) -> Epoch {
        self.entries[self.entries.len() - 1].epoch
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: an archive holds at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ElementSetEntry] {
        &self.entries
    }
}
