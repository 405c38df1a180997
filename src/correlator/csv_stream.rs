//! # Streaming CSV correlation
//!
//! Drive a [`SightingCorrelator`] over a sighting table and write the same table augmented with
//! three trailing columns: `iss_lat`, `iss_lon`, `iss_visible_in_sky`.
//!
//! ## Overview
//! -----------------
//! * [`correlate_csv`] – Sequential pass, one record in memory at a time.
//! * `correlate_csv_parallel` (feature `parallel`) – Reads fixed-size batches, correlates each
//!   batch on the rayon pool, writes the batch back in input order.
//!
//! Both produce byte-identical output for the same input.
//!
//! ## Guarantees
//! -----------------
//! * One output row per input row, in input order, whatever happens to the row.
//! * Passthrough fields are copied as raw bytes; the header row is copied verbatim.
//! * Rows shorter than the header are padded with empty fields so the derived columns stay
//!   aligned. Rows wider than the header are kept whole (logged as a warning).
//! * Output uses minimal quoting and `\r\n` record terminators.
//!
//! ## Error Handling
//! -----------------
//! Only stream-level failures abort the run ([`OverheadError::CsvError`] for framing and I/O,
//! [`OverheadError::MissingColumn`] when the header lacks the datetime column). Everything that
//! can go wrong with a single record ends up in its [`Correlation`].
use std::io::{Read, Write};

use csv::{ByteRecord, ReaderBuilder, Terminator, WriterBuilder};
use tracing::{debug, info, warn};

use crate::{
    config::OverheadConfig,
    constants::{ISS_LAT_COLUMN, ISS_LON_COLUMN, ISS_VISIBLE_COLUMN},
    correlator::{progress_bar::RowProgress, Correlation, NoDataReason, SightingCorrelator},
    overhead_errors::OverheadError,
    propagation::OrbitPropagator,
};

/// Number of records correlated together by the parallel driver.
#[cfg(feature = "parallel")]
pub const PARALLEL_BATCH_SIZE: usize = 4096;

/// Positions of the columns read by the correlator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    pub datetime: usize,
    pub latitude: Option<usize>,
    pub longitude: Option<usize>,
    /// Number of header fields
    pub width: usize,
}

impl ColumnLayout {
    /// Resolve column positions from a header row.
    ///
    /// Names are compared after trimming surrounding whitespace on both sides. When a name
    /// appears more than once, the last occurrence is used.
    ///
    /// Return
    /// ----------
    /// * The layout, or [`OverheadError::MissingColumn`] if the datetime column is absent.
    ///   Missing coordinate columns are allowed: every row then degrades to a partial result.
    pub fn from_header(header: &ByteRecord, config: &OverheadConfig) -> Result<Self, OverheadError> {
        let find = |name: &str| {
            header
                .iter()
                .rposition(|field| std::str::from_utf8(field).map(str::trim) == Ok(name.trim()))
        };

        let datetime = find(&config.datetime_column)
            .ok_or_else(|| OverheadError::MissingColumn(config.datetime_column.clone()))?;
        let latitude = find(&config.latitude_column);
        let longitude = find(&config.longitude_column);

        for (name, position) in [
            (&config.latitude_column, latitude),
            (&config.longitude_column, longitude),
        ] {
            if position.is_none() {
                warn!(column = %name, "coordinate column not found, visibility will stay empty");
            }
        }

        Ok(ColumnLayout {
            datetime,
            latitude,
            longitude,
            width: header.len(),
        })
    }
}

/// Counters over one correlation run.
///
/// `rows == full + partial + no_data()` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrelationSummary {
    pub rows: u64,
    pub full: u64,
    /// Full results flagged visible
    pub visible: u64,
    pub partial: u64,
    pub unparsable_timestamp: u64,
    pub before_archive: u64,
    pub propagation_failed: u64,
}

impl CorrelationSummary {
    pub fn record(&mut self, correlation: &Correlation) {
        self.rows += 1;
        match correlation {
            Correlation::Full { visible, .. } => {
                self.full += 1;
                if *visible {
                    self.visible += 1;
                }
            }
            Correlation::Partial { .. } => self.partial += 1,
            Correlation::NoData(NoDataReason::UnparsableTimestamp) => {
                self.unparsable_timestamp += 1
            }
            Correlation::NoData(NoDataReason::BeforeArchive) => self.before_archive += 1,
            Correlation::NoData(NoDataReason::PropagationFailed) => self.propagation_failed += 1,
        }
    }

    pub fn no_data(&self) -> u64 {
        self.unparsable_timestamp + self.before_archive + self.propagation_failed
    }
}

/// Correlate a single CSV record.
pub fn correlate_record<P: OrbitPropagator>(
    correlator: &SightingCorrelator<'_, P>,
    layout: &ColumnLayout,
    record: &ByteRecord,
) -> Correlation {
    let text = |position: Option<usize>| {
        position
            .and_then(|i| record.get(i))
            .and_then(|bytes| std::str::from_utf8(bytes).ok())
    };

    correlator.correlate(
        text(Some(layout.datetime)),
        text(layout.latitude),
        text(layout.longitude),
    )
}

/// Writing side shared by the sequential and parallel drivers.
struct CorrelatedSink<W: Write> {
    writer: csv::Writer<W>,
    layout: ColumnLayout,
    summary: CorrelationSummary,
    progress: RowProgress,
    output: ByteRecord,
}

impl<W: Write> CorrelatedSink<W> {
    fn new(output: W, header: &ByteRecord, layout: ColumnLayout) -> Result<Self, OverheadError> {
        let mut writer = WriterBuilder::new()
            .flexible(true)
            .terminator(Terminator::CRLF)
            .from_writer(output);

        let mut out_header = header.clone();
        out_header.push_field(ISS_LAT_COLUMN.as_bytes());
        out_header.push_field(ISS_LON_COLUMN.as_bytes());
        out_header.push_field(ISS_VISIBLE_COLUMN.as_bytes());
        writer.write_byte_record(&out_header)?;

        Ok(CorrelatedSink {
            writer,
            layout,
            summary: CorrelationSummary::default(),
            progress: RowProgress::new(),
            output: ByteRecord::new(),
        })
    }

    fn write(&mut self, record: &ByteRecord, correlation: &Correlation) -> Result<(), OverheadError> {
        self.summary.record(correlation);
        let row = self.summary.rows;

        if let Correlation::NoData(reason) = correlation {
            debug!(row, %reason, "no satellite data for record");
        }
        if record.len() > self.layout.width {
            warn!(
                row,
                fields = record.len(),
                header = self.layout.width,
                "record wider than header, derived columns are shifted"
            );
        }

        self.output.clear();
        for field in record.iter() {
            self.output.push_field(field);
        }
        for _ in record.len()..self.layout.width {
            self.output.push_field(b"");
        }

        let fields = correlation.derived_fields();
        self.output.push_field(fields.iss_lat.as_bytes());
        self.output.push_field(fields.iss_lon.as_bytes());
        self.output.push_field(fields.iss_visible_in_sky.as_bytes());
        self.writer.write_byte_record(&self.output)?;

        self.progress.inc(1);
        Ok(())
    }

    fn finish(mut self) -> Result<CorrelationSummary, OverheadError> {
        self.writer.flush()?;
        self.progress.finish();

        let s = self.summary;
        info!(
            rows = s.rows,
            full = s.full,
            visible = s.visible,
            partial = s.partial,
            unparsable_timestamp = s.unparsable_timestamp,
            before_archive = s.before_archive,
            propagation_failed = s.propagation_failed,
            "correlation finished"
        );
        Ok(s)
    }
}

fn open_reader<R: Read>(
    input: R,
    config: &OverheadConfig,
) -> Result<(csv::Reader<R>, ByteRecord, ColumnLayout), OverheadError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
    let header = reader.byte_headers()?.clone();
    let layout = ColumnLayout::from_header(&header, config)?;
    Ok((reader, header, layout))
}

/// Correlate every record of a CSV table, sequentially.
///
/// Arguments
/// -----------------
/// * `correlator`: per-record pipeline (archive, propagator, visibility threshold).
/// * `config`: column names to read; its threshold is not used here, the correlator's is.
/// * `input`: CSV with a header row.
/// * `output`: receives the augmented table.
///
/// Return
/// ----------
/// * Counters over the run, or a stream-level [`OverheadError`].
pub fn correlate_csv<R: Read, W: Write, P: OrbitPropagator>(
    correlator: &SightingCorrelator<'_, P>,
    config: &OverheadConfig,
    input: R,
    output: W,
) -> Result<CorrelationSummary, OverheadError> {
    let (mut reader, header, layout) = open_reader(input, config)?;
    let mut sink = CorrelatedSink::new(output, &header, layout)?;

    let mut record = ByteRecord::new();
    while reader.read_byte_record(&mut record)? {
        let correlation = correlate_record(correlator, &layout, &record);
        sink.write(&record, &correlation)?;
    }

    sink.finish()
}

/// Correlate every record of a CSV table on the rayon thread pool.
///
/// Records are read by batches of [`PARALLEL_BATCH_SIZE`]; output order matches input order.
#[cfg(feature = "parallel")]
pub fn correlate_csv_parallel<R: Read, W: Write, P: OrbitPropagator + Sync>(
    correlator: &SightingCorrelator<'_, P>,
    config: &OverheadConfig,
    input: R,
    output: W,
) -> Result<CorrelationSummary, OverheadError> {
    use rayon::prelude::*;

    let (mut reader, header, layout) = open_reader(input, config)?;
    let mut sink = CorrelatedSink::new(output, &header, layout)?;

    let mut batch: Vec<ByteRecord> = Vec::with_capacity(PARALLEL_BATCH_SIZE);
    loop {
        batch.clear();
        let mut record = ByteRecord::new();
        while batch.len() < PARALLEL_BATCH_SIZE && reader.read_byte_record(&mut record)? {
            batch.push(std::mem::take(&mut record));
        }
        if batch.is_empty() {
            break;
        }

        let correlations: Vec<Correlation> = batch
            .par_iter()
            .map(|record| correlate_record(correlator, &layout, record))
            .collect();

        for (record, correlation) in batch.iter().zip(&correlations) {
            sink.write(record, correlation)?;
        }
    }

    sink.finish()
}
