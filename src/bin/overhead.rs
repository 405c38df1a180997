use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};

use camino::Utf8PathBuf;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use overhead::{
    correlate_csv, ElementSetArchive, OverheadConfig, SightingCorrelator, Sgp4Propagator,
};

/// Flag sighting reports made while the satellite was overhead.
#[derive(Parser, Debug)]
#[command(version)]
struct Opts {
    /// Two-line element archive (consecutive line pairs, any order)
    #[arg(long)]
    archive: Utf8PathBuf,

    /// Sighting table (CSV with a header row)
    #[arg(long)]
    input: Utf8PathBuf,

    /// Augmented table destination.
    ///
    /// The table is written to stdout when not provided.
    #[arg(long)]
    output: Option<Utf8PathBuf>,

    /// TOML configuration file, overridden by the flags below
    #[arg(long)]
    config: Option<Utf8PathBuf>,

    /// Distance under which the satellite counts as overhead, in km
    #[arg(long)]
    threshold_km: Option<f64>,

    /// Column holding the M/D/YYYY H:MM report timestamp
    #[arg(long)]
    datetime_column: Option<String>,

    /// Column holding the report latitude
    #[arg(long)]
    latitude_column: Option<String>,

    /// Column holding the report longitude
    #[arg(long)]
    longitude_column: Option<String>,

    /// Correlate records on all cores (output order is unchanged)
    #[cfg(feature = "parallel")]
    #[arg(long)]
    parallel: bool,
}

impl Opts {
    fn config(&self) -> Result<OverheadConfig, overhead::OverheadError> {
        let mut config = match &self.config {
            Some(path) => OverheadConfig::from_toml_file(path)?,
            None => OverheadConfig::default(),
        };

        if let Some(threshold) = self.threshold_km {
            config.visibility_threshold_km = threshold;
        }
        if let Some(column) = &self.datetime_column {
            config.datetime_column = column.clone();
        }
        if let Some(column) = &self.latitude_column {
            config.latitude_column = column.clone();
        }
        if let Some(column) = &self.longitude_column {
            config.longitude_column = column.clone();
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();
    let opts = Opts::parse();
    let config = opts.config()?;

    let archive = ElementSetArchive::from_tle_file(&opts.archive)?;
    let correlator = SightingCorrelator::new(&archive, Sgp4Propagator)
        .with_visibility_threshold(config.visibility_threshold_km);

    let input = BufReader::new(File::open(&opts.input)?);
    let output: Box<dyn Write> = match &opts.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    info!(input = %opts.input, "correlating sightings");

    #[cfg(feature = "parallel")]
    let summary = if opts.parallel {
        overhead::correlate_csv_parallel(&correlator, &config, input, output)?
    } else {
        correlate_csv(&correlator, &config, input, output)?
    };
    #[cfg(not(feature = "parallel"))]
    let summary = correlate_csv(&correlator, &config, input, output)?;

    if let Some(path) = &opts.output {
        info!(output = %path, rows = summary.rows, "wrote augmented table");
    }
    Ok(())
}
