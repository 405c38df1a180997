//! Progress reporting for long correlation runs.
//!
//! With the `progress` feature, [`RowProgress`] drives an `indicatif` spinner on stderr.
//! Every [`PROGRESS_STRIDE`] rows the message shows the duration of the last block and a
//! smoothed block duration (`ema ← α·dt + (1–α)·ema`, seeded with the first block).
//! Without the feature every method is a no-op.
#[cfg(feature = "progress")]
use std::time::{Duration, Instant};

#[cfg(feature = "progress")]
use indicatif::{ProgressBar, ProgressStyle};

/// Rows between two refreshes of the progress message.
pub(crate) const PROGRESS_STRIDE: u64 = 1024;

/// Weight of the newest block in the smoothed duration.
#[cfg(feature = "progress")]
const BLOCK_SMOOTHING: f64 = 0.2;

/// Short human-readable duration: `µs` below a millisecond, `ms` below a second.
#[cfg(feature = "progress")]
fn block_label(d: Duration) -> String {
    match d.as_micros() {
        us @ 0..=999 => format!("{us}µs"),
        1_000..=999_999 => format!("{}ms", d.as_millis()),
        _ => format!("{:.2}s", d.as_secs_f64()),
    }
}

pub(crate) struct RowProgress {
    rows: u64,
    #[cfg(feature = "progress")]
    bar: ProgressBar,
    #[cfg(feature = "progress")]
    block_start: Instant,
    /// Smoothed block duration, `None` until the first block completes
    #[cfg(feature = "progress")]
    smoothed: Option<Duration>,
}

impl RowProgress {
    pub(crate) fn new() -> Self {
        #[cfg(feature = "progress")]
        {
            let bar = ProgressBar::new_spinner();
            bar.set_style(
                ProgressStyle::with_template("{spinner} {pos} rows | {per_sec} | {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            bar.enable_steady_tick(Duration::from_millis(200));
            RowProgress {
                rows: 0,
                bar,
                block_start: Instant::now(),
                smoothed: None,
            }
        }
        #[cfg(not(feature = "progress"))]
        RowProgress { rows: 0 }
    }

    pub(crate) fn inc(&mut self, rows: u64) {
        let block = self.rows / PROGRESS_STRIDE;
        self.rows += rows;
        if self.rows / PROGRESS_STRIDE == block {
            return;
        }

        #[cfg(feature = "progress")]
        {
            let now = Instant::now();
            let last = now.duration_since(self.block_start);
            self.block_start = now;
            let smoothed = self.smooth(last);

            self.bar.set_position(self.rows);
            self.bar.set_message(format!(
                "last {PROGRESS_STRIDE} rows: {}, avg: {}",
                block_label(last),
                block_label(smoothed)
            ));
        }
    }

    #[cfg(feature = "progress")]
    fn smooth(&mut self, last: Duration) -> Duration {
        let smoothed = match self.smoothed {
            None => last,
            Some(previous) => Duration::from_secs_f64(
                BLOCK_SMOOTHING * last.as_secs_f64()
                    + (1.0 - BLOCK_SMOOTHING) * previous.as_secs_f64(),
            ),
        };
        self.smoothed = Some(smoothed);
        smoothed
    }

    pub(crate) fn finish(&self) {
        #[cfg(feature = "progress")]
        {
            self.bar.set_position(self.rows);
            self.bar.finish_and_clear();
        }
    }
}

#[cfg(all(test, feature = "progress"))]
mod progress_bar_test {
    use super::*;

    #[test]
    fn test_block_label() {
        assert_eq!(block_label(Duration::from_micros(253)), "253µs");
        assert_eq!(block_label(Duration::from_millis(42)), "42ms");
        assert_eq!(block_label(Duration::from_millis(3140)), "3.14s");
    }

    #[test]
    fn test_smoothing_starts_from_first_block() {
        let mut progress = RowProgress::new();
        assert_eq!(
            progress.smooth(Duration::from_millis(100)),
            Duration::from_millis(100)
        );
        let next = progress.smooth(Duration::from_millis(200));
        assert!((next.as_secs_f64() - 0.12).abs() < 1e-9);
        progress.finish();
    }

    #[test]
    fn test_rows_are_counted() {
        let mut progress = RowProgress::new();
        for _ in 0..(PROGRESS_STRIDE + 3) {
            progress.inc(1);
        }
        assert_eq!(progress.rows, PROGRESS_STRIDE + 3);
        assert!(progress.smoothed.is_some());
        progress.finish();
    }
}
