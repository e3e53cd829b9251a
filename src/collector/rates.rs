use chrono::{DateTime, Utc};

use crate::syncthing_client::ConnectionTotals;

/// Transfer throughput in bytes per second.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TransferRates {
    pub download_bps: f64,
    pub upload_bps: f64,
}

#[derive(Debug, Clone, Copy)]
struct CounterSample {
    at: DateTime<Utc>,
    in_total: i64,
    out_total: i64,
}

/// Derives throughput from cumulative byte counters between polls.
#[derive(Debug, Default)]
pub struct RateTracker {
    last: Option<CounterSample>,
}

impl RateTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `totals` taken at `now` and returns the rate to report.
    ///
    /// A nonzero rate reported by the daemon is used as is. Otherwise the
    /// counter delta since the previous sample is divided by the elapsed
    /// time; the first sample, a non-positive elapsed time or a counter
    /// reset all fall back to the reported rate.
    pub fn sample(&mut self, totals: &ConnectionTotals, now: DateTime<Utc>) -> TransferRates {
        let reported = TransferRates {
            download_bps: totals.bits_per_second_in / 8.0,
            upload_bps: totals.bits_per_second_out / 8.0,
        };

        let previous = self.last.replace(CounterSample {
            at: now,
            in_total: totals.in_bytes_total,
            out_total: totals.out_bytes_total,
        });

        if reported.download_bps > 0.0 || reported.upload_bps > 0.0 {
            return reported;
        }
        let Some(previous) = previous else {
            return reported;
        };

        let elapsed = match now.signed_duration_since(previous.at).num_nanoseconds() {
            Some(nanos) if nanos > 0 => nanos as f64 / 1e9,
            _ => return reported,
        };

        let in_delta = totals.in_bytes_total - previous.in_total;
        let out_delta = totals.out_bytes_total - previous.out_total;
        if in_delta < 0 || out_delta < 0 {
            return reported;
        }

        TransferRates {
            download_bps: in_delta as f64 / elapsed,
            upload_bps: out_delta as f64 / elapsed,
        }
    }
}
