//! Fixed-format results report.
//!
//! Every rate is the aggregated counter divided by elapsed wall-clock time,
//! rendered with two fractional digits of fixed-point integer math.

use std::time::Duration;

use crate::metrics::CountersSnapshot;

/// Fixed-point scale: two fractional digits.
const RATE_SCALE: u128 = 100;
/// Milliseconds per second.
const MS_PER_SEC: u128 = 1_000;
/// Milliseconds per hundredth of a second.
const MS_PER_CENTISECOND: u128 = 10;

pub struct RunReport {
    totals: CountersSnapshot,
    elapsed: Duration,
}

impl RunReport {
    #[must_use]
    pub const fn new(totals: CountersSnapshot, elapsed: Duration) -> Self {
        Self { totals, elapsed }
    }

    /// Report lines in final print order.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let elapsed_ms = self.elapsed.as_millis().max(1);
        let success_rate = per_second_x100(self.totals.success, elapsed_ms);
        let read_rate = per_second_x100(self.totals.read_bytes, elapsed_ms);
        let write_rate = per_second_x100(self.totals.write_bytes, elapsed_ms);
        let test_time = elapsed_ms / MS_PER_CENTISECOND;

        vec![
            format!(
                "Requests:                       {:>13} hits",
                self.totals.requests
            ),
            format!(
                "Successful requests:            {:>13} hits",
                self.totals.success
            ),
            format!(
                "Network failed:                 {:>13} hits",
                self.totals.network_failed
            ),
            format!(
                "Bad requests failed (!2xx):     {:>13} hits",
                self.totals.bad_failed
            ),
            format!(
                "Successful requests rate:       {:>10}.{:02} hits/sec",
                success_rate / RATE_SCALE,
                success_rate % RATE_SCALE
            ),
            format!(
                "Read throughput:                {:>10}.{:02} bytes/sec",
                read_rate / RATE_SCALE,
                read_rate % RATE_SCALE
            ),
            format!(
                "Write throughput:               {:>10}.{:02} bytes/sec",
                write_rate / RATE_SCALE,
                write_rate % RATE_SCALE
            ),
            format!(
                "Test time:                      {:>10}.{:02} sec",
                test_time / RATE_SCALE,
                test_time % RATE_SCALE
            ),
        ]
    }

    /// Print the report to stdout, preceded by a blank separator line.
    pub fn print(&self) {
        println!();
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

fn per_second_x100(count: u64, elapsed_ms: u128) -> u128 {
    u128::from(count)
        .saturating_mul(MS_PER_SEC)
        .saturating_mul(RATE_SCALE)
        .checked_div(elapsed_ms)
        .unwrap_or(0)
}
