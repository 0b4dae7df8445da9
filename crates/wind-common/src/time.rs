//! Forecast run-time resolution.
//!
//! Global forecast models are issued four times a day at 00, 06, 12 and 18
//! UTC. A [`RunTime`] is always one of those synoptic hours with minutes,
//! seconds and sub-seconds zeroed.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// Synoptic hours at which forecast runs are issued.
pub const RUN_HOURS: [u32; 4] = [0, 6, 12, 18];

/// Hours between consecutive runs.
pub const RUN_INTERVAL_HOURS: i64 = 6;

/// A forecast run issuance time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunTime(DateTime<Utc>);

impl RunTime {
    /// Resolve the run nearest to `instant`.
    ///
    /// Only the hour of day is considered. Candidates are the four runs of
    /// the instant's UTC date; the first candidate with the smallest hour
    /// distance wins, so ties go to the earlier run. Between 00:00 and 02:59
    /// the previous day's 18Z run is also considered, at a distance of
    /// `hour + 6`, and replaces the same-day pick only if strictly closer.
    pub fn nearest(instant: DateTime<Utc>) -> Self {
        let hour = instant.hour();

        let mut nearest = RUN_HOURS[0];
        let mut min_diff = u32::MAX;
        for &run in &RUN_HOURS {
            let diff = hour.abs_diff(run);
            if diff < min_diff {
                min_diff = diff;
                nearest = run;
            }
        }

        let mut date = instant.date_naive();
        if hour < 3 {
            let diff_to_prev_18z = hour + (24 - 18);
            if diff_to_prev_18z < min_diff {
                nearest = 18;
                date = (instant - Duration::days(1)).date_naive();
            }
        }

        let naive = NaiveDateTime::new(date, NaiveTime::MIN) + Duration::hours(nearest as i64);
        Self(DateTime::<Utc>::from_naive_utc_and_offset(naive, Utc))
    }

    /// The run issued six hours before this one.
    pub fn previous(&self) -> Self {
        Self(self.0 - Duration::hours(RUN_INTERVAL_HOURS))
    }

    pub fn datetime(&self) -> DateTime<Utc> {
        self.0
    }

    /// Hour of day, always one of [`RUN_HOURS`].
    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    /// ISO-8601 timestamp with millisecond precision, e.g. `2026-02-26T06:00:00.000Z`.
    pub fn to_iso8601(&self) -> String {
        self.0.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
    }

    /// Display label, e.g. `20260226_06Z`.
    pub fn label(&self) -> String {
        self.0.format("%Y%m%d_%HZ").to_string()
    }

    /// File name used when archiving the raw buffer for this run.
    pub fn archive_file_name(&self) -> String {
        self.0.format("gfs_%Y%m%d_%Hz.nc").to_string()
    }
}

impl fmt::Display for RunTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_iso8601())
    }
}

impl From<RunTime> for DateTime<Utc> {
    fn from(run: RunTime) -> Self {
        run.0
    }
}
