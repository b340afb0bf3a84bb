use chrono::{DateTime, NaiveDate, Utc};
use thiserror::Error;

use crate::provider::FetchError;

/// Which upstream feed a fetch failure came from. Decides how the
/// calendar degrades: attendance or leave failures surface on the month
/// view, a holiday failure only drops the holiday markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Attendance,
    Leave,
    Holiday,
}

impl FetchSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchSource::Attendance => "attendance",
            FetchSource::Leave => "leave",
            FetchSource::Holiday => "holiday",
        }
    }
}

impl std::fmt::Display for FetchSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CalendarError {
    /// A closed session whose checkout precedes its checkin. The record
    /// is server-produced, so this means corrupt data, not user error;
    /// the record is skipped and the rest of the month still builds.
    #[error("session check-out {check_out} precedes check-in {check_in}")]
    MalformedSession {
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    },

    /// A leave range whose end precedes its start.
    #[error("leave {id}: range end {end} precedes start {start}")]
    InvalidRange {
        id: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    /// An upstream feed could not be read. Carries the failed source so
    /// the view can report which data is stale or missing.
    #[error("failed to fetch {kind} data: {cause}")]
    Fetch { kind: FetchSource, cause: FetchError },

    #[error("invalid month {year}-{month:02}")]
    InvalidMonth { year: i32, month: u32 },
}
