//! Upstream data feeds. The calendar engine only ever talks to these
//! traits; the binary wires in a file-backed implementation and tests
//! wire in an in-memory one.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use crate::model::{AttendanceRecord, Holiday, LeaveApplication};

pub mod json;
pub mod memory;

/// A feed could not be read. Providers flatten transport detail into a
/// message; the engine only needs to know the source failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct FetchError {
    pub message: String,
}

impl FetchError {
    pub fn new(message: impl Into<String>) -> Self {
        FetchError {
            message: message.into(),
        }
    }
}

pub type FetchResult<T> = Result<T, FetchError>;

/// Server-produced attendance records for one user, one record per date,
/// filtered to dates within the inclusive window.
#[async_trait]
pub trait AttendanceProvider: Send + Sync {
    async fn fetch_attendance(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<AttendanceRecord>>;
}

/// All leave applications filed by one user. Callers filter by month
/// overlap, so a leave spanning a month boundary shows up in both months.
#[async_trait]
pub trait LeaveProvider: Send + Sync {
    async fn fetch_leave_applications(
        &self,
        user_id: &str,
    ) -> FetchResult<Vec<LeaveApplication>>;
}

/// Public holidays. Global, not per-user; callers filter to the
/// displayed month.
#[async_trait]
pub trait HolidayProvider: Send + Sync {
    async fn fetch_holidays(&self) -> FetchResult<Vec<Holiday>>;
}
