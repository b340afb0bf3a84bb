//! Attendance and leave calendar reconciliation engine.
//!
//! Merges three independently fetched sources (attendance sessions,
//! leave applications, public holidays) into one per-day status for a
//! displayed month, and computes worked and break durations per day.
//! Consumed by calendar and history views; carries no wire surface of
//! its own.

pub mod calendar;
pub mod clock;
pub mod error;
pub mod model;
pub mod provider;
pub mod utils;

pub use calendar::{CalendarService, ChangeKind, MonthView, RefreshController, RefreshPolicy};
pub use error::CalendarError;
