//! Assembly of one displayed month from the three feeds.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::sync::Arc;

use chrono::{Days, NaiveDate};
use tracing::warn;

use super::expand;
use super::resolve::resolve_day;
use super::sessions::{self, DayLog};
use crate::clock::Clock;
use crate::error::{CalendarError, FetchSource};
use crate::model::{AttendanceRecord, DayStatus, Holiday, LeaveApplication};
use crate::provider::{AttendanceProvider, HolidayProvider, LeaveProvider};
use crate::utils::time;

/// Builds month views and day logs from the injected feeds. Cheap to
/// clone; holds only shared handles.
#[derive(Clone)]
pub struct CalendarService {
    attendance: Arc<dyn AttendanceProvider>,
    leaves: Arc<dyn LeaveProvider>,
    holidays: Arc<dyn HolidayProvider>,
    clock: Arc<dyn Clock>,
}

/// One reconciled month, replaced wholesale on every rebuild. `statuses`
/// holds only dates that resolved to something; dates absent from the map
/// render as empty cells. Fetch failures land in `errors` while the rest
/// of the view still populates.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub year: i32,
    pub month: u32,
    pub statuses: BTreeMap<NaiveDate, DayStatus>,
    pub leading_blanks: u32,
    pub trailing_blanks: u32,
    pub days_in_month: u32,
    /// Today's date, only when it falls inside this month.
    pub today: Option<NaiveDate>,
    pub errors: Vec<CalendarError>,
}

impl MonthView {
    /// Grid slots in render order: leading blanks, one slot per day,
    /// trailing blanks. The total is always a multiple of seven.
    pub fn cells(&self) -> impl Iterator<Item = Option<&DayStatus>> {
        let first = time::first_of_month(self.year, self.month);
        let leading = (0..self.leading_blanks).map(|_| None);
        let days = (0..self.days_in_month)
            .filter_map(move |offset| {
                first.and_then(|f| f.checked_add_days(Days::new(u64::from(offset))))
            })
            .map(|date| self.statuses.get(&date));
        let trailing = (0..self.trailing_blanks).map(|_| None);
        leading.chain(days).chain(trailing)
    }
}

impl CalendarService {
    pub fn new(
        attendance: Arc<dyn AttendanceProvider>,
        leaves: Arc<dyn LeaveProvider>,
        holidays: Arc<dyn HolidayProvider>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        CalendarService {
            attendance,
            leaves,
            holidays,
            clock,
        }
    }

    /// Reconciles one `(user, year, month)` view. The attendance and
    /// leave fetches run concurrently; a failed fetch degrades to
    /// whatever the remaining sources can show and is recorded in
    /// `MonthView::errors`. The only `Err` out of here is a nonsensical
    /// month number. Idempotent, so safe to re-run on every navigation
    /// and refresh event.
    pub async fn build_month(
        &self,
        user_id: &str,
        year: i32,
        month: u32,
    ) -> Result<MonthView, CalendarError> {
        let invalid = || CalendarError::InvalidMonth { year, month };
        let first = time::first_of_month(year, month).ok_or_else(invalid)?;
        let last = time::last_of_month(year, month).ok_or_else(invalid)?;
        let days_in_month = time::days_in_month(year, month).ok_or_else(invalid)?;
        let leading_blanks = time::leading_blanks(year, month).ok_or_else(invalid)?;
        let trailing_blanks = time::trailing_blanks(year, month).ok_or_else(invalid)?;

        let mut errors = Vec::new();

        let (attendance_fetch, leave_fetch) = tokio::join!(
            self.attendance.fetch_attendance(user_id, first, last),
            self.leaves.fetch_leave_applications(user_id),
        );
        let attendance_records = attendance_fetch.unwrap_or_else(|cause| {
            warn!("attendance fetch failed for {}: {}", user_id, cause);
            errors.push(CalendarError::Fetch {
                kind: FetchSource::Attendance,
                cause,
            });
            Vec::new()
        });
        let leave_applications = leave_fetch.unwrap_or_else(|cause| {
            warn!("leave fetch failed for {}: {}", user_id, cause);
            errors.push(CalendarError::Fetch {
                kind: FetchSource::Leave,
                cause,
            });
            Vec::new()
        });
        let holidays = self.holidays.fetch_holidays().await.unwrap_or_else(|cause| {
            warn!("holiday fetch failed: {}", cause);
            errors.push(CalendarError::Fetch {
                kind: FetchSource::Holiday,
                cause,
            });
            Vec::new()
        });

        let attendance_by_date = index_attendance(attendance_records);
        let leaves_by_date = expand_leaves(&leave_applications, first, last);
        let holidays_by_date: BTreeMap<NaiveDate, Holiday> = holidays
            .into_iter()
            .filter(|h| h.date >= first && h.date <= last)
            .map(|h| (h.date, h))
            .collect();

        let mut statuses = BTreeMap::new();
        for date in first.iter_days().take_while(|d| *d <= last) {
            let leaves_for_date = leaves_by_date
                .get(&date)
                .map(Vec::as_slice)
                .unwrap_or_default();
            if let Some(status) = resolve_day(
                date,
                attendance_by_date.get(&date),
                leaves_for_date,
                holidays_by_date.get(&date),
            ) {
                statuses.insert(date, status);
            }
        }

        let today = Some(self.clock.today_ist()).filter(|t| *t >= first && *t <= last);

        Ok(MonthView {
            year,
            month,
            statuses,
            leading_blanks,
            trailing_blanks,
            days_in_month,
            today,
            errors,
        })
    }

    /// Attendance history for an inclusive date window, one log per
    /// recorded day, oldest first. Records with corrupt sessions are
    /// logged and dropped; a failed fetch fails the whole call since
    /// there is nothing to degrade to.
    pub async fn day_logs(
        &self,
        user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<DayLog>, CalendarError> {
        let records = self
            .attendance
            .fetch_attendance(user_id, start, end)
            .await
            .map_err(|cause| CalendarError::Fetch {
                kind: FetchSource::Attendance,
                cause,
            })?;

        let mut logs = Vec::with_capacity(records.len());
        for record in records {
            match sessions::day_log(record.date, &record.sessions, self.clock.as_ref()) {
                Ok(log) => logs.push(log),
                Err(err) => warn!("skipping attendance record for {}: {}", record.date, err),
            }
        }
        logs.sort_by_key(|log| log.date);
        Ok(logs)
    }
}

/// One record per date; a record with corrupt sessions is dropped here so
/// a single bad pair never hides the rest of the month.
fn index_attendance(records: Vec<AttendanceRecord>) -> BTreeMap<NaiveDate, AttendanceRecord> {
    let mut by_date = BTreeMap::new();
    for record in records {
        if let Err(err) = sessions::session_durations(&record.sessions) {
            warn!("skipping attendance record for {}: {}", record.date, err);
            continue;
        }
        match by_date.entry(record.date) {
            Entry::Vacant(slot) => {
                slot.insert(record);
            }
            Entry::Occupied(_) => {
                warn!("duplicate attendance record for {}", record.date);
            }
        }
    }
    by_date
}

/// Expands every overlapping leave and keeps only the dates inside the
/// displayed window. Inverted ranges are dropped with a warning before
/// the window test, so they are reported whichever month is displayed.
fn expand_leaves(
    leaves: &[LeaveApplication],
    first: NaiveDate,
    last: NaiveDate,
) -> BTreeMap<NaiveDate, Vec<&LeaveApplication>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&LeaveApplication>> = BTreeMap::new();
    for leave in leaves {
        let dates = match expand::expand(leave) {
            Ok(dates) => dates,
            Err(err) => {
                warn!("skipping leave: {}", err);
                continue;
            }
        };
        if leave.end_date < first || leave.start_date > last {
            continue;
        }
        for (date, entry) in dates {
            if date < first {
                continue;
            }
            if date > last {
                break;
            }
            by_date.entry(date).or_default().push(entry);
        }
    }
    by_date
}
