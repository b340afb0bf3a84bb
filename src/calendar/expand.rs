//! Expansion of a leave application into the calendar dates it covers.

use chrono::NaiveDate;

use crate::error::CalendarError;
use crate::model::LeaveApplication;

/// Lazy walk over the inclusive date range of one leave application.
/// Every yielded date carries the application reference so callers read
/// status and half-day metadata without another fetch. Cloning restarts
/// from the cloned position.
#[derive(Debug, Clone)]
pub struct LeaveDates<'a> {
    leave: &'a LeaveApplication,
    next: Option<NaiveDate>,
}

impl<'a> Iterator for LeaveDates<'a> {
    type Item = (NaiveDate, &'a LeaveApplication);

    fn next(&mut self) -> Option<Self::Item> {
        let date = self.next?;
        self.next = if date < self.leave.end_date {
            date.succ_opt()
        } else {
            None
        };
        Some((date, self.leave))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.next {
            Some(next) => (self.leave.end_date - next).num_days() as usize + 1,
            None => 0,
        };
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for LeaveDates<'_> {}

/// Builds the date sequence for one leave. `end_date` before `start_date`
/// is corrupt upstream data and fails at construction, before any date is
/// produced.
pub fn expand(leave: &LeaveApplication) -> Result<LeaveDates<'_>, CalendarError> {
    if leave.end_date < leave.start_date {
        return Err(CalendarError::InvalidRange {
            id: leave.id.clone(),
            start: leave.start_date,
            end: leave.end_date,
        });
    }
    Ok(LeaveDates {
        leave,
        next: Some(leave.start_date),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::LeaveStatus;
    use chrono::{TimeZone, Utc};

    fn leave(start: NaiveDate, end: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            id: "lv-1".into(),
            user_id: "u-1".into(),
            start_date: start,
            end_date: end,
            status: LeaveStatus::Pending,
            half_day: None,
            reason: "personal".into(),
            rejection_reason: None,
            applied_at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap(),
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn three_day_leave_expands_to_three_contiguous_dates() {
        let leave = leave(date(2025, 3, 10), date(2025, 3, 12));
        let dates: Vec<_> = expand(&leave).unwrap().collect();

        assert_eq!(dates.len(), 3);
        assert_eq!(dates[0].0, date(2025, 3, 10));
        assert_eq!(dates[1].0, date(2025, 3, 11));
        assert_eq!(dates[2].0, date(2025, 3, 12));
        for (date, entry) in &dates {
            assert_eq!(entry.status, LeaveStatus::Pending);
            assert_eq!(entry.id, "lv-1");
            assert!(*date >= entry.start_date && *date <= entry.end_date);
        }
    }

    #[test]
    fn single_day_leave_yields_exactly_its_date() {
        let leave = leave(date(2025, 3, 15), date(2025, 3, 15));
        let dates: Vec<_> = expand(&leave).unwrap().map(|(d, _)| d).collect();
        assert_eq!(dates, vec![date(2025, 3, 15)]);
    }

    #[test]
    fn length_is_end_minus_start_plus_one_across_month_boundary() {
        let leave = leave(date(2025, 2, 27), date(2025, 3, 2));
        let iter = expand(&leave).unwrap();
        assert_eq!(iter.len(), 4);
        let dates: Vec<_> = iter.map(|(d, _)| d).collect();
        assert_eq!(dates.first(), Some(&date(2025, 2, 27)));
        assert_eq!(dates.last(), Some(&date(2025, 3, 2)));
        for pair in dates.windows(2) {
            assert_eq!(pair[0].succ_opt(), Some(pair[1]));
        }
    }

    #[test]
    fn inverted_range_fails_before_yielding_anything() {
        let leave = leave(date(2025, 3, 12), date(2025, 3, 10));
        let err = expand(&leave).unwrap_err();
        assert_eq!(
            err,
            CalendarError::InvalidRange {
                id: "lv-1".into(),
                start: date(2025, 3, 12),
                end: date(2025, 3, 10),
            }
        );
    }

    #[test]
    fn clone_restarts_iteration() {
        let leave = leave(date(2025, 3, 10), date(2025, 3, 12));
        let fresh = expand(&leave).unwrap();
        let restarted = fresh.clone();
        assert_eq!(fresh.count(), 3);
        assert_eq!(restarted.count(), 3);
    }
}
