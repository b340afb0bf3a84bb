//! Reconciliation of one calendar date from its three data sources.

use chrono::NaiveDate;

use crate::model::{AttendanceRecord, DayKind, DayStatus, Holiday, LeaveApplication, LeaveStatus};

/// Folds a date's attendance record, overlapping leave entries, and
/// holiday into one `DayStatus`. Pure: no clock, no ambient state.
///
/// Precedence for the primary kind, highest first: holiday, then leave,
/// then attendance. A holiday does not erase the other markers; the
/// returned status still carries the leave and attendance references so
/// the view can draw secondary badges. A date with no data at all
/// resolves to `None` and renders as an empty, non-interactive cell.
pub fn resolve_day(
    date: NaiveDate,
    attendance: Option<&AttendanceRecord>,
    leaves: &[&LeaveApplication],
    holiday: Option<&Holiday>,
) -> Option<DayStatus> {
    let leave = effective_leave(leaves);

    let kind = if holiday.is_some() {
        DayKind::Holiday
    } else if let Some(leave) = leave {
        leave_kind(leave.status)
    } else if let Some(record) = attendance {
        attendance_kind(record)
    } else {
        return None;
    };

    Some(DayStatus {
        date,
        kind,
        attendance: attendance.cloned(),
        leave: leave.cloned(),
        holiday: holiday.cloned(),
    })
}

/// Picks the leave that decides the cell when several applications cover
/// the same date: best status first (approved, pending, rejected,
/// cancelled), then the most recently applied, then the greatest id as a
/// final deterministic key.
fn effective_leave<'a>(leaves: &[&'a LeaveApplication]) -> Option<&'a LeaveApplication> {
    leaves.iter().copied().min_by(|a, b| {
        a.status
            .precedence()
            .cmp(&b.status.precedence())
            .then_with(|| b.applied_at.cmp(&a.applied_at))
            .then_with(|| b.id.cmp(&a.id))
    })
}

fn leave_kind(status: LeaveStatus) -> DayKind {
    match status {
        LeaveStatus::Approved => DayKind::LeaveApproved,
        // Cancelled renders the same as rejected.
        LeaveStatus::Rejected | LeaveStatus::Cancelled => DayKind::LeaveRejected,
        LeaveStatus::Pending => DayKind::LeavePending,
    }
}

/// Server-assigned status string wins when present; otherwise any session
/// at all counts as present.
fn attendance_kind(record: &AttendanceRecord) -> DayKind {
    match &record.status {
        Some(status) => match status.trim().to_ascii_lowercase().as_str() {
            "present" | "active" => DayKind::Present,
            "half day" | "half-day" | "halfday" => DayKind::HalfDay,
            "on leave" | "leave" => DayKind::LeaveApproved,
            "late" => DayKind::Late,
            _ => DayKind::Absent,
        },
        None if !record.sessions.is_empty() => DayKind::Present,
        None => DayKind::Absent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn applied(day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 2, day, 12, 0, 0).unwrap()
    }

    fn leave(id: &str, status: LeaveStatus, applied_at: DateTime<Utc>) -> LeaveApplication {
        LeaveApplication {
            id: id.into(),
            user_id: "u-1".into(),
            start_date: date(10),
            end_date: date(12),
            status,
            half_day: None,
            reason: "personal".into(),
            rejection_reason: None,
            applied_at,
        }
    }

    fn record(status: Option<&str>, session_count: usize) -> AttendanceRecord {
        let session = crate::model::Session {
            check_in: Utc.with_ymd_and_hms(2025, 3, 10, 3, 30, 0).unwrap(),
            check_out: Some(Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap()),
            location_in: None,
            location_out: None,
        };
        AttendanceRecord {
            date: date(10),
            sessions: vec![session; session_count],
            status: status.map(str::to_owned),
            total_hours: None,
            notes: None,
        }
    }

    fn holiday() -> Holiday {
        Holiday {
            date: date(10),
            title: "Holi".into(),
        }
    }

    #[test]
    fn holiday_outranks_leave_but_keeps_the_reference() {
        let approved = leave("lv-1", LeaveStatus::Approved, applied(1));
        let status = resolve_day(date(10), None, &[&approved], Some(&holiday())).unwrap();

        assert_eq!(status.kind, DayKind::Holiday);
        assert_eq!(status.leave.as_ref().map(|l| l.id.as_str()), Some("lv-1"));
        assert_eq!(status.holiday.as_ref().map(|h| h.title.as_str()), Some("Holi"));
    }

    #[test]
    fn leave_statuses_map_to_their_kinds() {
        for (status, kind) in [
            (LeaveStatus::Approved, DayKind::LeaveApproved),
            (LeaveStatus::Pending, DayKind::LeavePending),
            (LeaveStatus::Rejected, DayKind::LeaveRejected),
            (LeaveStatus::Cancelled, DayKind::LeaveRejected),
        ] {
            let entry = leave("lv-1", status, applied(1));
            let resolved = resolve_day(date(10), None, &[&entry], None).unwrap();
            assert_eq!(resolved.kind, kind, "status {:?}", status);
        }
    }

    #[test]
    fn approved_beats_newer_cancelled() {
        let cancelled = leave("lv-2", LeaveStatus::Cancelled, applied(20));
        let approved = leave("lv-1", LeaveStatus::Approved, applied(1));

        let status = resolve_day(date(10), None, &[&cancelled, &approved], None).unwrap();
        assert_eq!(status.kind, DayKind::LeaveApproved);
        assert_eq!(status.leave.as_ref().map(|l| l.id.as_str()), Some("lv-1"));
    }

    #[test]
    fn newest_application_wins_within_a_rank() {
        let older = leave("lv-1", LeaveStatus::Pending, applied(1));
        let newer = leave("lv-2", LeaveStatus::Pending, applied(20));

        let status = resolve_day(date(10), None, &[&older, &newer], None).unwrap();
        assert_eq!(status.leave.as_ref().map(|l| l.id.as_str()), Some("lv-2"));
    }

    #[test]
    fn id_breaks_exact_ties_deterministically() {
        let a = leave("lv-a", LeaveStatus::Pending, applied(5));
        let b = leave("lv-b", LeaveStatus::Pending, applied(5));

        let forward = resolve_day(date(10), None, &[&a, &b], None).unwrap();
        let reversed = resolve_day(date(10), None, &[&b, &a], None).unwrap();
        assert_eq!(forward.leave.as_ref().map(|l| l.id.as_str()), Some("lv-b"));
        assert_eq!(forward.leave, reversed.leave);
    }

    #[test]
    fn server_status_strings_drive_the_attendance_kind() {
        for (status, kind) in [
            ("present", DayKind::Present),
            ("active", DayKind::Present),
            ("Half Day", DayKind::HalfDay),
            ("half-day", DayKind::HalfDay),
            ("on leave", DayKind::LeaveApproved),
            ("late", DayKind::Late),
            ("absent", DayKind::Absent),
            ("gibberish", DayKind::Absent),
        ] {
            let record = record(Some(status), 1);
            let resolved = resolve_day(date(10), Some(&record), &[], None).unwrap();
            assert_eq!(resolved.kind, kind, "server status {:?}", status);
        }
    }

    #[test]
    fn without_server_status_sessions_decide() {
        let worked = record(None, 2);
        assert_eq!(
            resolve_day(date(10), Some(&worked), &[], None).unwrap().kind,
            DayKind::Present
        );

        let empty = record(None, 0);
        assert_eq!(
            resolve_day(date(10), Some(&empty), &[], None).unwrap().kind,
            DayKind::Absent
        );
    }

    #[test]
    fn no_data_resolves_to_no_cell() {
        assert_eq!(resolve_day(date(10), None, &[], None), None);
    }

    #[test]
    fn identical_inputs_give_identical_output() {
        let entry = leave("lv-1", LeaveStatus::Approved, applied(1));
        let record = record(Some("present"), 1);
        let first = resolve_day(date(10), Some(&record), &[&entry], Some(&holiday()));
        let second = resolve_day(date(10), Some(&record), &[&entry], Some(&holiday()));
        assert_eq!(first, second);
    }
}
