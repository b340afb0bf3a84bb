use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One check-in/check-out pair recorded for a user on a given date.
/// `check_out` absent means the session is still open (user clocked in);
/// at most one open session is expected per record, always the last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    pub location_in: Option<GeoPoint>,
    pub location_out: Option<GeoPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

/// One attendance record per user per date, created server-side on
/// check-in/check-out. Read-only to this crate. `status` is the
/// server-assigned day status ("present", "half day", ...); `total_hours`
/// is the server's own duration string, carried through untouched while
/// the engine recomputes durations from the sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttendanceRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub sessions: Vec<Session>,
    pub status: Option<String>,
    pub total_hours: Option<String>,
    pub notes: Option<String>,
}

/// A request for time off covering an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaveApplication {
    pub id: String,
    pub user_id: String,
    pub start_date: NaiveDate,
    /// Inclusive; never before `start_date` in well-formed data.
    pub end_date: NaiveDate,
    pub status: LeaveStatus,
    pub half_day: Option<HalfDayType>,
    pub reason: String,
    pub rejection_reason: Option<String>,
    pub applied_at: DateTime<Utc>,
}

/// Approval state of a leave application.
///
/// The leave API serves this as either a small integer (1=pending,
/// 2=approved, 3=rejected, 4=cancelled) or a lower-case string, depending
/// on the endpoint. Both representations normalize here, at the wire
/// boundary; everything downstream compares only this enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl LeaveStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(LeaveStatus::Pending),
            2 => Some(LeaveStatus::Approved),
            3 => Some(LeaveStatus::Rejected),
            4 => Some(LeaveStatus::Cancelled),
            _ => None,
        }
    }

    /// Lenient string form; anything unrecognized is treated as pending,
    /// matching how unrecognized codes render in the calendar.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "approved" => LeaveStatus::Approved,
            "rejected" => LeaveStatus::Rejected,
            "cancelled" | "canceled" => LeaveStatus::Cancelled,
            _ => LeaveStatus::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LeaveStatus::Pending => "pending",
            LeaveStatus::Approved => "approved",
            LeaveStatus::Rejected => "rejected",
            LeaveStatus::Cancelled => "cancelled",
        }
    }

    /// Rank used when several applications cover the same date: approved
    /// beats pending beats rejected beats cancelled.
    pub fn precedence(&self) -> u8 {
        match self {
            LeaveStatus::Approved => 0,
            LeaveStatus::Pending => 1,
            LeaveStatus::Rejected => 2,
            LeaveStatus::Cancelled => 3,
        }
    }
}

impl<'de> Deserialize<'de> for LeaveStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Code(i64),
            Name(String),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Code(code) => LeaveStatus::from_code(code).unwrap_or(LeaveStatus::Pending),
            Repr::Name(name) => LeaveStatus::from_name(&name),
        })
    }
}

impl Serialize for LeaveStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HalfDayType {
    Morning,
    Afternoon,
}

/// A public holiday. Global, not per-user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holiday {
    pub date: NaiveDate,
    pub title: String,
}

/// The reconciled state of one calendar cell. Derived on every build,
/// never persisted. A day can carry a holiday and a leave at once; `kind`
/// is the primary marker and the references let the view render the rest.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayStatus {
    pub date: NaiveDate,
    pub kind: DayKind,
    pub attendance: Option<AttendanceRecord>,
    pub leave: Option<LeaveApplication>,
    pub holiday: Option<Holiday>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DayKind {
    Present,
    Absent,
    Late,
    HalfDay,
    LeaveApproved,
    LeavePending,
    LeaveRejected,
    Holiday,
}

impl DayKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DayKind::Present => "present",
            DayKind::Absent => "absent",
            DayKind::Late => "late",
            DayKind::HalfDay => "half day",
            DayKind::LeaveApproved => "leave approved",
            DayKind::LeavePending => "leave pending",
            DayKind::LeaveRejected => "leave rejected",
            DayKind::Holiday => "holiday",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_status_accepts_numeric_and_string_encodings() {
        // The leave API mixes both; they must come out identical.
        let from_code: LeaveStatus = serde_json::from_str("2").unwrap();
        let from_name: LeaveStatus = serde_json::from_str("\"approved\"").unwrap();
        assert_eq!(from_code, LeaveStatus::Approved);
        assert_eq!(from_code, from_name);

        let from_code: LeaveStatus = serde_json::from_str("4").unwrap();
        let from_name: LeaveStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(from_code, LeaveStatus::Cancelled);
        assert_eq!(from_code, from_name);

        // Both always re-serialize to the string form.
        assert_eq!(serde_json::to_string(&from_code).unwrap(), "\"cancelled\"");
    }

    #[test]
    fn unrecognized_status_normalizes_to_pending() {
        assert_eq!(serde_json::from_str::<LeaveStatus>("9").unwrap(), LeaveStatus::Pending);
        assert_eq!(
            serde_json::from_str::<LeaveStatus>("\"awaiting\"").unwrap(),
            LeaveStatus::Pending
        );
        assert_eq!(LeaveStatus::from_name(" Approved "), LeaveStatus::Approved);
    }

    #[test]
    fn leave_application_parses_camel_case_payload() {
        let payload = r#"{
            "id": "lv-101",
            "userId": "u-7",
            "startDate": "2025-03-10",
            "endDate": "2025-03-12",
            "status": "pending",
            "halfDay": "morning",
            "reason": "personal",
            "appliedAt": "2025-03-01T09:30:00Z"
        }"#;
        let leave: LeaveApplication = serde_json::from_str(payload).unwrap();
        assert_eq!(leave.user_id, "u-7");
        assert_eq!(leave.status, LeaveStatus::Pending);
        assert_eq!(leave.half_day, Some(HalfDayType::Morning));
        assert_eq!(leave.rejection_reason, None);
        assert_eq!(
            leave.end_date.signed_duration_since(leave.start_date).num_days(),
            2
        );
    }

    #[test]
    fn attendance_record_tolerates_missing_optional_fields() {
        let payload = r#"{
            "date": "2025-03-10",
            "sessions": [
                { "checkIn": "2025-03-10T03:30:00Z", "checkOut": "2025-03-10T07:30:00Z" },
                { "checkIn": "2025-03-10T08:30:00Z" }
            ]
        }"#;
        let record: AttendanceRecord = serde_json::from_str(payload).unwrap();
        assert_eq!(record.sessions.len(), 2);
        assert!(record.sessions[1].check_out.is_none());
        assert_eq!(record.status, None);
        assert_eq!(record.total_hours, None);
    }
}
