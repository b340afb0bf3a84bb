//! Per-day session arithmetic: session durations, inter-session breaks,
//! worked totals, and the day log the history view renders.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tracing::warn;

use crate::clock::Clock;
use crate::error::CalendarError;
use crate::model::Session;

/// Duration of each session in record order. Closed sessions get
/// `check_out - check_in` exactly; an open session gets `None` and is
/// rendered as in progress. A closed session running backwards is
/// corrupt upstream data and fails the whole day's computation, never a
/// silent negative duration.
pub fn session_durations(sessions: &[Session]) -> Result<Vec<Option<Duration>>, CalendarError> {
    sessions
        .iter()
        .map(|session| match session.check_out {
            Some(check_out) if check_out < session.check_in => {
                Err(CalendarError::MalformedSession {
                    check_in: session.check_in,
                    check_out,
                })
            }
            Some(check_out) => Ok(Some(check_out - session.check_in)),
            None => Ok(None),
        })
        .collect()
}

/// Idle time between each adjacent pair of sessions, `len - 1` entries.
/// A break only exists when the earlier session has closed; an overlap
/// (next check-in before the previous check-out) is logged and yields
/// `None` rather than a negative break.
pub fn break_durations(sessions: &[Session]) -> Vec<Option<Duration>> {
    sessions
        .windows(2)
        .map(|pair| match pair[0].check_out {
            Some(check_out) if pair[1].check_in < check_out => {
                warn!(
                    "overlapping sessions: next check-in {} before check-out {}",
                    pair[1].check_in, check_out
                );
                None
            }
            Some(check_out) => Some(pair[1].check_in - check_out),
            None => None,
        })
        .collect()
}

/// Sum of closed-session durations. An open session contributes nothing
/// until it closes.
pub fn total_worked(sessions: &[Session]) -> Result<Duration, CalendarError> {
    let durations = session_durations(sessions)?;
    Ok(durations
        .into_iter()
        .flatten()
        .fold(Duration::zero(), |total, d| total + d))
}

/// One day of attendance history: every session span, the breaks between
/// them, and the worked total.
#[derive(Debug, Clone, PartialEq)]
pub struct DayLog {
    pub date: NaiveDate,
    pub sessions: Vec<SessionSpan>,
    pub breaks: Vec<Option<Duration>>,
    pub total: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SessionSpan {
    pub check_in: DateTime<Utc>,
    pub check_out: Option<DateTime<Utc>>,
    /// `None` while the session is open.
    pub duration: Option<Duration>,
    /// Time accrued so far by an open session, for display only; never
    /// part of `DayLog::total`.
    pub elapsed: Option<Duration>,
}

/// Assembles the history record for one day. The clock only feeds the
/// elapsed-so-far figure of an open session.
pub fn day_log(
    date: NaiveDate,
    sessions: &[Session],
    clock: &dyn Clock,
) -> Result<DayLog, CalendarError> {
    let durations = session_durations(sessions)?;
    let breaks = break_durations(sessions);
    let total = durations
        .iter()
        .flatten()
        .fold(Duration::zero(), |total, d| total + *d);

    let now = clock.now_utc();
    let spans = sessions
        .iter()
        .zip(durations)
        .map(|(session, duration)| SessionSpan {
            check_in: session.check_in,
            check_out: session.check_out,
            duration,
            elapsed: match session.check_out {
                Some(_) => None,
                None => Some((now - session.check_in).max(Duration::zero())),
            },
        })
        .collect();

    Ok(DayLog {
        date,
        sessions: spans,
        breaks,
        total,
    })
}
