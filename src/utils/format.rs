use chrono::{DateTime, Duration, Utc, Weekday};

use crate::calendar::builder::MonthView;
use crate::calendar::sessions::DayLog;
use crate::model::DayKind;
use crate::utils::time::{ist_offset, weekday_short_name};

/// `H:MM:SS`, zero-padded minutes and seconds, truncated to the second.
pub fn format_hms(duration: Duration) -> String {
    let secs = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", secs / 3600, (secs % 3600) / 60, secs % 60)
}

/// Wall-clock time of an instant at the organization's timezone.
pub fn format_time_ist(instant: DateTime<Utc>) -> String {
    instant
        .with_timezone(&ist_offset())
        .format("%H:%M:%S")
        .to_string()
}

pub fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "?",
    }
}

/// One day of history as indented text: each session span with its
/// duration, the break after it, then the day total.
pub fn format_day_log(log: &DayLog) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", log.date.format("%Y-%m-%d (%a)")));
    if log.sessions.is_empty() {
        out.push_str("  no sessions recorded\n");
        return out;
    }

    for (index, span) in log.sessions.iter().enumerate() {
        let end = match (span.check_out, span.elapsed) {
            (Some(check_out), _) => format_time_ist(check_out),
            (None, Some(elapsed)) => format!("in progress ({})", format_hms(elapsed)),
            (None, None) => "in progress".to_string(),
        };
        out.push_str(&format!(
            "  #{} {} -> {}",
            index + 1,
            format_time_ist(span.check_in),
            end
        ));
        if let Some(duration) = span.duration {
            out.push_str(&format!(" ({})", format_hms(duration)));
        }
        out.push('\n');
        if let Some(Some(gap)) = log.breaks.get(index) {
            out.push_str(&format!("     break {}\n", format_hms(*gap)));
        }
    }

    out.push_str(&format!("  total {}\n", format_hms(log.total)));
    out
}

/// The month as a Sunday-first text grid, one marker character per
/// resolved day, with today and any fetch failures noted underneath.
pub fn format_month_grid(view: &MonthView) -> String {
    let mut out = String::new();
    let title = format!("{} {}", month_name(view.month), view.year);
    out.push_str(&format!("{:^28}\n", title));
    let mut weekday = Weekday::Sun;
    for _ in 0..7 {
        out.push_str(&format!("{:>3} ", weekday_short_name(weekday)));
        weekday = weekday.succ();
    }
    out.push('\n');

    for (index, cell) in view.cells().enumerate() {
        let index = index as u32;
        let in_month = index >= view.leading_blanks
            && index < view.leading_blanks + view.days_in_month;
        if in_month {
            let day = index - view.leading_blanks + 1;
            let marker = cell.map(|status| day_marker(status.kind)).unwrap_or(' ');
            out.push_str(&format!("{:>3}{}", day, marker));
        } else {
            out.push_str("    ");
        }
        if index % 7 == 6 {
            out.push('\n');
        }
    }

    if let Some(today) = view.today {
        out.push_str(&format!("today: {}\n", today));
    }
    for error in &view.errors {
        out.push_str(&format!("! {}\n", error));
    }
    out
}

fn day_marker(kind: DayKind) -> char {
    match kind {
        DayKind::Present => '+',
        DayKind::Absent => '-',
        DayKind::Late => 'L',
        DayKind::HalfDay => '/',
        DayKind::LeaveApproved => 'A',
        DayKind::LeavePending => 'P',
        DayKind::LeaveRejected => 'R',
        DayKind::Holiday => 'H',
    }
}

/// Legend for the grid markers, one line.
pub fn marker_legend() -> String {
    [
        DayKind::Present,
        DayKind::Absent,
        DayKind::Late,
        DayKind::HalfDay,
        DayKind::LeaveApproved,
        DayKind::LeavePending,
        DayKind::LeaveRejected,
        DayKind::Holiday,
    ]
    .iter()
    .map(|kind| format!("{} {}", day_marker(*kind), kind.as_str()))
    .collect::<Vec<_>>()
    .join("  ")
}
