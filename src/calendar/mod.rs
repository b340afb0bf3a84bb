//! The reconciliation engine: session arithmetic, leave expansion,
//! per-day resolution, month assembly, and event-driven refresh.

pub mod builder;
pub mod expand;
pub mod refresh;
pub mod resolve;
pub mod sessions;


pub use builder::{CalendarService, MonthView};
pub use refresh::{ChangeKind, RefreshController, RefreshPolicy, ViewTarget};
pub use sessions::{DayLog, SessionSpan};
