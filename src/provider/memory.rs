use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use super::{AttendanceProvider, FetchError, FetchResult, HolidayProvider, LeaveProvider};
use crate::error::FetchSource;
use crate::model::{AttendanceRecord, Holiday, LeaveApplication};

/// In-memory feed backed by plain vectors. Lets tests swap records
/// between refreshes, break one source at a time, slow a single fetch
/// down, and count how often each feed was hit.
#[derive(Default)]
pub struct MemoryProvider {
    state: Mutex<State>,
    attendance_fetches: AtomicUsize,
    leave_fetches: AtomicUsize,
}

#[derive(Default)]
struct State {
    attendance: Vec<AttendanceRecord>,
    leaves: Vec<LeaveApplication>,
    holidays: Vec<Holiday>,
    failing: Vec<FetchSource>,
    attendance_delay: Option<Duration>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_attendance(&self, records: Vec<AttendanceRecord>) {
        self.state.lock().await.attendance = records;
    }

    pub async fn set_leaves(&self, leaves: Vec<LeaveApplication>) {
        self.state.lock().await.leaves = leaves;
    }

    pub async fn set_holidays(&self, holidays: Vec<Holiday>) {
        self.state.lock().await.holidays = holidays;
    }

    /// Make the listed feeds return errors until replaced; an empty list
    /// clears the failures.
    pub async fn fail_sources(&self, sources: Vec<FetchSource>) {
        self.state.lock().await.failing = sources;
    }

    /// Stall only the next attendance fetch. Later fetches run at full
    /// speed, which is how tests race a slow rebuild against a fresh one.
    pub async fn delay_next_attendance(&self, delay: Duration) {
        self.state.lock().await.attendance_delay = Some(delay);
    }

    pub fn attendance_fetch_count(&self) -> usize {
        self.attendance_fetches.load(Ordering::SeqCst)
    }

    pub fn leave_fetch_count(&self) -> usize {
        self.leave_fetches.load(Ordering::SeqCst)
    }

    async fn check_failing(&self, source: FetchSource) -> FetchResult<()> {
        if self.state.lock().await.failing.contains(&source) {
            return Err(FetchError::new(format!("{} feed unavailable", source)));
        }
        Ok(())
    }
}

#[async_trait]
impl AttendanceProvider for MemoryProvider {
    async fn fetch_attendance(
        &self,
        _user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<AttendanceRecord>> {
        self.attendance_fetches.fetch_add(1, Ordering::SeqCst);
        let delay = self.state.lock().await.attendance_delay.take();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.check_failing(FetchSource::Attendance).await?;
        let state = self.state.lock().await;
        Ok(state
            .attendance
            .iter()
            .filter(|r| r.date >= start && r.date <= end)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl LeaveProvider for MemoryProvider {
    async fn fetch_leave_applications(
        &self,
        user_id: &str,
    ) -> FetchResult<Vec<LeaveApplication>> {
        self.leave_fetches.fetch_add(1, Ordering::SeqCst);
        self.check_failing(FetchSource::Leave).await?;
        let state = self.state.lock().await;
        Ok(state
            .leaves
            .iter()
            .filter(|l| l.user_id == user_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl HolidayProvider for MemoryProvider {
    async fn fetch_holidays(&self) -> FetchResult<Vec<Holiday>> {
        self.check_failing(FetchSource::Holiday).await?;
        let state = self.state.lock().await;
        Ok(state.holidays.clone())
    }
}
