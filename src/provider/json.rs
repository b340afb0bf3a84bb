use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::de::DeserializeOwned;

use super::{AttendanceProvider, FetchError, FetchResult, HolidayProvider, LeaveProvider};
use crate::model::{AttendanceRecord, Holiday, LeaveApplication};

const ATTENDANCE_FILE: &str = "attendance.json";
const LEAVES_FILE: &str = "leaves.json";
const HOLIDAYS_FILE: &str = "holidays.json";

/// Feed backed by JSON exports in a data directory, one file per source.
/// Each fetch re-reads its file, so edits show up on the next refresh.
/// A missing or unparsable file fails only that source.
pub struct JsonProvider {
    dir: PathBuf,
}

impl JsonProvider {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        JsonProvider { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> FetchResult<Vec<T>> {
        let path = self.dir.join(file);
        let raw = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| FetchError::new(format!("read {}: {}", path.display(), e)))?;
        serde_json::from_str(&raw)
            .map_err(|e| FetchError::new(format!("parse {}: {}", path.display(), e)))
    }
}

#[async_trait]
impl AttendanceProvider for JsonProvider {
    async fn fetch_attendance(
        &self,
        _user_id: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> FetchResult<Vec<AttendanceRecord>> {
        let records: Vec<AttendanceRecord> = self.load(ATTENDANCE_FILE).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.date >= start && r.date <= end)
            .collect())
    }
}

#[async_trait]
impl LeaveProvider for JsonProvider {
    async fn fetch_leave_applications(
        &self,
        user_id: &str,
    ) -> FetchResult<Vec<LeaveApplication>> {
        let leaves: Vec<LeaveApplication> = self.load(LEAVES_FILE).await?;
        Ok(leaves.into_iter().filter(|l| l.user_id == user_id).collect())
    }
}

#[async_trait]
impl HolidayProvider for JsonProvider {
    async fn fetch_holidays(&self) -> FetchResult<Vec<Holiday>> {
        self.load(HOLIDAYS_FILE).await
    }
}
