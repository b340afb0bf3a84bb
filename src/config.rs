use anyhow::Result;
use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: String,
    pub data_dir: String,
    /// Displayed year/month; the current IST month when unset.
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub leave_debounce_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let user_id = env::var("CALENDAR_USER")
            .map_err(|_| anyhow::anyhow!("CALENDAR_USER environment variable is required"))?;

        let data_dir = env::var("CALENDAR_DATA_DIR").unwrap_or_else(|_| "data".to_string());

        let year = parse_optional("CALENDAR_YEAR")?;
        let month = parse_optional("CALENDAR_MONTH")?;
        let leave_debounce_ms = parse_optional("CALENDAR_LEAVE_DEBOUNCE_MS")?.unwrap_or(1000);

        Ok(Config {
            user_id,
            data_dir,
            year,
            month,
            leave_debounce_ms,
        })
    }
}

fn parse_optional<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match env::var(name) {
        Ok(raw) => raw
            .parse::<T>()
            .map(Some)
            .map_err(|_| anyhow::anyhow!("{} must be a number, got {:?}", name, raw)),
        Err(_) => Ok(None),
    }
}
