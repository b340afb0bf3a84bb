mod config;

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Datelike;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use attendance_calendar::calendar::{CalendarService, RefreshController, RefreshPolicy, ViewTarget};
use attendance_calendar::clock::{Clock, SystemClock};
use attendance_calendar::provider::json::JsonProvider;
use attendance_calendar::utils::format::{format_day_log, format_month_grid, marker_legend};
use attendance_calendar::utils::time::{first_of_month, last_of_month};
use config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "attendance_calendar=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let provider = Arc::new(JsonProvider::new(&config.data_dir));
    let clock = Arc::new(SystemClock);
    let today = clock.today_ist();
    let year = config.year.unwrap_or_else(|| today.year());
    let month = config.month.unwrap_or_else(|| today.month());
    let first = first_of_month(year, month).context("invalid month requested")?;
    let last = last_of_month(year, month).context("invalid month requested")?;

    let service = CalendarService::new(
        provider.clone(),
        provider.clone(),
        provider.clone(),
        clock,
    );

    let policy = RefreshPolicy {
        leave_debounce: Duration::from_millis(config.leave_debounce_ms),
        ..RefreshPolicy::default()
    };
    tracing::info!(
        "rendering {}-{:02} for {} from {}",
        year,
        month,
        config.user_id,
        provider.dir().display()
    );

    let controller = RefreshController::spawn(
        service.clone(),
        policy,
        ViewTarget::new(&config.user_id, year, month),
    );
    let mut views = controller.subscribe();
    views
        .changed()
        .await
        .context("calendar task stopped before publishing a view")?;
    let view = views
        .borrow()
        .clone()
        .context("calendar task published nothing")?;

    println!("{}", format_month_grid(&view));
    println!("{}", marker_legend());

    let logs = service.day_logs(&config.user_id, first, last).await;
    match logs {
        Ok(logs) if logs.is_empty() => {}
        Ok(logs) => {
            println!();
            for log in &logs {
                print!("{}", format_day_log(log));
            }
        }
        Err(err) => tracing::warn!("attendance history unavailable: {}", err),
    }

    controller.shutdown().await;
    Ok(())
}
