//! Event-driven rebuilds of the displayed month.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, warn};

use super::builder::{CalendarService, MonthView};

/// Which kind of external mutation happened upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Attendance,
    Leave,
}

/// The `(user, year, month)` triple currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewTarget {
    pub user_id: String,
    pub year: i32,
    pub month: u32,
}

impl ViewTarget {
    pub fn new(user_id: impl Into<String>, year: i32, month: u32) -> Self {
        ViewTarget {
            user_id: user_id.into(),
            year,
            month,
        }
    }
}

/// How long each event kind is allowed to settle before the rebuild.
/// Leave decisions propagate through the upstream store with a short
/// lag, so they wait a beat; attendance events rebuild immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshPolicy {
    pub attendance_debounce: Duration,
    pub leave_debounce: Duration,
}

impl Default for RefreshPolicy {
    fn default() -> Self {
        RefreshPolicy {
            attendance_debounce: Duration::ZERO,
            leave_debounce: Duration::from_millis(1000),
        }
    }
}

impl RefreshPolicy {
    fn debounce_for(&self, kind: ChangeKind) -> Duration {
        match kind {
            ChangeKind::Attendance => self.attendance_debounce,
            ChangeKind::Leave => self.leave_debounce,
        }
    }
}

enum Command {
    Notify(ChangeKind),
    Display(ViewTarget),
    Shutdown,
}

/// Owns the coordinating task that turns change notifications and
/// navigation into rebuilds. Consumers watch the published views through
/// `subscribe`; dropping a receiver unsubscribes it, dropping the
/// controller aborts the task and discards in-flight rebuilds.
pub struct RefreshController {
    commands: mpsc::UnboundedSender<Command>,
    views: watch::Receiver<Option<Arc<MonthView>>>,
    generation: Arc<AtomicU64>,
    task: Option<JoinHandle<()>>,
}

impl RefreshController {
    /// Starts the coordinating task and immediately builds the initial
    /// target.
    pub fn spawn(service: CalendarService, policy: RefreshPolicy, initial: ViewTarget) -> Self {
        let (commands, command_rx) = mpsc::unbounded_channel();
        let (views_tx, views_rx) = watch::channel(None);
        let generation = Arc::new(AtomicU64::new(0));
        let task = tokio::spawn(run(
            service,
            policy,
            initial,
            command_rx,
            Arc::new(views_tx),
            Arc::clone(&generation),
        ));
        RefreshController {
            commands,
            views: views_rx,
            generation,
            task: Some(task),
        }
    }

    /// External mutation intake. Events arriving within the debounce
    /// window coalesce into a single rebuild at the earliest pending
    /// deadline.
    pub fn notify(&self, kind: ChangeKind) {
        let _ = self.commands.send(Command::Notify(kind));
    }

    /// Navigation: retarget the controller and rebuild right away,
    /// dropping any pending debounce for the month being left.
    pub fn display(&self, user_id: impl Into<String>, year: i32, month: u32) {
        let _ = self
            .commands
            .send(Command::Display(ViewTarget::new(user_id, year, month)));
    }

    /// Watch wholesale view replacements. Starts at `None` until the
    /// first build publishes.
    pub fn subscribe(&self) -> watch::Receiver<Option<Arc<MonthView>>> {
        self.views.clone()
    }

    /// Stops the coordinating task and waits for it to exit. A rebuild
    /// still in flight keeps running but its result is discarded; nothing
    /// publishes after this returns.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for RefreshController {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
        self.generation.fetch_add(1, Ordering::SeqCst);
    }
}

async fn run(
    service: CalendarService,
    policy: RefreshPolicy,
    mut target: ViewTarget,
    mut commands: mpsc::UnboundedReceiver<Command>,
    views: Arc<watch::Sender<Option<Arc<MonthView>>>>,
    generation: Arc<AtomicU64>,
) {
    let mut deadline: Option<Instant> = None;

    start_rebuild(&service, &target, &generation, &views);

    loop {
        let debounce = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = commands.recv() => match command {
                Some(Command::Notify(kind)) => {
                    let at = Instant::now() + policy.debounce_for(kind);
                    // Earliest deadline wins, so an immediate kind pulls
                    // a pending slow rebuild forward instead of queueing
                    // a second one.
                    deadline = Some(deadline.map_or(at, |current| current.min(at)));
                }
                Some(Command::Display(next)) => {
                    target = next;
                    deadline = None;
                    start_rebuild(&service, &target, &generation, &views);
                }
                Some(Command::Shutdown) | None => break,
            },
            _ = debounce => {
                deadline = None;
                start_rebuild(&service, &target, &generation, &views);
            }
        }
    }

    // A final bump invalidates any rebuild still in flight.
    generation.fetch_add(1, Ordering::SeqCst);
}

/// Kicks off one rebuild without blocking the command loop. Every
/// rebuild takes the next generation; the result publishes only while
/// still the newest, so a slow superseded fetch can never overwrite a
/// fresher view. Superseded fetches are not cancelled, just discarded.
fn start_rebuild(
    service: &CalendarService,
    target: &ViewTarget,
    generation: &Arc<AtomicU64>,
    views: &Arc<watch::Sender<Option<Arc<MonthView>>>>,
) {
    let service = service.clone();
    let target = target.clone();
    let generation = Arc::clone(generation);
    let views = Arc::clone(views);
    let my_generation = generation.fetch_add(1, Ordering::SeqCst) + 1;

    tokio::spawn(async move {
        match service
            .build_month(&target.user_id, target.year, target.month)
            .await
        {
            Ok(view) => {
                let published = views.send_if_modified(|slot| {
                    if generation.load(Ordering::SeqCst) == my_generation {
                        *slot = Some(Arc::new(view));
                        true
                    } else {
                        false
                    }
                });
                if !published {
                    debug!(
                        "discarding superseded rebuild of {}-{:02}",
                        target.year, target.month
                    );
                }
            }
            Err(err) => warn!(
                "rebuild of {}-{:02} failed: {}",
                target.year, target.month, err
            ),
        }
    });
}
