//! Background runner for the scheduled inventory push.

use std::io;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{info, warn};

use ecomsync_sync::{ErpGateway, InventoryPlatform, InventorySync, RunOutcome, SyncError, SyncLog};

/// Config for the inventory sync runner.
#[derive(Debug, Clone)]
pub struct InventorySyncRunner {
    /// How often the scheduled entry point is invoked. Whether a push actually
    /// happens is still decided by the run-frequency gate.
    pub interval: Duration,
}

impl Default for InventorySyncRunner {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60),
        }
    }
}

/// Handle for the running thread (shutdown + manual trigger).
#[derive(Debug)]
pub struct InventorySyncRunnerHandle {
    shutdown: mpsc::Sender<()>,
    trigger: mpsc::SyncSender<()>,
    completed: Arc<AtomicU64>,
    join: Option<thread::JoinHandle<()>>,
}

impl InventorySyncRunnerHandle {
    /// Request an ungated run. Triggers coalesce while one is already pending.
    pub fn trigger(&self) {
        let _ = self.trigger.try_send(());
    }

    /// Number of runs finished so far, whatever their outcome.
    pub fn completed_runs(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Stop the thread and wait for it. An in-flight run finishes first.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }

    /// Block on the runner thread. It only exits on its own if it panics.
    pub fn wait(mut self) {
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

enum Pending {
    Scheduled,
    Manual,
}

impl InventorySyncRunner {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Spawn the runner thread. Runs the scheduled entry point once on start,
    /// then on every tick; `handle.trigger()` runs the manual one.
    pub fn spawn<E, P, L>(
        &self,
        name: &'static str,
        sync: InventorySync<E, P, L>,
    ) -> io::Result<InventorySyncRunnerHandle>
    where
        E: ErpGateway + Send + 'static,
        P: InventoryPlatform + Send + 'static,
        L: SyncLog + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let (trigger_tx, trigger_rx) = mpsc::sync_channel::<()>(1);
        let completed = Arc::new(AtomicU64::new(0));

        let interval = self.interval;
        let counter = Arc::clone(&completed);
        let join = thread::Builder::new().name(name.to_string()).spawn(move || {
            runner_loop(name, interval, sync, shutdown_rx, trigger_rx, counter)
        })?;

        Ok(InventorySyncRunnerHandle {
            shutdown: shutdown_tx,
            trigger: trigger_tx,
            completed,
            join: Some(join),
        })
    }
}

fn runner_loop<E, P, L>(
    name: &'static str,
    interval: Duration,
    sync: InventorySync<E, P, L>,
    shutdown_rx: mpsc::Receiver<()>,
    trigger_rx: mpsc::Receiver<()>,
    completed: Arc<AtomicU64>,
) where
    E: ErpGateway,
    P: InventoryPlatform,
    L: SyncLog,
{
    info!(runner = name, interval_secs = interval.as_secs(), "inventory sync runner started");

    let mut next_tick = Instant::now() + interval;
    let mut pending = Some(Pending::Scheduled);

    loop {
        let now = Instant::now();
        if now >= next_tick {
            pending.get_or_insert(Pending::Scheduled);
            while next_tick <= now {
                next_tick += interval;
            }
        }

        // Manual wins over scheduled: it would do the same work, ungated.
        if trigger_rx.try_recv().is_ok() {
            pending = Some(Pending::Manual);
        }

        match pending.take() {
            Some(Pending::Scheduled) => report(name, "scheduled", sync.run_scheduled()),
            Some(Pending::Manual) => report(name, "manual", sync.run_now()),
            None => {
                let wait = next_tick
                    .saturating_duration_since(Instant::now())
                    .min(Duration::from_millis(250));
                match shutdown_rx.recv_timeout(wait) {
                    Ok(()) | Err(mpsc::RecvTimeoutError::Disconnected) => break,
                    Err(mpsc::RecvTimeoutError::Timeout) => continue,
                }
            }
        }
        completed.fetch_add(1, Ordering::SeqCst);

        if shutdown_rx.try_recv().is_ok() {
            break;
        }
    }

    info!(runner = name, "inventory sync runner stopped");
}

fn report(name: &str, trigger: &str, result: Result<RunOutcome, SyncError>) {
    match result {
        Ok(RunOutcome::Pushed(report)) => info!(
            runner = name,
            trigger,
            batches = report.batches,
            rows = report.rows,
            succeeded = report.succeeded,
            failed = report.failed,
            not_found = report.not_found,
            "inventory push finished"
        ),
        Ok(outcome) => info!(runner = name, trigger, outcome = ?outcome, "inventory push skipped"),
        Err(e) => warn!(runner = name, trigger, error = %e, "inventory push failed"),
    }
}
