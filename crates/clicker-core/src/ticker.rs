//! Background autoclick stepper.
//!
//! The ticker polls the session at a fixed interval (100ms by default) and
//! applies an autoclick tick whenever one is due, so the effective tick
//! period is the engine's delay rounded up to the poll granularity. Each
//! poll takes the session lock once; a tick never interleaves with a
//! click or a purchase.
//!
//! [`TickerControl`] is the shared handle used to pause, resume, and stop
//! the loop from other tasks.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::session::GameSession;

/// Shared control state for a running ticker.
#[derive(Debug)]
pub struct TickerControl {
    paused: AtomicBool,
    stop_requested: AtomicBool,
    wake: Notify,
    poll_interval: Duration,
}

impl TickerControl {
    /// Create control state for a ticker polling every `poll_interval`.
    pub fn new(poll_interval: Duration) -> Self {
        Self {
            paused: AtomicBool::new(false),
            stop_requested: AtomicBool::new(false),
            wake: Notify::new(),
            poll_interval,
        }
    }

    /// How often the ticker checks for a due tick.
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Whether ticking is suspended.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Suspend ticking. Clicks and purchases are unaffected.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume ticking and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake.notify_waiters();
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Ask the ticker to exit after its current poll.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake.notify_waiters();
    }

    /// Whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Wait until `done` holds, re-checking on every wake-up.
    async fn wait_until(&self, done: impl Fn(&Self) -> bool) {
        loop {
            let notified = self.wake.notified();
            tokio::pin!(notified);
            // Register before checking so a wake-up in between is not lost.
            notified.as_mut().enable();
            if done(self) {
                return;
            }
            notified.await;
        }
    }

    /// Resolve once a stop has been requested.
    pub async fn stopped(&self) {
        self.wait_until(Self::is_stop_requested).await;
    }

    /// Return immediately unless paused; otherwise wait for resume or stop.
    pub async fn wait_if_paused(&self) {
        self.wait_until(|c| !c.is_paused() || c.is_stop_requested())
            .await;
    }
}

/// Totals accumulated by a ticker run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickerReport {
    /// Number of polls performed.
    pub polls: u64,
    /// Number of polls on which a tick was due and applied.
    pub ticks_applied: u64,
    /// Points awarded by applied ticks.
    pub points_awarded: u64,
}

/// Run the autoclick loop until a stop is requested.
///
/// With `autosave_every` set, the session is also saved whenever that much
/// time has passed since the last save. Save failures are logged and the
/// loop keeps running.
pub async fn run_ticker(
    session: Arc<GameSession>,
    control: Arc<TickerControl>,
    autosave_every: Option<Duration>,
) -> TickerReport {
    let mut report = TickerReport::default();
    let mut interval = tokio::time::interval(control.poll_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last_save = tokio::time::Instant::now();

    info!(
        poll_interval_ms = control.poll_interval().as_millis(),
        autosave_seconds = autosave_every.map(|d| d.as_secs()),
        "Ticker started"
    );

    loop {
        tokio::select! {
            () = control.stopped() => break,
            _ = interval.tick() => {}
        }
        control.wait_if_paused().await;
        if control.is_stop_requested() {
            break;
        }

        report.polls = report.polls.saturating_add(1);
        if let Some(bonus) = session.try_auto_tick(std::time::Instant::now()).await {
            report.ticks_applied = report.ticks_applied.saturating_add(1);
            report.points_awarded = report.points_awarded.saturating_add(bonus);
        }

        if let Some(every) = autosave_every {
            if last_save.elapsed() >= every {
                if let Err(e) = session.autosave().await {
                    warn!(error = %e, "Autosave failed");
                }
                last_save = tokio::time::Instant::now();
            }
        }
    }

    info!(
        polls = report.polls,
        ticks_applied = report.ticks_applied,
        points_awarded = report.points_awarded,
        "Ticker stopped"
    );
    report
}

/// Spawn [`run_ticker`] on the Tokio runtime.
pub fn spawn_ticker(
    session: Arc<GameSession>,
    control: Arc<TickerControl>,
    autosave_every: Option<Duration>,
) -> JoinHandle<TickerReport> {
    tokio::spawn(run_ticker(session, control, autosave_every))
}
