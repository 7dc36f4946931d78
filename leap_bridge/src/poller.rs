//! The fixed-rate polling task.
//!
//! The tracking service does not deliver reliable push notifications in this
//! environment, so polling is the explicit fallback: a worker thread asks
//! the source for the latest frame at a fixed interval and applies it to the
//! scene.  Commands arrive over a channel and are drained at the top of each
//! cycle, which is also the cooperative cancellation point.
//!
//! A failing source never stops the loop silently: the failure is logged,
//! reported to the UI, and the next cycle is scheduled regardless.

use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use log::{debug, error, info};
use ras_scene::SharedScene;

use crate::bridge::{apply_frame, FrameStats};
use crate::tracking::TrackingSource;

// ════════════════════════════════════════════════════════════════════════════
// Config
// ════════════════════════════════════════════════════════════════════════════

/// How often the source is polled unless configured otherwise.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Clone, Copy, Debug)]
pub struct PollerConfig {
    pub interval:    Duration,
    /// Create missing transform nodes instead of skipping their fingers.
    pub auto_create: bool,
}

impl Default for PollerConfig {
    fn default() -> Self {
        PollerConfig {
            interval:    DEFAULT_POLL_INTERVAL,
            auto_create: false,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Commands and reports
// ════════════════════════════════════════════════════════════════════════════

enum PollerCommand {
    /// Flip the create-vs-skip policy, effective from the next cycle.
    SetAutoCreate(bool),
    /// Stop the loop.
    Shutdown,
}

/// Summary of one polling cycle, sent back for the status line.
#[derive(Clone, Debug, Default)]
pub struct CycleReport {
    pub stats:       FrameStats,
    pub hands:       usize,
    pub auto_create: bool,
    /// Set when the tracking source failed this cycle.  The loop keeps
    /// scheduling regardless.
    pub error:       Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Poller — handle to the polling thread
// ════════════════════════════════════════════════════════════════════════════

/// Handle to the polling thread.
///
/// Created once at startup and kept for the life of the process; the UI
/// talks to this handle instead of ever constructing a second loop.
pub struct Poller {
    cmd_tx:    Sender<PollerCommand>,
    report_rx: Receiver<CycleReport>,
    handle:    Option<JoinHandle<()>>,
}

impl Poller {
    /// Spawn the polling thread over `source`, writing into `scene`.
    pub fn spawn<S>(source: S, scene: SharedScene, cfg: PollerConfig) -> Self
    where
        S: TrackingSource + 'static,
    {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (report_tx, report_rx) = mpsc::channel();

        let handle = thread::spawn(move || {
            poll_loop(source, scene, cfg, cmd_rx, report_tx);
        });

        Poller {
            cmd_tx,
            report_rx,
            handle: Some(handle),
        }
    }

    /// Change the auto-create policy from the next cycle onward.  Nodes that
    /// already exist are unaffected either way.
    pub fn set_auto_create(&self, enable: bool) {
        let _ = self.cmd_tx.send(PollerCommand::SetAutoCreate(enable));
    }

    /// Drain any pending cycle reports (non-blocking).
    pub fn drain_reports(&self) -> Vec<CycleReport> {
        let mut out = Vec::new();
        while let Ok(report) = self.report_rx.try_recv() {
            out.push(report);
        }
        out
    }

    /// Stop the loop and wait for the thread to exit.
    pub fn shutdown(mut self) {
        let _ = self.cmd_tx.send(PollerCommand::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        // Dropping the handle still stops the loop; shutdown() is the
        // explicit path that additionally joins the thread.
        let _ = self.cmd_tx.send(PollerCommand::Shutdown);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// poll_loop — the actual cycle
// ════════════════════════════════════════════════════════════════════════════

fn poll_loop<S: TrackingSource>(
    mut source: S,
    scene: SharedScene,
    cfg: PollerConfig,
    cmd_rx: Receiver<PollerCommand>,
    report_tx: Sender<CycleReport>,
) {
    let mut auto_create = cfg.auto_create;
    let mut failing = false;

    info!(
        "polling every {:?} (auto-create: {})",
        cfg.interval, auto_create
    );

    loop {
        // ── drain commands — the cancellation point ──────────────────────
        loop {
            match cmd_rx.try_recv() {
                Ok(PollerCommand::SetAutoCreate(enable)) => {
                    info!("auto-create transforms: {}", enable);
                    auto_create = enable;
                }
                Ok(PollerCommand::Shutdown) => return,
                Err(TryRecvError::Empty) => break,
                // Every handle is gone; nobody could stop us later.
                Err(TryRecvError::Disconnected) => return,
            }
        }

        // ── poll and apply ───────────────────────────────────────────────
        let report = match source.current_frame() {
            Ok(frame) => {
                if failing {
                    info!("tracking source recovered");
                    failing = false;
                }
                let stats = match scene.lock() {
                    Ok(mut guard) => apply_frame(&mut *guard, &frame, auto_create),
                    Err(_) => {
                        error!("scene lock poisoned; stopping poller");
                        return;
                    }
                };
                debug!(
                    "cycle: hands={} updated={} created={} skipped={}",
                    frame.hands.len(),
                    stats.updated,
                    stats.created,
                    stats.skipped
                );
                CycleReport {
                    stats,
                    hands: frame.hands.len(),
                    auto_create,
                    error: None,
                }
            }
            Err(e) => {
                if !failing {
                    error!("tracking source failed: {} (still polling)", e);
                    failing = true;
                }
                CycleReport {
                    auto_create,
                    error: Some(e.to_string()),
                    ..CycleReport::default()
                }
            }
        };
        let _ = report_tx.send(report);

        thread::sleep(cfg.interval);
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
