//! Application wiring: one scene, one tracking source, one poller, one
//! viewer window, and the event/render loop connecting them.
//!
//! The poller is created exactly once at startup; the control surface (the
//! viewer's `C` key) only ever talks to its handle.

use std::sync::mpsc;
use std::time::Duration;

use log::info;
use ras_scene::shared_scene;
use thiserror::Error;

use crate::poller::{Poller, PollerConfig, DEFAULT_POLL_INTERVAL};
use crate::tracking::TrackingError;
use crate::viewer::{UiRequest, Viewer};

#[cfg(feature = "leap")]
use crate::tracking::LeapTrackingSource;
#[cfg(not(feature = "leap"))]
use crate::tracking::SimTrackingSource;

// ════════════════════════════════════════════════════════════════════════════
// AppConfig
// ════════════════════════════════════════════════════════════════════════════

/// Configuration for the full application.
#[derive(Clone, Copy, Debug)]
pub struct AppConfig {
    /// Create missing transform nodes instead of skipping their fingers.
    pub auto_create: bool,
    /// Polling interval for the tracking source.
    pub interval:    Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            auto_create: false,
            interval:    DEFAULT_POLL_INTERVAL,
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════
// AppError
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum AppError {
    #[error("viewer window: {0}")]
    Window(String),

    #[error("tracking source: {0}")]
    Tracking(#[from] TrackingError),
}

// ════════════════════════════════════════════════════════════════════════════
// run() — the main application loop
// ════════════════════════════════════════════════════════════════════════════

/// Run the full application.
///
/// Builds the shared scene, picks the tracking source for the build
/// (hardware with the `leap` feature, mouse simulation otherwise), spawns
/// the polling task, opens the viewer and drives the event/render loop until
/// the window closes or `Q` is pressed.
pub fn run(cfg: AppConfig) -> Result<(), AppError> {
    let scene = shared_scene();

    // The viewer always produces SimInput; in hardware mode the channel
    // simply goes unread.
    let (sim_tx, sim_rx) = mpsc::channel();

    #[cfg(not(feature = "leap"))]
    let source = SimTrackingSource::new(sim_rx);
    #[cfg(feature = "leap")]
    let source = {
        drop(sim_rx);
        LeapTrackingSource::connect()?
    };

    let poller = Poller::spawn(
        source,
        scene.clone(),
        PollerConfig {
            interval:    cfg.interval,
            auto_create: cfg.auto_create,
        },
    );

    let mut viewer = Viewer::new(sim_tx).map_err(AppError::Window)?;

    let mut auto_create = cfg.auto_create;
    let mut status = String::from("waiting for tracking data");
    let mut error: Option<String> = None;

    'main: while viewer.is_open() {
        // 1. Input → control requests (sim inputs went out on the channel)
        for request in viewer.poll_input() {
            match request {
                UiRequest::Quit => break 'main,
                UiRequest::ToggleAutoCreate => {
                    auto_create = !auto_create;
                    poller.set_auto_create(auto_create);
                }
            }
        }

        // 2. Latest cycle report → status line
        if let Some(report) = poller.drain_reports().into_iter().last() {
            error = report.error;
            if error.is_none() {
                status = format!(
                    "hands={}  updated={}  created={}  skipped={}",
                    report.hands,
                    report.stats.updated,
                    report.stats.created,
                    report.stats.skipped,
                );
            }
        }

        // 3. Render a scene snapshot
        match scene.lock() {
            Ok(guard) => viewer.render(&guard, &status, auto_create, error.as_deref()),
            Err(_) => break 'main,
        }
    }

    poller.shutdown();
    info!("shut down cleanly");
    Ok(())
}
