//! # leap_bridge
//!
//! Bridges a LeapMotion hand-tracking sensor to a scene of named transform
//! nodes: a fixed-rate polling loop reads tracking frames and writes every
//! detected fingertip into its `Hand<h>Finger<f>` node after a device-to-RAS
//! coordinate conversion.
//!
//! ## Pipeline
//!
//! | Stage | Module | What happens |
//! |---|---|---|
//! | Poll | [`poller`] | ask the source for the latest frame, every 100 ms |
//! | Resolve | [`bridge`] | name each finger `Hand<h+1>Finger<f+1>`, find or create its node |
//! | Convert | [`convert`] | device `(x, y, z)` → RAS translation `(-x, z, y)` |
//! | Write | [`bridge`] | overwrite the node's parent-relative transform |
//!
//! Missing nodes are skipped unless auto-create is enabled, and a zero-hand
//! frame is a normal cycle, not an error.  Transforms are translation-only;
//! finger orientation is never captured.
//!
//! ## Feature flags
//!
//! * (default) — **Simulation mode**: the viewer window's mouse drives a
//!   synthetic fingertip; no hardware needed.
//! * `leap` — **Hardware mode**: polls a real LeapMotion controller via
//!   LeapC.
//!
//! ### Viewer keys
//!
//! | Key | Action |
//! |---|---|
//! | Mouse | Move the simulated fingertip |
//! | `F` | Cycle the simulated finger count (1–5) |
//! | `H` | Toggle a mirrored second hand |
//! | `C` | Toggle auto-create transforms |
//! | `Q` / `Esc` | Quit |

pub mod tracking;
pub mod convert;
pub mod bridge;
pub mod poller;
pub mod viewer;
pub mod app;
