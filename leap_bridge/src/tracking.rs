//! Tracking data model and sources — LeapMotion hardware and a mouse-driven
//! simulator.
//!
//! The public interface is [`TrackingSource`]: a pull-based producer of
//! [`Frame`] snapshots.  Consumers never learn whether frames came from real
//! hardware or the simulator.

use std::sync::mpsc::{Receiver, TryRecvError};

use glam::Vec3;
use thiserror::Error;

// ════════════════════════════════════════════════════════════════════════════
// Frame model
// ════════════════════════════════════════════════════════════════════════════

/// One polled snapshot of tracking data.
///
/// Frames are consumed and discarded each cycle; nothing is retained between
/// polls.  Zero hands is a perfectly normal frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    pub hands: Vec<Hand>,
}

impl Frame {
    /// Total fingers across all hands.
    pub fn finger_count(&self) -> usize {
        self.hands.iter().map(|h| h.fingers.len()).sum()
    }
}

/// One detected hand, identified only by its position in the frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Hand {
    pub fingers: Vec<Finger>,
}

/// One finger, exposing its tip in device-native millimeters
/// (x to the operator's right, y up from the sensor, z toward the operator).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Finger {
    pub tip: Vec3,
}

// ════════════════════════════════════════════════════════════════════════════
// Errors
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Error)]
pub enum TrackingError {
    /// The device stopped delivering data.
    #[error("tracking device not connected")]
    Disconnected,

    /// Any other backend failure.
    #[error("tracking backend: {0}")]
    Backend(String),
}

// ════════════════════════════════════════════════════════════════════════════
// TrackingSource trait — unified interface for hw and sim
// ════════════════════════════════════════════════════════════════════════════

/// Pull-based producer of tracking frames.
///
/// The device does not deliver reliable push notifications in this
/// environment, so the poller asks for the latest frame each cycle.
pub trait TrackingSource: Send {
    fn current_frame(&mut self) -> Result<Frame, TrackingError>;
}

// ════════════════════════════════════════════════════════════════════════════
// LeapTrackingSource — real hardware (feature = "leap")
// ════════════════════════════════════════════════════════════════════════════

/// Tracking source backed by a real LeapMotion controller.
///
/// Requires the `leap` feature flag and the LeapC shared library installed.
/// Each call drains whatever the service has queued since the last cycle and
/// keeps the newest tracking event as the current frame; the tip of each
/// digit is the end joint of its distal bone.
#[cfg(feature = "leap")]
pub struct LeapTrackingSource {
    connection:   leaprs::Connection,
    last:         Frame,
    silent_polls: u32,
}

#[cfg(feature = "leap")]
impl LeapTrackingSource {
    /// A live LeapC service streams messages continuously; this many
    /// completely silent polls in a row means the connection is gone.
    const SILENT_POLL_LIMIT: u32 = 50;

    pub fn connect() -> Result<Self, TrackingError> {
        use leaprs::{Connection, ConnectionConfig};

        let mut connection = Connection::create(ConnectionConfig::default())
            .map_err(|e| TrackingError::Backend(format!("{:?}", e)))?;
        connection
            .open()
            .map_err(|e| TrackingError::Backend(format!("{:?}", e)))?;

        Ok(LeapTrackingSource {
            connection,
            last: Frame::default(),
            silent_polls: 0,
        })
    }
}

#[cfg(feature = "leap")]
impl TrackingSource for LeapTrackingSource {
    fn current_frame(&mut self) -> Result<Frame, TrackingError> {
        use leaprs::Event;

        let mut saw_message = false;
        while let Ok(msg) = self.connection.poll(0) {
            saw_message = true;
            if let Event::Tracking(tracking) = msg.event() {
                self.last = Frame {
                    hands: tracking
                        .hands()
                        .map(|hand| Hand {
                            fingers: hand
                                .digits()
                                .map(|digit| {
                                    let tip = digit.distal().next_joint();
                                    Finger {
                                        tip: Vec3::new(tip.x, tip.y, tip.z),
                                    }
                                })
                                .collect(),
                        })
                        .collect(),
                };
            }
        }

        if saw_message {
            self.silent_polls = 0;
        } else {
            self.silent_polls += 1;
            if self.silent_polls >= Self::SILENT_POLL_LIMIT {
                return Err(TrackingError::Disconnected);
            }
        }
        Ok(self.last.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════
// SimTrackingSource — mouse-driven simulation (always available)
// ════════════════════════════════════════════════════════════════════════════

/// Raw input event from the viewer window driving the simulator.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SimInput {
    /// Pointer position, normalized to 0.0–1.0 in window space.
    Pointer { x: f32, y: f32 },
    /// Cycle the simulated finger count 1 → 5 → 1.
    CycleFingers,
    /// Toggle a mirrored second hand.
    ToggleSecondHand,
}

/// Device-space extent the window maps onto, in millimeters.
const SIM_RANGE_X_MM: f32 = 400.0;
const SIM_RANGE_Y_MM: f32 = 400.0;
/// Lateral spacing between simulated fingertips.
const SIM_FINGER_SPREAD_MM: f32 = 18.0;

/// Tracking source fed by [`SimInput`] events from the viewer's window.
///
/// The pointer becomes the hand-1 fingertip; extra fingers fan out beside
/// it, and the optional second hand mirrors the first across the device's
/// vertical plane.  Until a pointer event arrives, frames contain no hands.
pub struct SimTrackingSource {
    rx:           Receiver<SimInput>,
    tip_mm:       Vec3,
    fingers:      usize,
    second_hand:  bool,
    seen_pointer: bool,
}

impl SimTrackingSource {
    pub fn new(rx: Receiver<SimInput>) -> Self {
        SimTrackingSource {
            rx,
            tip_mm: Vec3::ZERO,
            fingers: 1,
            second_hand: false,
            seen_pointer: false,
        }
    }

    fn apply(&mut self, input: SimInput) {
        match input {
            SimInput::Pointer { x, y } => {
                // Window x spans device x; window y (top-down) spans the
                // height above the sensor.
                self.tip_mm = Vec3::new(
                    (x - 0.5) * SIM_RANGE_X_MM,
                    (1.0 - y) * SIM_RANGE_Y_MM,
                    0.0,
                );
                self.seen_pointer = true;
            }
            SimInput::CycleFingers => self.fingers = self.fingers % 5 + 1,
            SimInput::ToggleSecondHand => self.second_hand = !self.second_hand,
        }
    }

    fn hand_at(&self, mirror: f32) -> Hand {
        let fingers = (0..self.fingers)
            .map(|i| Finger {
                tip: Vec3::new(
                    mirror * (self.tip_mm.x + i as f32 * SIM_FINGER_SPREAD_MM),
                    self.tip_mm.y - i as f32 * 4.0,
                    self.tip_mm.z,
                ),
            })
            .collect();
        Hand { fingers }
    }
}

impl TrackingSource for SimTrackingSource {
    fn current_frame(&mut self) -> Result<Frame, TrackingError> {
        loop {
            match self.rx.try_recv() {
                Ok(input) => self.apply(input),
                // A closed channel means the window is gone and the app is
                // already shutting the poller down; keep the last state.
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }

        if !self.seen_pointer {
            return Ok(Frame::default());
        }

        let mut hands = vec![self.hand_at(1.0)];
        if self.second_hand {
            hands.push(self.hand_at(-1.0));
        }
        Ok(Frame { hands })
    }
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════
