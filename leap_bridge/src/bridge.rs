//! The per-finger update core: name resolution, find-or-create, and the
//! translation-only transform write.
//!
//! Each finger is independent: its node is resolved from the (hand, finger)
//! indices, and this frame's observation fully overwrites the node's
//! transform.  No state survives between frames except the nodes themselves.

use glam::Vec3;
use ras_scene::{TransformNode, TransformSink};

use crate::convert::tip_to_ras;
use crate::tracking::Frame;

// ════════════════════════════════════════════════════════════════════════════
// Node naming
// ════════════════════════════════════════════════════════════════════════════

/// Stable node key for a detected finger.
///
/// Hands and fingers are 0-indexed in frames but 1-based in node names, so
/// the first fingertip lands in `Hand1Finger1`.
pub fn transform_name(hand_idx: usize, finger_idx: usize) -> String {
    format!("Hand{}Finger{}", hand_idx + 1, finger_idx + 1)
}

// ════════════════════════════════════════════════════════════════════════════
// Per-finger update
// ════════════════════════════════════════════════════════════════════════════

/// What happened to a single finger during one frame pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FingerOutcome {
    /// The node existed and its transform was overwritten.
    Updated,
    /// The node was missing, auto-create was on: created, then written.
    Created,
    /// The node was missing and auto-create was off.  Normal, no side
    /// effect — the scene just wasn't pre-populated for this finger.
    Skipped,
}

/// Resolve the node for (hand, finger) and write this frame's observation.
///
/// The write fully overwrites the node's parent-relative transform:
/// last-writer-wins, no blending or smoothing across frames.
pub fn apply_finger(
    sink: &mut dyn TransformSink,
    hand_idx: usize,
    finger_idx: usize,
    tip: Vec3,
    auto_create: bool,
) -> FingerOutcome {
    let name = transform_name(hand_idx, finger_idx);

    let (id, outcome) = match sink.find_node(&name) {
        Some(id) => (id, FingerOutcome::Updated),
        None if auto_create => (sink.add_node(TransformNode::new(name)), FingerOutcome::Created),
        None => return FingerOutcome::Skipped,
    };

    sink.set_local_transform(id, tip_to_ras(tip));
    outcome
}

// ════════════════════════════════════════════════════════════════════════════
// Frame pass
// ════════════════════════════════════════════════════════════════════════════

/// Totals for one frame pass, for logging and the status line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub updated: usize,
    pub created: usize,
    pub skipped: usize,
}

/// Apply every finger of `frame`, hands then fingers in ascending order.
///
/// A zero-hand frame touches nothing and returns zeroed stats.
pub fn apply_frame(sink: &mut dyn TransformSink, frame: &Frame, auto_create: bool) -> FrameStats {
    let mut stats = FrameStats::default();
    for (h, hand) in frame.hands.iter().enumerate() {
        for (f, finger) in hand.fingers.iter().enumerate() {
            match apply_finger(sink, h, f, finger.tip, auto_create) {
                FingerOutcome::Updated => stats.updated += 1,
                FingerOutcome::Created => stats.created += 1,
                FingerOutcome::Skipped => stats.skipped += 1,
            }
        }
    }
    stats
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Mat4, Vec4};
    use ras_scene::NodeId;
    use crate::tracking::{Finger, Hand};

    /// Records every mutating sink call so tests can assert exact call
    /// sequences, in the spirit of a null output backend that also listens.
    #[derive(Default)]
    struct RecordingSink {
        /// Registered node names, in registration order.
        names:  Vec<String>,
        /// Every `set_local_transform` call as (node index, matrix).
        writes: Vec<(usize, Mat4)>,
    }

    impl RecordingSink {
        fn with_nodes(names: &[&str]) -> Self {
            RecordingSink {
                names:  names.iter().map(|n| n.to_string()).collect(),
                writes: Vec::new(),
            }
        }
    }

    impl TransformSink for RecordingSink {
        fn find_node(&self, name: &str) -> Option<NodeId> {
            self.names.iter().position(|n| n == name).map(NodeId)
        }
        fn add_node(&mut self, node: TransformNode) -> NodeId {
            self.names.push(node.name().to_string());
            NodeId(self.names.len() - 1)
        }
        fn set_local_transform(&mut self, id: NodeId, transform: Mat4) {
            self.writes.push((id.0, transform));
        }
    }

    fn frame(hands: &[&[[f32; 3]]]) -> Frame {
        Frame {
            hands: hands
                .iter()
                .map(|fingers| Hand {
                    fingers: fingers
                        .iter()
                        .map(|tip| Finger { tip: Vec3::from_array(*tip) })
                        .collect(),
                })
                .collect(),
        }
    }

    #[test]
    fn names_are_one_based() {
        assert_eq!(transform_name(0, 0), "Hand1Finger1");
        assert_eq!(transform_name(0, 4), "Hand1Finger5");
        assert_eq!(transform_name(1, 2), "Hand2Finger3");
        assert_eq!(transform_name(9, 10), "Hand10Finger11");
    }

    #[test]
    fn missing_node_auto_create_off_skips_silently() {
        let mut sink = RecordingSink::default();
        let outcome = apply_finger(&mut sink, 0, 0, Vec3::new(1.0, 2.0, 3.0), false);
        assert_eq!(outcome, FingerOutcome::Skipped);
        assert!(sink.names.is_empty());
        assert!(sink.writes.is_empty());
    }

    #[test]
    fn missing_node_auto_create_on_creates_then_writes_once() {
        let mut sink = RecordingSink::default();
        let outcome = apply_finger(&mut sink, 0, 0, Vec3::new(1.0, 2.0, 3.0), true);
        assert_eq!(outcome, FingerOutcome::Created);
        assert_eq!(sink.names, ["Hand1Finger1"]);
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0].1.w_axis, Vec4::new(-1.0, 3.0, 2.0, 1.0));
    }

    #[test]
    fn existing_node_writes_without_creating() {
        for auto_create in [false, true] {
            let mut sink = RecordingSink::with_nodes(&["Hand1Finger1"]);
            let outcome = apply_finger(&mut sink, 0, 0, Vec3::new(1.0, 2.0, 3.0), auto_create);
            assert_eq!(outcome, FingerOutcome::Updated);
            assert_eq!(sink.names.len(), 1, "no create with flag {}", auto_create);
            assert_eq!(sink.writes.len(), 1);
            assert_eq!(sink.writes[0].1.w_axis, Vec4::new(-1.0, 3.0, 2.0, 1.0));
        }
    }

    #[test]
    fn frame_updates_in_hand_then_finger_order() {
        let mut sink = RecordingSink::default();
        let frame = frame(&[&[[1.0, 2.0, 3.0]], &[[4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]]);

        let stats = apply_frame(&mut sink, &frame, true);

        assert_eq!(sink.names, ["Hand1Finger1", "Hand2Finger1", "Hand2Finger2"]);
        let translations: Vec<Vec4> = sink.writes.iter().map(|(_, m)| m.w_axis).collect();
        assert_eq!(
            translations,
            [
                Vec4::new(-1.0, 3.0, 2.0, 1.0),
                Vec4::new(-4.0, 6.0, 5.0, 1.0),
                Vec4::new(-7.0, 9.0, 8.0, 1.0),
            ]
        );
        assert_eq!(stats, FrameStats { updated: 0, created: 3, skipped: 0 });
    }

    #[test]
    fn empty_frame_touches_nothing() {
        let mut sink = RecordingSink::default();
        let stats = apply_frame(&mut sink, &Frame::default(), true);
        assert!(sink.names.is_empty());
        assert!(sink.writes.is_empty());
        assert_eq!(stats, FrameStats::default());
    }

    #[test]
    fn partial_scene_mixes_updates_and_skips() {
        // Only hand 2's first finger has a pre-made node.
        let mut sink = RecordingSink::with_nodes(&["Hand2Finger1"]);
        let frame = frame(&[&[[1.0, 2.0, 3.0]], &[[4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]]);

        let stats = apply_frame(&mut sink, &frame, false);

        assert_eq!(stats, FrameStats { updated: 1, created: 0, skipped: 2 });
        assert_eq!(sink.writes.len(), 1);
        assert_eq!(sink.writes[0].1.w_axis, Vec4::new(-4.0, 6.0, 5.0, 1.0));
    }

    #[test]
    fn toggling_auto_create_only_affects_later_decisions() {
        let mut sink = RecordingSink::default();
        let frame = frame(&[&[[1.0, 2.0, 3.0]]]);

        // Cycle 1: flag off — nothing happens.
        let stats = apply_frame(&mut sink, &frame, false);
        assert_eq!(stats, FrameStats { updated: 0, created: 0, skipped: 1 });

        // Cycle 2: flag on — the node gets created.
        let stats = apply_frame(&mut sink, &frame, true);
        assert_eq!(stats, FrameStats { updated: 0, created: 1, skipped: 0 });

        // Cycle 3: flag off again — the node it created keeps updating.
        let stats = apply_frame(&mut sink, &frame, false);
        assert_eq!(stats, FrameStats { updated: 1, created: 0, skipped: 0 });
        assert_eq!(sink.names, ["Hand1Finger1"]);
        assert_eq!(sink.writes.len(), 2);
    }
}
