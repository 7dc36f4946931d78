//! Device-to-scene coordinate conversion.
//!
//! The tracking device reports positions with x to the operator's right,
//! y up from the sensor and z toward the operator; the scene uses the
//! right-handed RAS convention (x Right, y Anterior, z Superior).  The remap
//! is a fixed permutation plus one sign flip.  Existing scenes depend on
//! exactly this mapping, so it must not be "corrected".

use glam::{Mat4, Vec3};

/// RAS translation for a device-native tip position: `(-x, z, y)`.
pub fn ras_translation(tip: Vec3) -> Vec3 {
    Vec3::new(-tip.x, tip.z, tip.y)
}

/// Map a device-native tip position to a translation-only RAS transform.
///
/// The rotation/scale block stays identity: finger orientation is not
/// captured, so the transform carries position only.  Total over all finite
/// inputs; the same input always produces the same matrix.
pub fn tip_to_ras(tip: Vec3) -> Mat4 {
    Mat4::from_translation(ras_translation(tip))
}

// ════════════════════════════════════════════════════════════════════════════
// Tests
// ════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4;

    #[test]
    fn translation_is_negx_z_y() {
        let m = tip_to_ras(Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(m.w_axis, Vec4::new(-1.0, 3.0, 2.0, 1.0));
    }

    #[test]
    fn rotation_block_is_identity() {
        let m = tip_to_ras(Vec3::new(10.0, -20.0, 30.5));
        assert_eq!(m.x_axis, Vec4::X);
        assert_eq!(m.y_axis, Vec4::Y);
        assert_eq!(m.z_axis, Vec4::Z);
    }

    #[test]
    fn origin_maps_to_origin() {
        assert_eq!(tip_to_ras(Vec3::ZERO), Mat4::IDENTITY);
    }

    #[test]
    fn conversion_is_stateless() {
        let tip = Vec3::new(-4.5, 120.25, -33.0);
        assert_eq!(tip_to_ras(tip), tip_to_ras(tip));
    }

    #[test]
    fn negative_inputs_flip_cleanly() {
        let t = ras_translation(Vec3::new(-7.0, -8.0, -9.0));
        assert_eq!(t, Vec3::new(7.0, -9.0, -8.0));
    }
}
