use cgmath::Matrix4;

// -----------------------------------------------------------------------------
// World space
// -----------------------------------------------------------------------------
// The scene lives in a fixed orthographic rectangle. There is no camera and no
// window-derived scaling; every frame maps the same world rect to the surface.
#[inline(always)]
pub const fn world_half_width() -> f32 {
    5.0
}
#[inline(always)]
pub const fn world_half_height() -> f32 {
    3.75
}

#[derive(Clone, Copy, Debug)]
pub struct Metrics {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

#[inline(always)]
pub fn world_metrics() -> Metrics {
    Metrics {
        left: -world_half_width(),
        right: world_half_width(),
        bottom: -world_half_height(),
        top: world_half_height(),
    }
}

#[inline(always)]
pub fn ortho_projection() -> Matrix4<f32> {
    let m = world_metrics();
    cgmath::ortho(m.left, m.right, m.bottom, m.top, -1.0, 1.0)
}

/// Sawtooth wrap: once a coordinate exceeds the positive bound it resets to
/// the negative bound. Values at or below the bound pass through untouched,
/// and there is no mirrored rule on the negative side.
#[inline(always)]
pub fn wrap_axis(value: f32, bound: f32) -> f32 {
    if value > bound { -bound } else { value }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::Vector4;

    #[test]
    fn wrap_passes_values_inside_bounds() {
        assert_eq!(wrap_axis(4.9, 5.0), 4.9);
        assert_eq!(wrap_axis(-12.0, 5.0), -12.0);
        // The bound itself is not "exceeded".
        assert_eq!(wrap_axis(5.0, 5.0), 5.0);
    }

    #[test]
    fn wrap_resets_to_negative_bound() {
        assert_eq!(wrap_axis(5.01, 5.0), -5.0);
        assert_eq!(wrap_axis(100.0, 3.75), -3.75);
    }

    #[test]
    fn projection_maps_world_corners_to_clip_corners() {
        let m = ortho_projection();
        let top_right = m * Vector4::new(world_half_width(), world_half_height(), 0.0, 1.0);
        assert!((top_right.x - 1.0).abs() < 1e-6);
        assert!((top_right.y - 1.0).abs() < 1e-6);

        let bottom_left = m * Vector4::new(-world_half_width(), -world_half_height(), 0.0, 1.0);
        assert!((bottom_left.x + 1.0).abs() < 1e-6);
        assert!((bottom_left.y + 1.0).abs() < 1e-6);
    }
}
