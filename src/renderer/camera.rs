//! Per-pass orthographic cameras.
//!
//! Every pass looks down -z at a structure centred `range / 2` in front of
//! the eye, so depth `[0, 1]` spans the structure's bounding sphere.

use glam::{Mat4, Vec2, Vec3};
use rand::Rng;

use crate::view::{Resolution, ViewRect, ViewState};

/// Camera used by one impostor pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PassCamera {
    /// Visible rectangle in world units.
    pub rect: ViewRect,
    /// Depth extent (the structure's diameter).
    pub range: f32,
    /// Orientation applied to the structure.
    pub rotation: Mat4,
}

impl PassCamera {
    /// The user's camera.
    #[must_use]
    pub fn scene(state: &ViewState, resolution: Resolution, range: f32) -> Self {
        Self {
            rect: state.rect(resolution),
            range,
            rotation: state.rotation,
        }
    }

    /// The random-direction camera for one occlusion sample: `rot` applied
    /// on top of the user's orientation, untranslated, framing the whole
    /// bounding sphere.
    #[must_use]
    pub fn rand_rot(state: &ViewState, rot: Mat4, aspect: f32, range: f32) -> Self {
        Self {
            rect: rand_rot_rect(range, aspect),
            range,
            rotation: rot * state.rotation,
        }
    }

    /// Orthographic projection over `rect` and `[0, range]`.
    #[must_use]
    pub fn projection(&self) -> Mat4 {
        self.rect.projection(self.range)
    }

    /// Rotate, then push the structure to the middle of the depth range.
    #[must_use]
    pub fn model(&self) -> Mat4 {
        Mat4::from_translation(Vec3::new(0.0, 0.0, -self.range / 2.0)) * self.rotation
    }
}

/// Origin-centred rectangle whose shorter side spans `range`.
#[must_use]
pub fn rand_rot_rect(range: f32, aspect: f32) -> ViewRect {
    let (width, height) = if aspect >= 1.0 {
        (range * aspect, range)
    } else {
        (range, range / aspect)
    };
    ViewRect::centered(Vec2::ZERO, width, height)
}

/// Uniformly distributed unit vector.
pub fn random_unit_vector<R: Rng>(rng: &mut R) -> Vec3 {
    let theta = rng.random::<f32>() * std::f32::consts::TAU;
    let z = rng.random::<f32>() * 2.0 - 1.0;
    let s = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(s * theta.cos(), s * theta.sin(), z)
}

/// Three rotations about random axes by random angles in `[0, 10)`
/// radians, composed.
pub fn random_rotation<R: Rng>(rng: &mut R) -> Mat4 {
    let mut rot = Mat4::IDENTITY;
    for _ in 0..3 {
        let axis = random_unit_vector(rng).normalize_or(Vec3::Z);
        let angle = rng.random::<f32>() * 10.0;
        rot *= Mat4::from_axis_angle(axis, angle);
    }
    rot
}

#[cfg(test)]
mod tests {
    use glam::Vec4;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn model_centres_depth_range() {
        let camera = PassCamera {
            rect: ViewRect::centered(Vec2::ZERO, 2.0, 2.0),
            range: 10.0,
            rotation: Mat4::IDENTITY,
        };
        let origin = camera.projection() * camera.model() * Vec4::W;
        assert!(close(origin.z / origin.w, 0.5));

        let near = camera.projection() * camera.model() * Vec4::new(0.0, 0.0, 5.0, 1.0);
        assert!(close(near.z / near.w, 0.0));
    }

    #[test]
    fn projection_maps_rect_to_clip_space() {
        let camera = PassCamera {
            rect: ViewRect::centered(Vec2::new(1.0, 2.0), 4.0, 2.0),
            range: 4.0,
            rotation: Mat4::IDENTITY,
        };
        let top_right = camera.projection() * Vec4::new(3.0, 3.0, -2.0, 1.0);
        assert!(close(top_right.x, 1.0));
        assert!(close(top_right.y, 1.0));
        let bottom_left = camera.projection() * Vec4::new(-1.0, 1.0, -2.0, 1.0);
        assert!(close(bottom_left.x, -1.0));
        assert!(close(bottom_left.y, -1.0));
    }

    #[test]
    fn scene_camera_follows_state() {
        let mut state = ViewState::default();
        state.rotate(30.0, -10.0);
        let resolution = Resolution::new(200, 100);
        let camera = PassCamera::scene(&state, resolution, 6.0);
        assert_eq!(camera.rect, state.rect(resolution));
        assert_eq!(camera.rotation, state.rotation);
    }

    #[test]
    fn rand_rot_rect_covers_range() {
        for aspect in [0.25, 1.0, 1.6, 4.0] {
            let rect = rand_rot_rect(8.0, aspect);
            assert!(rect.width() >= 8.0 - 1e-4);
            assert!(rect.height() >= 8.0 - 1e-4);
            assert!(close(rect.width() / rect.height(), aspect));
            assert!(close(rect.left + rect.right, 0.0));
        }
    }

    #[test]
    fn rand_rot_composes_on_state() {
        let mut state = ViewState::default();
        state.rotate(50.0, 0.0);
        let rot = Mat4::from_rotation_x(0.3);
        let camera = PassCamera::rand_rot(&state, rot, 1.0, 2.0);
        assert!(camera.rotation.abs_diff_eq(rot * state.rotation, 1e-6));
    }

    #[test]
    fn random_rotation_is_orthonormal() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let rot = random_rotation(&mut rng);
            assert!((rot * rot.transpose()).abs_diff_eq(Mat4::IDENTITY, 1e-4));
            assert!(close(rot.determinant(), 1.0));
        }
    }

    #[test]
    fn random_unit_vectors_are_unit() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..50 {
            assert!(close(random_unit_vector(&mut rng).length(), 1.0));
        }
    }
}
