//! View state: camera transform plus the shading parameters every pass reads.

use glam::{Mat4, Vec2};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpeckleError;
use crate::structure::{elements, Structure, RADIUS_SCALE};

/// Radians of rotation per pixel of mouse drag.
pub const ROTATE_SENSITIVITY: f32 = 0.005;

/// Zoom multiplier per wheel step out (in is its reciprocal).
pub const ZOOM_STEP: f32 = 0.9;

/// Upper bound on antialiasing passes.
pub const MAX_FXAA_PASSES: u32 = 32;

/// Upper bound on samples per frame.
pub const MAX_SPF: u32 = 1024;

const ZOOM_RANGE: (f32, f32) = (0.001, 2.0);
const RES_SCALE_RANGE: (f32, f32) = (0.125, 2.0);

/// Pixel dimensions of a render target plus the aspect ratio used to
/// derive its view rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Width over height of the window this resolution was derived from.
    pub aspect: f32,
}

impl Resolution {
    /// A resolution whose aspect matches its own dimensions.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            aspect: width as f32 / height as f32,
        }
    }
}

/// Orthographic view rectangle in world units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewRect {
    /// Left edge.
    pub left: f32,
    /// Right edge.
    pub right: f32,
    /// Bottom edge.
    pub bottom: f32,
    /// Top edge.
    pub top: f32,
}

impl ViewRect {
    /// Rectangle of `width × height` centred on `center`.
    #[must_use]
    pub fn centered(center: Vec2, width: f32, height: f32) -> Self {
        Self {
            left: center.x - width / 2.0,
            right: center.x + width / 2.0,
            bottom: center.y - height / 2.0,
            top: center.y + height / 2.0,
        }
    }

    /// Horizontal extent.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    /// Vertical extent.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.top - self.bottom
    }

    /// Orthographic projection onto wgpu clip space with depth `[0, range]`
    /// in front of the camera.
    #[must_use]
    pub fn projection(&self, range: f32) -> Mat4 {
        Mat4::orthographic_rh(
            self.left,
            self.right,
            self.bottom,
            self.top,
            0.0,
            range,
        )
    }
}

/// Camera and shading configuration.
///
/// Mutate through the methods (each ends in [`ViewState::resolve`]) or
/// assign fields directly and call `resolve` before rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct ViewState {
    /// Inverse of the view width in world units.
    #[schemars(skip)]
    pub zoom: f32,
    /// Centre of the view rectangle.
    #[schemars(skip)]
    pub translation: Vec2,
    /// Accumulated orientation of the structure.
    #[schemars(skip)]
    pub rotation: Mat4,
    /// Global atom size multiplier.
    #[schemars(title = "Atom Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub atom_scale: f32,
    /// Blend between uniform radius (0) and covalent radius (1).
    #[schemars(title = "Relative Atom Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub relative_atom_scale: f32,
    /// Bond radius relative to the smallest atom.
    #[schemars(title = "Bond Radius", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bond_scale: f32,
    /// Ambient occlusion strength.
    #[schemars(title = "Ambient Occlusion", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub ao: f32,
    /// Scale of the occlusion pass resolution relative to the window.
    #[schemars(title = "AO Resolution", range(min = 0.125, max = 2.0))]
    pub ao_res_scale: f32,
    /// Output brightness.
    #[schemars(title = "Brightness", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub brightness: f32,
    /// Depth-edge outline strength.
    #[schemars(title = "Outline", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub outline: f32,
    /// Occlusion samples taken per rendered frame.
    #[schemars(title = "Samples Per Frame", range(min = 0, max = 1024))]
    pub spf: u32,
    /// Whether bonds are drawn.
    #[schemars(title = "Bonds")]
    pub bonds: bool,
    /// Largest bond cutoff that is still drawn.
    #[schemars(title = "Bond Threshold", range(min = 0.0, max = 2.5), extend("step" = 0.01))]
    pub bond_threshold: f32,
    /// Blend of bond colour towards white.
    #[schemars(title = "Bond Shade", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub bond_shade: f32,
    /// Blend of atom colour towards white.
    #[schemars(title = "Atom Shade", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub atom_shade: f32,
    /// Scale of the main resolution relative to the window.
    #[schemars(title = "Resolution", range(min = 0.125, max = 2.0))]
    pub resolution_scale: f32,
    /// Depth-of-field blur strength; 0 disables the pass.
    #[schemars(title = "DOF Strength", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub dof_strength: f32,
    /// Focal plane as a fraction of the depth range.
    #[schemars(title = "DOF Position", range(min = 0.0, max = 1.0), extend("step" = 0.01))]
    pub dof_position: f32,
    /// Number of antialiasing passes.
    #[schemars(title = "FXAA Passes", range(min = 0, max = 32))]
    pub fxaa: u32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            zoom: 0.125,
            translation: Vec2::ZERO,
            rotation: Mat4::IDENTITY,
            atom_scale: 0.6,
            relative_atom_scale: 1.0,
            bond_scale: 0.5,
            ao: 0.75,
            ao_res_scale: 1.0,
            brightness: 0.5,
            outline: 0.0,
            spf: 32,
            bonds: false,
            bond_threshold: 1.2,
            bond_shade: 0.5,
            atom_shade: 0.5,
            resolution_scale: 1.0,
            dof_strength: 0.0,
            dof_position: 0.5,
            fxaa: 1,
        }
    }
}

/// A partial [`ViewState`]: every field is optional and only the present
/// ones are applied. Presets are stored in this form.
#[allow(missing_docs)]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relative_atom_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ao: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ao_res_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spf: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bonds: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_threshold: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bond_shade: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub atom_shade: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolution_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dof_strength: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dof_position: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fxaa: Option<u32>,
}

fn set<T: Copy>(field: &mut T, value: Option<T>) {
    if let Some(v) = value {
        *field = v;
    }
}

impl ViewState {
    /// Clamp every bounded field into its valid range. Idempotent.
    pub fn resolve(&mut self) {
        let unit = |v: f32| v.clamp(0.0, 1.0);

        self.dof_strength = unit(self.dof_strength);
        self.dof_position = unit(self.dof_position);

        self.zoom = self.zoom.clamp(ZOOM_RANGE.0, ZOOM_RANGE.1);
        self.atom_scale = unit(self.atom_scale);
        self.relative_atom_scale = unit(self.relative_atom_scale);
        self.bond_scale = unit(self.bond_scale);
        self.bond_shade = unit(self.bond_shade);
        self.atom_shade = unit(self.atom_shade);

        self.ao = unit(self.ao);
        self.brightness = unit(self.brightness);
        self.outline = unit(self.outline);

        self.fxaa = self.fxaa.min(MAX_FXAA_PASSES);
        self.spf = self.spf.min(MAX_SPF);
        self.resolution_scale = self
            .resolution_scale
            .clamp(RES_SCALE_RANGE.0, RES_SCALE_RANGE.1);
        self.ao_res_scale =
            self.ao_res_scale.clamp(RES_SCALE_RANGE.0, RES_SCALE_RANGE.1);
    }

    /// Apply the fields present in `overrides`, then [`resolve`](Self::resolve).
    pub fn apply(&mut self, overrides: &ViewOverrides) {
        set(&mut self.zoom, overrides.zoom);
        set(&mut self.atom_scale, overrides.atom_scale);
        set(&mut self.relative_atom_scale, overrides.relative_atom_scale);
        set(&mut self.bond_scale, overrides.bond_scale);
        set(&mut self.ao, overrides.ao);
        set(&mut self.ao_res_scale, overrides.ao_res_scale);
        set(&mut self.brightness, overrides.brightness);
        set(&mut self.outline, overrides.outline);
        set(&mut self.spf, overrides.spf);
        set(&mut self.bonds, overrides.bonds);
        set(&mut self.bond_threshold, overrides.bond_threshold);
        set(&mut self.bond_shade, overrides.bond_shade);
        set(&mut self.atom_shade, overrides.atom_shade);
        set(&mut self.resolution_scale, overrides.resolution_scale);
        set(&mut self.dof_strength, overrides.dof_strength);
        set(&mut self.dof_position, overrides.dof_position);
        set(&mut self.fxaa, overrides.fxaa);
        self.resolve();
    }

    /// Pan by a mouse delta in pixels. Screen-down moves the view down.
    pub fn translate(&mut self, dx: f32, dy: f32, resolution: Resolution) {
        self.translation.x -= dx / (resolution.width as f32 * self.zoom);
        self.translation.y += dy / (resolution.height as f32 * self.zoom);
        self.resolve();
    }

    /// Compose a yaw (from `dx`) and pitch (from `dy`) onto the current
    /// orientation.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        let delta = Mat4::from_rotation_y(dx * ROTATE_SENSITIVITY)
            * Mat4::from_rotation_x(dy * ROTATE_SENSITIVITY);
        self.rotation = delta * self.rotation;
        self.resolve();
    }

    /// Zoom by wheel steps; positive zooms in.
    pub fn zoom_by(&mut self, steps: f32) {
        self.zoom *= ZOOM_STEP.powf(-steps);
        self.resolve();
    }

    /// Fit `structure` in view under the current rotation.
    ///
    /// Translation moves to the centre of the rotated screen-space bounds
    /// and zoom fits the larger extent with a 1% margin. Leaves the state
    /// untouched when no atom has a known element.
    pub fn center(&mut self, structure: &Structure, resolution: Resolution) {
        let mut min = Vec2::splat(f32::INFINITY);
        let mut max = Vec2::splat(f32::NEG_INFINITY);

        for atom in &structure.atoms {
            let Some(e) = elements::lookup(&atom.symbol) else {
                continue;
            };
            let r = self.display_radius(e.radius);
            let p = self.rotation * atom.position.as_vec3().extend(0.0);
            let p = Vec2::new(p.x, p.y);
            min = min.min(p - r);
            max = max.max(p + r);
        }

        if !min.x.is_finite() {
            log::warn!("center: no atoms with known elements");
            return;
        }

        self.translation = min + (max - min) / 2.0;
        let extent = (max - min) * Vec2::new(1.0, resolution.aspect);
        self.zoom = 1.0 / (extent.max_element() * 1.01);
        self.resolve();
    }

    /// World-space radius at which an element of covalent radius `radius`
    /// is drawn.
    #[must_use]
    pub fn atom_radius(&self, radius: f64) -> f32 {
        self.atom_scale * (1.0 + (radius as f32 - 1.0) * self.relative_atom_scale)
    }

    /// [`atom_radius`](Self::atom_radius) including the impostor scale.
    fn display_radius(&self, radius: f64) -> f32 {
        RADIUS_SCALE as f32 * self.atom_radius(radius)
    }

    /// Orthographic view rectangle for `resolution`.
    #[must_use]
    pub fn rect(&self, resolution: Resolution) -> ViewRect {
        let width = 1.0 / self.zoom;
        let height = width / resolution.aspect;
        ViewRect::centered(self.translation, width, height)
    }

    /// Bond radius, sized against the smallest element so bonds never
    /// outgrow the thinnest atom.
    #[must_use]
    pub fn bond_radius(&self) -> f32 {
        self.bond_scale * self.atom_radius(elements::min_radius())
    }

    /// Main and occlusion resolutions for a window of the given size.
    #[must_use]
    pub fn resolutions(&self, window_width: u32, window_height: u32) -> (Resolution, Resolution) {
        let window_width = window_width.max(1);
        let window_height = window_height.max(1);
        let aspect = window_width as f32 / window_height as f32;
        let scaled = |scale: f32| Resolution {
            width: ((window_width as f32 * scale).round() as u32).max(1),
            height: ((window_height as f32 * scale).round() as u32).max(1),
            aspect,
        };
        (scaled(self.resolution_scale), scaled(self.ao_res_scale))
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Share`] if serialization fails.
    pub fn to_json(&self) -> Result<String, SpeckleError> {
        serde_json::to_string(self).map_err(|e| SpeckleError::Share(e.to_string()))
    }

    /// Deserialize from JSON produced by [`to_json`](Self::to_json).
    /// Missing fields take their defaults; the result is resolved.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Share`] on malformed JSON.
    pub fn from_json(json: &str) -> Result<Self, SpeckleError> {
        let mut state: Self =
            serde_json::from_str(json).map_err(|e| SpeckleError::Share(e.to_string()))?;
        state.resolve();
        Ok(state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn water() -> Structure {
        Structure::from_xyz("2\ncomment\nO 0 0 0\nH 1 0 0\n").unwrap()
    }

    #[test]
    fn zoom_is_clamped() {
        let mut s = ViewState::default();
        s.zoom = 10.0;
        s.resolve();
        assert_eq!(s.zoom, 2.0);
        s.zoom = -5.0;
        s.resolve();
        assert_eq!(s.zoom, 0.001);
    }

    #[test]
    fn resolve_is_idempotent_and_bounded() {
        let mut s = ViewState {
            atom_scale: 3.0,
            relative_atom_scale: -1.0,
            bond_scale: 7.0,
            ao: -0.5,
            brightness: 1.5,
            outline: 2.0,
            dof_strength: 9.0,
            dof_position: -9.0,
            bond_shade: 4.0,
            atom_shade: -4.0,
            fxaa: 100,
            spf: 5000,
            resolution_scale: 10.0,
            ao_res_scale: 0.0,
            ..ViewState::default()
        };
        s.resolve();
        let once = s.clone();
        s.resolve();
        assert_eq!(s, once);

        for v in [
            s.atom_scale,
            s.relative_atom_scale,
            s.bond_scale,
            s.ao,
            s.brightness,
            s.outline,
            s.dof_strength,
            s.dof_position,
            s.bond_shade,
            s.atom_shade,
        ] {
            assert!((0.0..=1.0).contains(&v));
        }
        assert_eq!(s.fxaa, MAX_FXAA_PASSES);
        assert_eq!(s.spf, MAX_SPF);
        assert_eq!(s.resolution_scale, 2.0);
        assert_eq!(s.ao_res_scale, 0.125);
    }

    #[test]
    fn json_round_trip_has_independent_rotation() {
        let mut original = ViewState::default();
        original.rotate(40.0, -25.0);
        original.translation = Vec2::new(1.5, -0.25);

        let json = original.to_json().unwrap();
        let mut copy = ViewState::from_json(&json).unwrap();
        assert_eq!(copy, original);

        copy.rotate(10.0, 10.0);
        assert_ne!(copy.rotation, original.rotation);
        assert_eq!(ViewState::from_json(&json).unwrap(), original);
    }

    #[test]
    fn partial_json_uses_defaults() {
        let s = ViewState::from_json(r#"{"ao": 0.25, "bonds": true}"#).unwrap();
        assert_eq!(s.ao, 0.25);
        assert!(s.bonds);
        assert_eq!(s.spf, 32);
        assert!(ViewState::from_json("not json").is_err());
    }

    #[test]
    fn translate_scales_by_zoom_and_resolution() {
        let mut s = ViewState::default();
        s.zoom = 0.5;
        s.translate(100.0, 50.0, Resolution::new(200, 100));
        assert!((s.translation.x + 1.0).abs() < 1e-6);
        assert!((s.translation.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn rotate_composes_on_the_left() {
        let mut s = ViewState::default();
        s.rotate(100.0, 0.0);
        let first = s.rotation;
        s.rotate(0.0, 100.0);
        let expected = Mat4::from_rotation_x(0.5) * first;
        assert!(s.rotation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn zoom_by_steps() {
        let mut s = ViewState::default();
        s.zoom_by(1.0);
        assert!((s.zoom - 0.125 / 0.9).abs() < 1e-6);
        s.zoom_by(-1.0);
        assert!((s.zoom - 0.125).abs() < 1e-6);
    }

    #[test]
    fn rect_follows_zoom_aspect_and_translation() {
        let mut s = ViewState::default();
        s.zoom = 0.25;
        s.translation = Vec2::new(1.0, 2.0);
        let r = s.rect(Resolution::new(400, 200));
        assert!((r.width() - 4.0).abs() < 1e-6);
        assert!((r.height() - 2.0).abs() < 1e-6);
        assert!((r.left + 1.0).abs() < 1e-6);
        assert!((r.top - 3.0).abs() < 1e-6);
    }

    #[test]
    fn center_fits_structure() {
        let mut s = ViewState::default();
        let structure = water();
        s.center(&structure, Resolution::new(100, 100));

        // O radius dominates the x extent: centred pair at ±0.5.
        let ro = 2.5 * s.atom_radius(0.66);
        let rh = 2.5 * s.atom_radius(0.31);
        let width = (0.5 + rh) - (-0.5 - ro);
        let height = 2.0 * ro;
        let expected_zoom = 1.0 / (width.max(height) * 1.01);
        assert!((s.zoom - expected_zoom).abs() < 1e-5);
        assert!((s.translation.x - ((0.5 + rh) + (-0.5 - ro)) / 2.0).abs() < 1e-5);
        assert!(s.translation.y.abs() < 1e-6);
    }

    #[test]
    fn center_ignores_unknown_elements() {
        let mut s = ViewState::default();
        let structure = Structure::from_xyz("1\n\nQq 0 0 0\n").unwrap();
        s.center(&structure, Resolution::new(10, 10));
        assert_eq!(s, ViewState::default());
    }

    #[test]
    fn bond_radius_uses_smallest_element() {
        let s = ViewState::default();
        let expected = 0.5 * 0.6 * (1.0 + (0.28 - 1.0) * 1.0);
        assert!((s.bond_radius() - expected).abs() < 1e-6);
    }

    #[test]
    fn resolutions_scale_independently() {
        let s = ViewState {
            resolution_scale: 0.5,
            ao_res_scale: 0.25,
            ..ViewState::default()
        };
        let (main, ao) = s.resolutions(800, 400);
        assert_eq!((main.width, main.height), (400, 200));
        assert_eq!((ao.width, ao.height), (200, 100));
        assert_eq!(main.aspect, 2.0);
        assert_eq!(ao.aspect, 2.0);
    }

    #[test]
    fn overrides_apply_only_present_fields() {
        let mut s = ViewState::default();
        s.apply(&ViewOverrides {
            outline: Some(3.0),
            bonds: Some(true),
            ..ViewOverrides::default()
        });
        assert_eq!(s.outline, 1.0);
        assert!(s.bonds);
        assert_eq!(s.ao, 0.75);
    }
}
