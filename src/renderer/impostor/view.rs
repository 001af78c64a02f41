use bytemuck::{Pod, Zeroable};

use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::texture::RenderTarget;
use crate::renderer::camera::PassCamera;
use crate::structure::RADIUS_SCALE;
use crate::view::{Resolution, ViewState};

const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const NORMAL_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Color, packed normal and depth written by the impostor shaders.
pub struct GBuffer {
    /// Albedo with coverage in alpha.
    pub color: RenderTarget,
    /// View-space normal mapped into `[0, 1]`.
    pub normal: RenderTarget,
    /// Depth over the structure's range.
    pub depth: RenderTarget,
}

impl GBuffer {
    /// Allocate all three targets at `resolution`.
    #[must_use]
    pub fn new(device: &wgpu::Device, label: &str, resolution: Resolution) -> Self {
        let (w, h) = (resolution.width, resolution.height);
        Self {
            color: RenderTarget::new(device, &format!("{label} Color"), w, h, COLOR_FORMAT),
            normal: RenderTarget::new(device, &format!("{label} Normal"), w, h, NORMAL_FORMAT),
            depth: RenderTarget::new(device, &format!("{label} Depth"), w, h, DEPTH_FORMAT),
        }
    }

    /// Color target states for impostor pipelines.
    #[must_use]
    pub fn fragment_targets() -> [Option<wgpu::ColorTargetState>; 2] {
        [
            Some(wgpu::ColorTargetState {
                format: COLOR_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            }),
            Some(wgpu::ColorTargetState {
                format: NORMAL_FORMAT,
                blend: None,
                write_mask: wgpu::ColorWrites::ALL,
            }),
        ]
    }

    /// Begin a pass that clears all three targets.
    pub fn begin_pass<'e>(
        &self,
        encoder: &'e mut wgpu::CommandEncoder,
        label: &str,
    ) -> wgpu::RenderPass<'e> {
        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(label),
            color_attachments: &[
                Some(self.color.clear_attachment(wgpu::Color::TRANSPARENT)),
                Some(self.normal.clear_attachment(wgpu::Color::TRANSPARENT)),
            ],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth.view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            ..Default::default()
        })
    }
}

/// Uniforms shared by the atom and bond shaders (matches
/// `ImpostorUniforms` in `impostor.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ImpostorUniforms {
    /// Orthographic projection.
    pub projection: [[f32; 4]; 4],
    /// Rotation followed by the push to mid-range.
    pub model: [[f32; 4]; 4],
    /// Depth extent.
    pub range: f32,
    /// Display scale applied to every radius.
    pub atom_scale: f32,
    /// How much element radius differences show.
    pub relative_atom_scale: f32,
    /// Blend of atom colour towards white.
    pub atom_shade: f32,
    /// Bond cylinder radius.
    pub bond_radius: f32,
    /// Blend of bond colour towards white.
    pub bond_shade: f32,
    /// Padding to 16-byte alignment.
    pub _pad: [f32; 2],
}

impl ImpostorUniforms {
    /// Uniforms for drawing `state` through `camera`.
    #[must_use]
    pub fn new(camera: &PassCamera, state: &ViewState) -> Self {
        let scale = RADIUS_SCALE as f32;
        Self {
            projection: camera.projection().to_cols_array_2d(),
            model: camera.model().to_cols_array_2d(),
            range: camera.range,
            atom_scale: scale * state.atom_scale,
            relative_atom_scale: state.relative_atom_scale,
            atom_shade: state.atom_shade,
            bond_radius: scale * state.bond_radius(),
            bond_shade: state.bond_shade,
            _pad: [0.0; 2],
        }
    }
}

/// One camera's uniforms plus the G-buffer it renders into.
pub struct ImpostorView {
    /// Render targets, reallocated on resize.
    pub gbuffer: GBuffer,
    uniforms: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    label: &'static str,
}

impl ImpostorView {
    pub(super) fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Impostor Uniform Layout"),
            entries: &[pipeline_helpers::vertex_fragment_uniform(0)],
        })
    }

    /// Create a view with zeroed uniforms and a G-buffer at `resolution`.
    #[must_use]
    pub fn new(
        context: &RenderContext,
        layout: &wgpu::BindGroupLayout,
        label: &'static str,
        resolution: Resolution,
    ) -> Self {
        let uniforms = pipeline_helpers::create_uniform(
            &context.device,
            &format!("{label} Uniforms"),
            &ImpostorUniforms::zeroed(),
        );
        let bind_group = context.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{label} Uniform Bind Group")),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniforms.as_entire_binding(),
            }],
        });
        Self {
            gbuffer: GBuffer::new(&context.device, label, resolution),
            uniforms,
            bind_group,
            label,
        }
    }

    /// Upload uniforms for the next draw.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &ImpostorUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Reallocate the G-buffer.
    pub fn resize(&mut self, device: &wgpu::Device, resolution: Resolution) {
        self.gbuffer = GBuffer::new(device, self.label, resolution);
    }

    pub(super) fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }

    pub(super) fn label(&self) -> &str {
        self.label
    }
}

#[cfg(test)]
mod tests {
    use glam::{Mat4, Vec2};

    use super::*;
    use crate::structure::elements;
    use crate::view::ViewRect;

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(size_of::<ImpostorUniforms>(), 160);
    }

    #[test]
    fn uniforms_scale_radii() {
        let state = ViewState::default();
        let camera = PassCamera {
            rect: ViewRect::centered(Vec2::ZERO, 4.0, 4.0),
            range: 12.0,
            rotation: Mat4::IDENTITY,
        };
        let uniforms = ImpostorUniforms::new(&camera, &state);
        assert_eq!(uniforms.range, 12.0);
        assert!((uniforms.atom_scale - 2.5 * state.atom_scale).abs() < 1e-6);

        let bond = 2.5
            * state.bond_scale
            * state.atom_radius(elements::min_radius());
        assert!((uniforms.bond_radius - bond).abs() < 1e-6);
        assert_eq!(uniforms.model, camera.model().to_cols_array_2d());
    }
}
