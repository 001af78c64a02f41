//! Occlusion accumulation: one random-direction visibility test per pixel
//! per sample, summed into a ping-ponged pair of RGBA8 textures.

use bytemuck::{Pod, Zeroable};
use glam::Mat4;

use crate::error::SpeckleError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, create_uniform, depth_texture_2d, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;
use crate::renderer::impostor::GBuffer;
use crate::renderer::progress::{SampleStep, Slot};
use crate::view::{Resolution, ViewRect};

const ACCUMULATOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// Uniforms for one sample (matches `AccumulateUniforms` in
/// `accumulate.wgsl`).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AccumulateUniforms {
    /// Random rotation taking scene view space to the sample's view space.
    pub rot: [[f32; 4]; 4],
    /// Inverse of `rot`.
    pub inv_rot: [[f32; 4]; 4],
    /// Scene rectangle as `[left, right, bottom, top]`.
    pub scene_rect: [f32; 4],
    /// Random-rotation rectangle as `[left, right, bottom, top]`.
    pub rot_rect: [f32; 4],
    /// Depth extent.
    pub range: f32,
    /// Accumulator channel receiving this sample.
    pub channel: u32,
    /// Padding to 16-byte alignment.
    pub _pad: [f32; 2],
}

fn rect_array(rect: &ViewRect) -> [f32; 4] {
    [rect.left, rect.right, rect.bottom, rect.top]
}

impl AccumulateUniforms {
    /// Uniforms for a sample rotated by `rot`.
    #[must_use]
    pub fn new(
        rot: Mat4,
        scene_rect: &ViewRect,
        rot_rect: &ViewRect,
        range: f32,
        channel: u32,
    ) -> Self {
        Self {
            rot: rot.to_cols_array_2d(),
            inv_rot: rot.inverse().to_cols_array_2d(),
            scene_rect: rect_array(scene_rect),
            rot_rect: rect_array(rot_rect),
            range,
            channel,
            _pad: [0.0; 2],
        }
    }
}

/// Textures the accumulation shader reads.
pub struct AccumulateInputs<'a> {
    /// The user's view.
    pub scene: &'a GBuffer,
    /// The random-direction view.
    pub rand_rot: &'a GBuffer,
}

/// Accumulation pipeline and the accumulator pair.
pub struct AccumulatePass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    /// Indexed by the slot being read.
    bind_groups: [wgpu::BindGroup; 2],
    uniforms: wgpu::Buffer,
    targets: [RenderTarget; 2],
}

impl AccumulatePass {
    /// Build the pipeline and allocate both accumulators.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        inputs: &AccumulateInputs<'_>,
        resolution: Resolution,
    ) -> Result<Self, SpeckleError> {
        let device = &context.device;
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Accumulate Bind Group Layout"),
                entries: &[
                    depth_texture_2d(0),
                    texture_2d(1),
                    depth_texture_2d(2),
                    texture_2d(3),
                    uniform_buffer(4),
                ],
            });
        let shader = shader_composer.compose(device, Shader::Accumulate)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Accumulate",
            &shader,
            ACCUMULATOR_FORMAT,
            None,
            &[&bind_group_layout],
        );
        let uniforms = create_uniform(
            device,
            "Accumulate Uniforms",
            &AccumulateUniforms::zeroed(),
        );
        let targets = Self::create_targets(device, resolution);
        let bind_groups = Self::create_bind_groups(
            device,
            &bind_group_layout,
            inputs,
            &targets,
            &uniforms,
        );

        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_groups,
            uniforms,
            targets,
        })
    }

    fn create_targets(
        device: &wgpu::Device,
        resolution: Resolution,
    ) -> [RenderTarget; 2] {
        let target = |label: &str| {
            RenderTarget::new(
                device,
                label,
                resolution.width,
                resolution.height,
                ACCUMULATOR_FORMAT,
            )
        };
        [target("Accumulator A"), target("Accumulator B")]
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        inputs: &AccumulateInputs<'_>,
        targets: &[RenderTarget; 2],
        uniforms: &wgpu::Buffer,
    ) -> [wgpu::BindGroup; 2] {
        let bind_group = |read: Slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("Accumulate Bind Group (read {read:?})")),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &inputs.scene.depth.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            &inputs.scene.normal.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            &inputs.rand_rot.depth.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: wgpu::BindingResource::TextureView(
                            &targets[read.index()].view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 4,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        [bind_group(Slot::A), bind_group(Slot::B)]
    }

    /// Upload the uniforms for the next sample.
    pub fn update(&self, queue: &wgpu::Queue, uniforms: &AccumulateUniforms) {
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(uniforms));
    }

    /// Add one sample: read `step.read`, write `step.write`.
    pub fn render(&self, encoder: &mut wgpu::CommandEncoder, step: &SampleStep) {
        let target = &self.targets[step.write.index()];
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Accumulate Pass"),
            color_attachments: &[Some(
                target.clear_attachment(wgpu::Color::TRANSPARENT),
            )],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[step.read.index()], &[]);
        pass.draw(0..3, 0..1);
    }

    /// Zero both accumulators.
    pub fn clear(&self, encoder: &mut wgpu::CommandEncoder) {
        for target in &self.targets {
            let _ = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Accumulator Clear"),
                color_attachments: &[Some(
                    target.clear_attachment(wgpu::Color::TRANSPARENT),
                )],
                depth_stencil_attachment: None,
                ..Default::default()
            });
        }
    }

    /// Accumulator in `slot`.
    #[must_use]
    pub fn target(&self, slot: Slot) -> &RenderTarget {
        &self.targets[slot.index()]
    }

    /// Reallocate the accumulators and rebind against new inputs.
    pub fn resize(
        &mut self,
        device: &wgpu::Device,
        inputs: &AccumulateInputs<'_>,
        resolution: Resolution,
    ) {
        self.targets = Self::create_targets(device, resolution);
        self.bind_groups = Self::create_bind_groups(
            device,
            &self.bind_group_layout,
            inputs,
            &self.targets,
            &self.uniforms,
        );
    }
}

#[cfg(test)]
mod tests {
    use glam::{Vec2, Vec4};

    use super::*;

    #[test]
    fn uniform_layout_matches_shader() {
        assert_eq!(size_of::<AccumulateUniforms>(), 176);
    }

    #[test]
    fn inverse_undoes_rotation() {
        let rot = Mat4::from_rotation_y(0.7) * Mat4::from_rotation_x(-1.2);
        let rect = ViewRect::centered(Vec2::ZERO, 2.0, 1.0);
        let uniforms = AccumulateUniforms::new(rot, &rect, &rect, 3.0, 2);
        let back = Mat4::from_cols_array_2d(&uniforms.inv_rot)
            * Mat4::from_cols_array_2d(&uniforms.rot)
            * Vec4::new(0.3, -0.4, 0.5, 0.0);
        assert!(back.abs_diff_eq(Vec4::new(0.3, -0.4, 0.5, 0.0), 1e-5));
        assert_eq!(uniforms.scene_rect, [-1.0, 1.0, -0.5, 0.5]);
        assert_eq!(uniforms.channel, 2);
    }
}
