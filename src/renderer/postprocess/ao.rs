//! Occlusion composite: scene color darkened by the accumulated occlusion
//! estimate, with an optional depth-discontinuity outline.

use bytemuck::{Pod, Zeroable};

use super::accumulate::AccumulatePass;
use super::chain::POST_FORMAT;
use crate::error::SpeckleError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, create_uniform, depth_texture_2d, texture_2d,
    uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::gpu::texture::RenderTarget;
use crate::renderer::impostor::GBuffer;
use crate::renderer::progress::Slot;
use crate::view::ViewState;

/// Matches `AoUniforms` in `ao.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct AoUniforms {
    /// Occlusion strength.
    pub ao: f32,
    /// Output multiplier.
    pub brightness: f32,
    /// Outline strength; zero disables the outline.
    pub outline: f32,
    /// Padding.
    pub _pad: f32,
}

impl AoUniforms {
    /// Uniforms for `state`; strength and brightness span `[0, 2]`.
    #[must_use]
    pub fn new(state: &ViewState) -> Self {
        Self {
            ao: 2.0 * state.ao,
            brightness: 2.0 * state.brightness,
            outline: state.outline,
            _pad: 0.0,
        }
    }
}

/// Composite pipeline with one bind group per accumulator.
pub struct AoPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_groups: [wgpu::BindGroup; 2],
    uniforms: wgpu::Buffer,
}

impl AoPass {
    /// Build the pipeline and bind against the scene and accumulators.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        scene: &GBuffer,
        accumulate: &AccumulatePass,
    ) -> Result<Self, SpeckleError> {
        let device = &context.device;
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("AO Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    depth_texture_2d(1),
                    texture_2d(2),
                    uniform_buffer(3),
                ],
            });
        let shader = shader_composer.compose(device, Shader::Ao)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "AO",
            &shader,
            POST_FORMAT,
            None,
            &[&bind_group_layout],
        );
        let uniforms =
            create_uniform(device, "AO Uniforms", &AoUniforms::zeroed());
        let bind_groups = Self::create_bind_groups(
            device,
            &bind_group_layout,
            scene,
            accumulate,
            &uniforms,
        );
        Ok(Self {
            pipeline,
            bind_group_layout,
            bind_groups,
            uniforms,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        scene: &GBuffer,
        accumulate: &AccumulatePass,
        uniforms: &wgpu::Buffer,
    ) -> [wgpu::BindGroup; 2] {
        let bind_group = |slot: Slot| {
            device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some(&format!("AO Bind Group ({slot:?})")),
                layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(
                            &scene.color.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::TextureView(
                            &scene.depth.view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 2,
                        resource: wgpu::BindingResource::TextureView(
                            &accumulate.target(slot).view,
                        ),
                    },
                    wgpu::BindGroupEntry {
                        binding: 3,
                        resource: uniforms.as_entire_binding(),
                    },
                ],
            })
        };
        [bind_group(Slot::A), bind_group(Slot::B)]
    }

    /// Upload uniforms for `state`.
    pub fn update(&self, queue: &wgpu::Queue, state: &ViewState) {
        queue.write_buffer(
            &self.uniforms,
            0,
            bytemuck::bytes_of(&AoUniforms::new(state)),
        );
    }

    /// Composite using the accumulator in `slot` into `output`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        slot: Slot,
        output: &RenderTarget,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("AO Pass"),
            color_attachments: &[Some(
                output.clear_attachment(wgpu::Color::TRANSPARENT),
            )],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[slot.index()], &[]);
        pass.draw(0..3, 0..1);
    }

    /// Rebind after the scene or accumulators were reallocated.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        scene: &GBuffer,
        accumulate: &AccumulatePass,
    ) {
        self.bind_groups = Self::create_bind_groups(
            device,
            &self.bind_group_layout,
            scene,
            accumulate,
            &self.uniforms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strengths_are_doubled() {
        let state = ViewState {
            ao: 0.75,
            brightness: 0.5,
            outline: 0.25,
            ..ViewState::default()
        };
        let uniforms = AoUniforms::new(&state);
        assert_eq!(uniforms.ao, 1.5);
        assert_eq!(uniforms.brightness, 1.0);
        assert_eq!(uniforms.outline, 0.25);
        assert_eq!(size_of::<AoUniforms>(), 16);
    }
}
