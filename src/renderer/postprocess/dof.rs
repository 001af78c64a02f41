//! Depth-of-field pass.
//!
//! Blurs each pixel over a disc whose radius grows with its depth's
//! distance from the focal plane at `dof_position`.

use bytemuck::{Pod, Zeroable};

use super::chain::{ChainTexture, PostTargets, POST_FORMAT};
use crate::error::SpeckleError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, create_uniform, depth_texture_2d,
    filtering_sampler, linear_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::view::ViewState;

/// Matches `DofUniforms` in `dof.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DofUniforms {
    /// Focal depth in `[0, 1]`.
    pub position: f32,
    /// Blur strength in `[0, 1]`.
    pub strength: f32,
    /// Padding.
    pub _pad: [f32; 2],
}

/// DOF pipeline with one bind group per possible source.
pub struct DofPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_groups: Vec<wgpu::BindGroup>,
    uniforms: wgpu::Buffer,
}

impl DofPass {
    /// Build the pipeline and bind every target with the scene depth.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        targets: &PostTargets,
        depth: &wgpu::TextureView,
    ) -> Result<Self, SpeckleError> {
        let device = &context.device;
        let sampler = linear_sampler(device, "DOF Sampler");
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("DOF Bind Group Layout"),
                entries: &[
                    texture_2d(0),
                    filtering_sampler(1),
                    depth_texture_2d(2),
                    uniform_buffer(3),
                ],
            });
        let shader = shader_composer.compose(device, Shader::Dof)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "DOF",
            &shader,
            POST_FORMAT,
            None,
            &[&bind_group_layout],
        );
        let uniforms =
            create_uniform(device, "DOF Uniforms", &DofUniforms::zeroed());
        let bind_groups = Self::create_bind_groups(
            device,
            &bind_group_layout,
            &sampler,
            targets,
            depth,
            &uniforms,
        );
        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler,
            bind_groups,
            uniforms,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        targets: &PostTargets,
        depth: &wgpu::TextureView,
        uniforms: &wgpu::Buffer,
    ) -> Vec<wgpu::BindGroup> {
        ChainTexture::ALL
            .iter()
            .map(|&source| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("DOF Bind Group ({source:?})")),
                    layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: wgpu::BindingResource::TextureView(
                                targets.view(source),
                            ),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::Sampler(sampler),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::TextureView(depth),
                        },
                        wgpu::BindGroupEntry {
                            binding: 3,
                            resource: uniforms.as_entire_binding(),
                        },
                    ],
                })
            })
            .collect()
    }

    /// Upload focal position and strength from `state`.
    pub fn update(&self, queue: &wgpu::Queue, state: &ViewState) {
        let uniforms = DofUniforms {
            position: state.dof_position,
            strength: state.dof_strength,
            _pad: [0.0; 2],
        };
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Blur `source` into the DOF target.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &PostTargets,
        source: ChainTexture,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("DOF Pass"),
            color_attachments: &[Some(
                targets
                    .get(ChainTexture::Dof)
                    .clear_attachment(wgpu::Color::TRANSPARENT),
            )],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[source.index()], &[]);
        pass.draw(0..3, 0..1);
    }

    /// Rebind after the targets or scene depth were reallocated.
    pub fn rebind(
        &mut self,
        device: &wgpu::Device,
        targets: &PostTargets,
        depth: &wgpu::TextureView,
    ) {
        self.bind_groups = Self::create_bind_groups(
            device,
            &self.bind_group_layout,
            &self.sampler,
            targets,
            depth,
            &self.uniforms,
        );
    }
}
