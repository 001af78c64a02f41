//! FXAA post-process pass: edge-aware smoothing, run any number of times
//! between the two antialiasing buffers.

use super::chain::{ChainTexture, PostTargets, POST_FORMAT};
use crate::error::SpeckleError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, filtering_sampler, linear_sampler, texture_2d,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// FXAA pipeline with one bind group per possible source.
pub struct FxaaPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_groups: Vec<wgpu::BindGroup>,
}

impl FxaaPass {
    /// Build the pipeline and bind every post-process target as a source.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
        targets: &PostTargets,
    ) -> Result<Self, SpeckleError> {
        let device = &context.device;
        let sampler = linear_sampler(device, "FXAA Sampler");
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("FXAA Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1)],
            });
        let shader = shader_composer.compose(device, Shader::Fxaa)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "FXAA",
            &shader,
            POST_FORMAT,
            None,
            &[&bind_group_layout],
        );
        let bind_groups =
            Self::create_bind_groups(device, &bind_group_layout, &sampler, targets);
        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler,
            bind_groups,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        targets: &PostTargets,
    ) -> Vec<wgpu::BindGroup> {
        ChainTexture::ALL
            .iter()
            .map(|&source| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("FXAA Bind Group ({source:?})")),
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
                    ],
                })
            })
            .collect()
    }

    /// One FXAA application from `source` into `dest`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        targets: &PostTargets,
        source: ChainTexture,
        dest: ChainTexture,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("FXAA Pass"),
            color_attachments: &[Some(
                targets.get(dest).clear_attachment(wgpu::Color::TRANSPARENT),
            )],
            depth_stencil_attachment: None,
            ..Default::default()
        });
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_groups[source.index()], &[]);
        pass.draw(0..3, 0..1);
    }

    /// Rebind after the targets were reallocated.
    pub fn rebind(&mut self, device: &wgpu::Device, targets: &PostTargets) {
        self.bind_groups = Self::create_bind_groups(
            device,
            &self.bind_group_layout,
            &self.sampler,
            targets,
        );
    }
}
