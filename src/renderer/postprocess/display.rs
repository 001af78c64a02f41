//! Final pass: composite the frame over the background onto the output.

use bytemuck::{Pod, Zeroable};

use super::chain::{ChainTexture, PostTargets};
use crate::error::SpeckleError;
use crate::gpu::pipeline_helpers::{
    create_screen_space_pipeline, create_uniform, filtering_sampler,
    linear_sampler, texture_2d, uniform_buffer,
};
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};

/// Matches `DisplayUniforms` in `display.wgsl`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct DisplayUniforms {
    /// Colour behind transparent pixels.
    pub background: [f32; 3],
    /// 1.0 when the output format encodes to sRGB.
    pub srgb: f32,
    /// Output size in pixels.
    pub size: [f32; 2],
    /// Padding.
    pub _pad: [f32; 2],
}

impl DisplayUniforms {
    /// Uniforms for an output of `format` and `size`.
    #[must_use]
    pub fn new(background: [f32; 3], format: wgpu::TextureFormat, size: (u32, u32)) -> Self {
        Self {
            background,
            srgb: if format.is_srgb() { 1.0 } else { 0.0 },
            size: [size.0.max(1) as f32, size.1.max(1) as f32],
            _pad: [0.0; 2],
        }
    }
}

/// Display pipeline targeting the output format.
pub struct DisplayPass {
    pipeline: wgpu::RenderPipeline,
    bind_group_layout: wgpu::BindGroupLayout,
    sampler: wgpu::Sampler,
    bind_groups: Vec<wgpu::BindGroup>,
    uniforms: wgpu::Buffer,
    format: wgpu::TextureFormat,
}

impl DisplayPass {
    /// Build the pipeline for `context.format()`.
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
        let format = context.format();
        let sampler = linear_sampler(device, "Display Sampler");
        let bind_group_layout =
            device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                label: Some("Display Bind Group Layout"),
                entries: &[texture_2d(0), filtering_sampler(1), uniform_buffer(2)],
            });
        let shader = shader_composer.compose(device, Shader::Display)?;
        let pipeline = create_screen_space_pipeline(
            device,
            "Display",
            &shader,
            format,
            None,
            &[&bind_group_layout],
        );
        let uniforms = create_uniform(
            device,
            "Display Uniforms",
            &DisplayUniforms::new([0.0; 3], format, context.size()),
        );
        let bind_groups = Self::create_bind_groups(
            device,
            &bind_group_layout,
            &sampler,
            targets,
            &uniforms,
        );
        Ok(Self {
            pipeline,
            bind_group_layout,
            sampler,
            bind_groups,
            uniforms,
            format,
        })
    }

    fn create_bind_groups(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        sampler: &wgpu::Sampler,
        targets: &PostTargets,
        uniforms: &wgpu::Buffer,
    ) -> Vec<wgpu::BindGroup> {
        ChainTexture::ALL
            .iter()
            .map(|&source| {
                device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("Display Bind Group ({source:?})")),
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
                            resource: uniforms.as_entire_binding(),
                        },
                    ],
                })
            })
            .collect()
    }

    /// Upload background colour and output size.
    pub fn update(&self, queue: &wgpu::Queue, background: [f32; 3], size: (u32, u32)) {
        let uniforms = DisplayUniforms::new(background, self.format, size);
        queue.write_buffer(&self.uniforms, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Draw `source` to `output`.
    pub fn render(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        source: ChainTexture,
        output: &wgpu::TextureView,
    ) {
        let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Display Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: output,
                depth_slice: None,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                    store: wgpu::StoreOp::Store,
                },
            })],
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
            &self.uniforms,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn srgb_flag_follows_format() {
        let srgb = DisplayUniforms::new(
            [1.0, 1.0, 1.0],
            wgpu::TextureFormat::Bgra8UnormSrgb,
            (640, 480),
        );
        assert_eq!(srgb.srgb, 1.0);
        assert_eq!(srgb.size, [640.0, 480.0]);

        let linear =
            DisplayUniforms::new([0.0; 3], wgpu::TextureFormat::Rgba8Unorm, (0, 0));
        assert_eq!(linear.srgb, 0.0);
        assert_eq!(linear.size, [1.0, 1.0]);
        assert_eq!(size_of::<DisplayUniforms>(), 32);
    }
}
