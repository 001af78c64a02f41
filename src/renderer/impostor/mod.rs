//! Impostor geometry passes.
//!
//! Atoms and bonds follow the same pattern: one storage buffer of
//! instances, one bind group, one pipeline, and a
//! `draw(0..36, 0..instance_count)` call over a unit cube that the fragment
//! shader carves into a sphere or cylinder. `ImpostorPass<T>` holds that
//! boilerplate; [`ImpostorView`] holds one camera and the G-buffer it draws
//! into.

mod view;

use bytemuck::{Pod, Zeroable};
pub use view::{GBuffer, ImpostorUniforms, ImpostorView};

use crate::error::SpeckleError;
use crate::gpu::dynamic_buffer::TypedBuffer;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::{Shader, ShaderComposer};
use crate::renderer::instances::{AtomInstance, BondInstance};

/// Vertices in the cube every impostor rasterizes.
pub const CUBE_VERTICES: u32 = 36;

/// A single impostor draw pass: pipeline + typed storage buffer + bind
/// group.
///
/// Bind group convention:
/// - group(0): storage buffer (instances)
/// - group(1): [`ImpostorUniforms`]
pub struct ImpostorPass<T: Pod + Zeroable> {
    pipeline: wgpu::RenderPipeline,
    instance_buffer: TypedBuffer<T>,
    bind_group_layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    instance_count: u32,
    label: &'static str,
}

impl<T: Pod + Zeroable> ImpostorPass<T> {
    /// Create an empty pass drawing with `shader`.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if the shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader: Shader,
        label: &'static str,
        uniform_layout: &wgpu::BindGroupLayout,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, SpeckleError> {
        let instance_buffer = TypedBuffer::new_with_data(
            &context.device,
            &format!("{label} Instances"),
            &[],
            wgpu::BufferUsages::STORAGE,
        );
        let bind_group_layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some(&format!("{label} Instance Layout")),
                entries: &[pipeline_helpers::vertex_storage_buffer(0)],
            },
        );
        let bind_group = Self::create_bind_group(
            &context.device,
            &bind_group_layout,
            &instance_buffer,
            label,
        );
        let module = shader_composer.compose(&context.device, shader)?;
        let pipeline = Self::create_pipeline(
            &context.device,
            &module,
            label,
            &bind_group_layout,
            uniform_layout,
        );

        Ok(Self {
            pipeline,
            instance_buffer,
            bind_group_layout,
            bind_group,
            instance_count: 0,
            label,
        })
    }

    fn create_bind_group(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        buffer: &TypedBuffer<T>,
        label: &str,
    ) -> wgpu::BindGroup {
        device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.buffer().as_entire_binding(),
            }],
            label: Some(&format!("{label} Instance Bind Group")),
        })
    }

    fn create_pipeline(
        device: &wgpu::Device,
        shader: &wgpu::ShaderModule,
        label: &str,
        instance_layout: &wgpu::BindGroupLayout,
        uniform_layout: &wgpu::BindGroupLayout,
    ) -> wgpu::RenderPipeline {
        let pipeline_layout =
            device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some(&format!("{label} Pipeline Layout")),
                bind_group_layouts: &[instance_layout, uniform_layout],
                push_constant_ranges: &[],
            });

        device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(&format!("{label} Pipeline")),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: shader,
                entry_point: Some("fs_main"),
                targets: &GBuffer::fragment_targets(),
                compilation_options: Default::default(),
            }),
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(pipeline_helpers::depth_stencil_state()),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        })
    }

    /// Upload instances. Recreates the bind group if the buffer grew.
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[T],
    ) {
        let zeroed = [T::zeroed()];
        let data = if instances.is_empty() { &zeroed[..] } else { instances };
        if self.instance_buffer.write(device, queue, data) {
            self.bind_group = Self::create_bind_group(
                device,
                &self.bind_group_layout,
                &self.instance_buffer,
                self.label,
            );
        }
        self.instance_count = instances.len() as u32;
    }

    /// Set the pipeline and bind groups, then draw every instance.
    pub fn draw<'a>(
        &'a self,
        render_pass: &mut wgpu::RenderPass<'a>,
        uniforms: &'a wgpu::BindGroup,
    ) {
        if self.instance_count == 0 {
            return;
        }
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &self.bind_group, &[]);
        render_pass.set_bind_group(1, uniforms, &[]);
        render_pass.draw(0..CUBE_VERTICES, 0..self.instance_count);
    }
}

/// Atom and bond passes sharing one uniform layout.
pub struct ImpostorRenderer {
    atoms: ImpostorPass<AtomInstance>,
    bonds: ImpostorPass<BondInstance>,
    uniform_layout: wgpu::BindGroupLayout,
}

impl ImpostorRenderer {
    /// Build both pipelines.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if either shader fails to compose.
    pub fn new(
        context: &RenderContext,
        shader_composer: &mut ShaderComposer,
    ) -> Result<Self, SpeckleError> {
        let uniform_layout = ImpostorView::create_layout(&context.device);
        let atoms = ImpostorPass::new(
            context,
            Shader::Atoms,
            "Atoms",
            &uniform_layout,
            shader_composer,
        )?;
        let bonds = ImpostorPass::new(
            context,
            Shader::Bonds,
            "Bonds",
            &uniform_layout,
            shader_composer,
        )?;
        Ok(Self {
            atoms,
            bonds,
            uniform_layout,
        })
    }

    /// Layout of the per-view uniform bind group.
    #[must_use]
    pub fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    /// Replace the atom instances.
    pub fn set_atoms(&mut self, context: &RenderContext, atoms: &[AtomInstance]) {
        self.atoms
            .write_instances(&context.device, &context.queue, atoms);
    }

    /// Replace the bond instances.
    pub fn set_bonds(&mut self, context: &RenderContext, bonds: &[BondInstance]) {
        self.bonds
            .write_instances(&context.device, &context.queue, bonds);
    }

    /// Clear `view`'s G-buffer and draw atoms (and bonds when `bonds` is
    /// set) into it.
    pub fn draw(
        &self,
        encoder: &mut wgpu::CommandEncoder,
        view: &ImpostorView,
        bonds: bool,
    ) {
        let mut render_pass = view.gbuffer.begin_pass(encoder, view.label());
        self.atoms.draw(&mut render_pass, view.bind_group());
        if bonds {
            self.bonds.draw(&mut render_pass, view.bind_group());
        }
    }
}
