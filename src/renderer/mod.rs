//! Progressive ambient-occlusion renderer.
//!
//! Each frame either draws the color pass (first frame after a reset) or
//! adds up to `spf` occlusion samples, then composites, antialiases,
//! applies depth of field and presents. Samples accumulate across frames
//! until [`progress::MAX_SAMPLES`].

pub mod camera;
pub mod impostor;
pub mod instances;
pub mod postprocess;
pub mod progress;

use rand::rngs::ThreadRng;

use self::camera::{random_rotation, PassCamera};
use self::impostor::{ImpostorRenderer, ImpostorUniforms, ImpostorView};
use self::postprocess::accumulate::{
    AccumulateInputs, AccumulatePass, AccumulateUniforms,
};
use self::postprocess::ao::AoPass;
use self::postprocess::chain::{ChainTexture, PostChain, PostTargets};
use self::postprocess::display::DisplayPass;
use self::postprocess::dof::DofPass;
use self::postprocess::fxaa::FxaaPass;
use self::progress::{FramePlan, Progress};
use crate::error::SpeckleError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::structure::Structure;
use crate::view::{Resolution, ViewState};

/// Owns every pass and the progressive sampling state.
///
/// The renderer never decides on its own that accumulated samples are
/// stale: callers invoke [`reset`](Self::reset) after any change that
/// affects shading.
pub struct Renderer {
    impostors: ImpostorRenderer,
    scene: ImpostorView,
    rand_rot: ImpostorView,
    accumulate: AccumulatePass,
    ao: AoPass,
    targets: PostTargets,
    fxaa: FxaaPass,
    dof: DofPass,
    display: DisplayPass,
    progress: Progress,
    structure: Option<Structure>,
    resolution: Resolution,
    ao_resolution: Resolution,
    background: [f32; 3],
    rng: ThreadRng,
}

impl Renderer {
    /// Compile every pipeline and allocate targets.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if any shader fails to compose.
    pub fn new(
        context: &RenderContext,
        resolution: Resolution,
        ao_resolution: Resolution,
    ) -> Result<Self, SpeckleError> {
        let mut composer = ShaderComposer::new()?;
        let impostors = ImpostorRenderer::new(context, &mut composer)?;
        let layout = impostors.uniform_layout();
        let scene = ImpostorView::new(context, layout, "Scene", resolution);
        let rand_rot =
            ImpostorView::new(context, layout, "Random Rotation", ao_resolution);

        let accumulate = AccumulatePass::new(
            context,
            &mut composer,
            &AccumulateInputs {
                scene: &scene.gbuffer,
                rand_rot: &rand_rot.gbuffer,
            },
            resolution,
        )?;
        let ao = AoPass::new(context, &mut composer, &scene.gbuffer, &accumulate)?;
        let targets = PostTargets::new(&context.device, resolution);
        let fxaa = FxaaPass::new(context, &mut composer, &targets)?;
        let dof = DofPass::new(
            context,
            &mut composer,
            &targets,
            &scene.gbuffer.depth.view,
        )?;
        let display = DisplayPass::new(context, &mut composer, &targets)?;

        log::info!(
            "renderer: {}x{} (occlusion {}x{})",
            resolution.width,
            resolution.height,
            ao_resolution.width,
            ao_resolution.height
        );

        Ok(Self {
            impostors,
            scene,
            rand_rot,
            accumulate,
            ao,
            targets,
            fxaa,
            dof,
            display,
            progress: Progress::default(),
            structure: None,
            resolution,
            ao_resolution,
            background: [0.0; 3],
            rng: rand::rng(),
        })
    }

    /// Upload `structure`'s atoms and the bonds within
    /// `state.bond_threshold`, then reset.
    pub fn set_structure(
        &mut self,
        context: &RenderContext,
        structure: Structure,
        state: &ViewState,
    ) {
        let atoms = instances::atom_instances(&structure);
        self.impostors.set_atoms(context, &atoms);
        log::info!(
            "structure: {} atoms, {} bonds, radius {:.2}",
            atoms.len(),
            structure.bonds.len(),
            structure.radius
        );
        self.structure = Some(structure);
        self.update_bonds(context, state);
        self.reset();
    }

    /// Re-upload bonds after `state.bond_threshold` changed. Does not reset.
    pub fn update_bonds(&mut self, context: &RenderContext, state: &ViewState) {
        let Some(structure) = &self.structure else {
            return;
        };
        let bonds = instances::bond_instances(
            structure,
            f64::from(state.bond_threshold),
        );
        log::debug!(
            "{} of {} bonds within threshold {}",
            bonds.len(),
            structure.bonds.len(),
            state.bond_threshold
        );
        self.impostors.set_bonds(context, &bonds);
    }

    /// The loaded structure, if any.
    #[must_use]
    pub fn structure(&self) -> Option<&Structure> {
        self.structure.as_ref()
    }

    /// Reallocate every target and discard accumulated samples.
    pub fn set_resolution(
        &mut self,
        context: &RenderContext,
        resolution: Resolution,
        ao_resolution: Resolution,
    ) {
        let device = &context.device;
        self.resolution = resolution;
        self.ao_resolution = ao_resolution;

        self.scene.resize(device, resolution);
        self.rand_rot.resize(device, ao_resolution);
        self.accumulate.resize(
            device,
            &AccumulateInputs {
                scene: &self.scene.gbuffer,
                rand_rot: &self.rand_rot.gbuffer,
            },
            resolution,
        );
        self.ao.rebind(device, &self.scene.gbuffer, &self.accumulate);
        self.targets = PostTargets::new(device, resolution);
        self.fxaa.rebind(device, &self.targets);
        self.dof
            .rebind(device, &self.targets, &self.scene.gbuffer.depth.view);
        self.display.rebind(device, &self.targets);

        log::debug!(
            "resolution {}x{}, occlusion {}x{}",
            resolution.width,
            resolution.height,
            ao_resolution.width,
            ao_resolution.height
        );
        self.reset();
    }

    /// Main render resolution.
    #[must_use]
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Random-rotation pass resolution.
    #[must_use]
    pub fn ao_resolution(&self) -> Resolution {
        self.ao_resolution
    }

    /// Colour shown behind the structure.
    pub fn set_background(&mut self, background: [f32; 3]) {
        self.background = background;
    }

    /// Discard accumulated samples; the next frame redraws color.
    pub fn reset(&mut self) {
        self.progress.reset();
    }

    /// Progressive sampling state.
    #[must_use]
    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    /// Render one frame of `state` into `output`.
    ///
    /// With no structure loaded the color and sampling steps are skipped
    /// and only the background is shown.
    pub fn render(
        &mut self,
        context: &RenderContext,
        state: &ViewState,
        output: &wgpu::TextureView,
    ) {
        if let Some(range) = self.structure.as_ref().map(|s| s.range() as f32) {
            match self.progress.begin_frame(state.spf) {
                FramePlan::Color => self.color(context, state, range),
                FramePlan::Samples(n) => {
                    for _ in 0..n {
                        self.sample(context, state, range);
                    }
                }
            }
        }
        self.composite(context, state, output);
    }

    /// Acquire the next surface texture, render into it and present.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface cannot provide a
    /// texture.
    pub fn render_frame(
        &mut self,
        context: &RenderContext,
        state: &ViewState,
    ) -> Result<(), wgpu::SurfaceError> {
        let frame = context.get_next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.render(context, state, &view);
        frame.present();
        Ok(())
    }

    fn color(&mut self, context: &RenderContext, state: &ViewState, range: f32) {
        let camera = PassCamera::scene(state, self.resolution, range);
        self.scene
            .update(&context.queue, &ImpostorUniforms::new(&camera, state));

        let mut encoder = context.create_encoder("Color Encoder");
        self.impostors.draw(&mut encoder, &self.scene, state.bonds);
        self.accumulate.clear(&mut encoder);
        context.submit(encoder);
    }

    fn sample(&mut self, context: &RenderContext, state: &ViewState, range: f32) {
        let Some(step) = self.progress.advance() else {
            return;
        };
        let rot = random_rotation(&mut self.rng);
        let scene = PassCamera::scene(state, self.resolution, range);
        let rand_rot =
            PassCamera::rand_rot(state, rot, self.resolution.aspect, range);
        self.rand_rot
            .update(&context.queue, &ImpostorUniforms::new(&rand_rot, state));
        self.accumulate.update(
            &context.queue,
            &AccumulateUniforms::new(
                rot,
                &scene.rect,
                &rand_rot.rect,
                range,
                step.channel,
            ),
        );

        // Uniforms are rewritten per sample, so each sample is its own
        // submission.
        let mut encoder = context.create_encoder("Sample Encoder");
        self.impostors.draw(&mut encoder, &self.rand_rot, state.bonds);
        self.accumulate.render(&mut encoder, &step);
        context.submit(encoder);
    }

    fn composite(
        &self,
        context: &RenderContext,
        state: &ViewState,
        output: &wgpu::TextureView,
    ) {
        let chain = PostChain::plan(state.fxaa, state.dof_strength > 0.0);
        self.ao.update(&context.queue, state);
        self.dof.update(&context.queue, state);
        self.display
            .update(&context.queue, self.background, context.size());

        let mut encoder = context.create_encoder("Composite Encoder");
        self.ao.render(
            &mut encoder,
            self.progress.current(),
            self.targets.get(ChainTexture::Composite),
        );
        for &(source, dest) in &chain.fxaa {
            self.fxaa.render(&mut encoder, &self.targets, source, dest);
        }
        if let Some(source) = chain.dof {
            self.dof.render(&mut encoder, &self.targets, source);
        }
        self.display.render(&mut encoder, chain.output, output);
        context.submit(encoder);
    }
}
