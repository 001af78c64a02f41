use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage,
    ShaderType,
};

use crate::error::SpeckleError;

/// Every shader the renderer builds a pipeline from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shader {
    /// Sphere impostors into the G-buffer.
    Atoms,
    /// Cylinder impostors into the G-buffer.
    Bonds,
    /// One ambient-occlusion sample into the accumulator.
    Accumulate,
    /// Shade the scene color by accumulated occlusion.
    Ao,
    /// Anti-aliasing pass.
    Fxaa,
    /// Depth-of-field blur.
    Dof,
    /// Blend onto the background and present.
    Display,
}

impl Shader {
    /// Every shader, in pipeline order.
    pub const ALL: [Shader; 7] = [
        Shader::Atoms,
        Shader::Bonds,
        Shader::Accumulate,
        Shader::Ao,
        Shader::Fxaa,
        Shader::Dof,
        Shader::Display,
    ];

    /// WGSL source text.
    #[must_use]
    pub fn source(self) -> &'static str {
        match self {
            Self::Atoms => {
                include_str!("../../assets/shaders/impostor/atoms.wgsl")
            }
            Self::Bonds => {
                include_str!("../../assets/shaders/impostor/bonds.wgsl")
            }
            Self::Accumulate => {
                include_str!("../../assets/shaders/screen/accumulate.wgsl")
            }
            Self::Ao => include_str!("../../assets/shaders/screen/ao.wgsl"),
            Self::Fxaa => include_str!("../../assets/shaders/screen/fxaa.wgsl"),
            Self::Dof => include_str!("../../assets/shaders/screen/dof.wgsl"),
            Self::Display => {
                include_str!("../../assets/shaders/screen/display.wgsl")
            }
        }
    }

    /// Path used in composer diagnostics.
    #[must_use]
    pub fn file_path(self) -> &'static str {
        match self {
            Self::Atoms => "impostor/atoms.wgsl",
            Self::Bonds => "impostor/bonds.wgsl",
            Self::Accumulate => "screen/accumulate.wgsl",
            Self::Ao => "screen/ao.wgsl",
            Self::Fxaa => "screen/fxaa.wgsl",
            Self::Dof => "screen/dof.wgsl",
            Self::Display => "screen/display.wgsl",
        }
    }
}

/// Shared module definition.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Shared modules, registered in dependency order.
const MODULES: &[ModuleDef] = &[
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
        file_path: "modules/fullscreen.wgsl",
    },
    ModuleDef {
        source: include_str!("../../assets/shaders/modules/impostor.wgsl"),
        file_path: "modules/impostor.wgsl",
    },
];

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` support.
///
/// Shared WGSL modules are registered at construction time; consuming
/// shaders pull them in with `#import speckle::module_name`. The composer
/// produces `naga::Module` IR directly, skipping a WGSL re-parse.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register the shared modules.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if a shared module fails to parse.
    pub fn new() -> Result<Self, SpeckleError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| {
                    SpeckleError::Shader(format!(
                        "module '{}': {e:?}",
                        m.file_path
                    ))
                })?;
        }
        Ok(Self { composer })
    }

    /// Compose `shader` into a `wgpu::ShaderModule` ready for pipeline
    /// creation.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        shader: Shader,
    ) -> Result<wgpu::ShaderModule, SpeckleError> {
        let module = self.compose_naga(shader)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(shader.file_path()),
            source: wgpu::ShaderSource::Naga(Cow::Owned(module)),
        }))
    }

    /// Compose into a `naga::Module` without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Shader`] if composition fails.
    pub fn compose_naga(
        &mut self,
        shader: Shader,
    ) -> Result<naga::Module, SpeckleError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source: shader.source(),
                file_path: shader.file_path(),
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| {
                SpeckleError::Shader(format!("'{}': {e}", shader.file_path()))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for shader in Shader::ALL {
            if let Err(e) = composer.compose_naga(shader) {
                panic!("{e}");
            }
        }
    }
}
