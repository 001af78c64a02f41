//! Post-process targets and the order passes read and write them in.

use crate::gpu::texture::RenderTarget;
use crate::view::Resolution;

/// Format of every post-process target.
pub const POST_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

/// A post-process texture that can feed the next pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainTexture {
    /// Output of the occlusion composite.
    Composite,
    /// First antialiasing buffer.
    FxaaA,
    /// Second antialiasing buffer.
    FxaaB,
    /// Depth-of-field output.
    Dof,
}

impl ChainTexture {
    /// Every texture, in [`index`](Self::index) order.
    pub const ALL: [ChainTexture; 4] = [
        ChainTexture::Composite,
        ChainTexture::FxaaA,
        ChainTexture::FxaaB,
        ChainTexture::Dof,
    ];

    /// Array index for per-source bind groups.
    #[must_use]
    pub fn index(self) -> usize {
        match self {
            Self::Composite => 0,
            Self::FxaaA => 1,
            Self::FxaaB => 2,
            Self::Dof => 3,
        }
    }
}

/// Reads and writes of one frame's post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostChain {
    /// `(source, destination)` of each antialiasing pass, in order.
    pub fxaa: Vec<(ChainTexture, ChainTexture)>,
    /// Source of the depth-of-field pass, when it runs.
    pub dof: Option<ChainTexture>,
    /// Texture shown by the display pass.
    pub output: ChainTexture,
}

impl PostChain {
    /// Plan `fxaa` antialiasing passes ping-ponging between the two
    /// buffers, then depth of field if `dof` is set.
    #[must_use]
    pub fn plan(fxaa: u32, dof: bool) -> Self {
        let mut source = ChainTexture::Composite;
        let fxaa = (0..fxaa)
            .map(|_| {
                let dest = match source {
                    ChainTexture::FxaaA => ChainTexture::FxaaB,
                    _ => ChainTexture::FxaaA,
                };
                let pass = (source, dest);
                source = dest;
                pass
            })
            .collect();

        let dof = dof.then_some(source);
        let output = if dof.is_some() { ChainTexture::Dof } else { source };
        Self { fxaa, dof, output }
    }
}

/// The four post-process render targets.
pub struct PostTargets {
    targets: [RenderTarget; 4],
}

impl PostTargets {
    /// Allocate every target at `resolution`.
    #[must_use]
    pub fn new(device: &wgpu::Device, resolution: Resolution) -> Self {
        let target = |label: &str| {
            RenderTarget::new(
                device,
                label,
                resolution.width,
                resolution.height,
                POST_FORMAT,
            )
        };
        Self {
            targets: [
                target("Composite Target"),
                target("FXAA Target A"),
                target("FXAA Target B"),
                target("DOF Target"),
            ],
        }
    }

    /// Target backing `texture`.
    #[must_use]
    pub fn get(&self, texture: ChainTexture) -> &RenderTarget {
        &self.targets[texture.index()]
    }

    /// View of `texture`.
    #[must_use]
    pub fn view(&self, texture: ChainTexture) -> &wgpu::TextureView {
        &self.get(texture).view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::ChainTexture::{Composite, Dof, FxaaA, FxaaB};

    #[test]
    fn no_post_processing_shows_composite() {
        let chain = PostChain::plan(0, false);
        assert!(chain.fxaa.is_empty());
        assert_eq!(chain.dof, None);
        assert_eq!(chain.output, Composite);
    }

    #[test]
    fn three_fxaa_passes_ping_pong() {
        let chain = PostChain::plan(3, false);
        assert_eq!(
            chain.fxaa,
            vec![(Composite, FxaaA), (FxaaA, FxaaB), (FxaaB, FxaaA)]
        );
        assert_eq!(chain.output, FxaaA);
    }

    #[test]
    fn passes_never_read_their_target() {
        for n in 0..=32 {
            for (source, dest) in PostChain::plan(n, true).fxaa {
                assert_ne!(source, dest);
            }
        }
    }

    #[test]
    fn dof_reads_last_fxaa_output() {
        let chain = PostChain::plan(2, true);
        assert_eq!(chain.dof, Some(FxaaB));
        assert_eq!(chain.output, Dof);

        let chain = PostChain::plan(0, true);
        assert_eq!(chain.dof, Some(Composite));
    }

    #[test]
    fn indices_are_distinct() {
        for (i, texture) in ChainTexture::ALL.iter().enumerate() {
            assert_eq!(texture.index(), i);
        }
    }
}
