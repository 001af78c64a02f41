// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Progressive ambient-occlusion molecule viewer built on wgpu.
//!
//! Speckle loads a single XYZ structure, derives its bonds from covalent
//! radii and renders atoms and bonds as ray-cast impostors. Ambient
//! occlusion is refined a few samples per frame from randomly rotated
//! depth maps until 1024 samples have been accumulated. The composite is
//! outlined and antialiased, with an optional depth-of-field blur.
//!
//! # Key entry points
//!
//! - [`structure::Structure`] - parsed, centred atoms and detected bonds
//! - [`view::ViewState`] - camera and shading parameters every pass reads
//! - [`renderer::Renderer`] - the multi-pass progressive renderer
//! - [`options::Preset`] - named bundles of view settings
//! - [`Viewer`] - a standalone window (feature `viewer`)
//!
//! # Frame structure
//!
//! After any reset the next frame draws the color, normal and depth
//! G-buffer. Every later frame draws the structure from `spf` random
//! directions and adds each visibility test into a ping-ponged
//! accumulator. Every frame then composites occlusion and outlines,
//! applies the FXAA chain and the depth-of-field blur, and blends onto the
//! background.

pub mod error;
pub mod gpu;
pub mod input;
pub mod options;
pub mod renderer;
pub mod structure;
pub mod view;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use error::SpeckleError;
pub use renderer::Renderer;
pub use structure::Structure;
pub use view::ViewState;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
