//! Camera/view state and its shareable encoding.

pub mod share;
pub mod state;

pub use share::SharePayload;
pub use state::{Resolution, ViewOverrides, ViewRect, ViewState};
