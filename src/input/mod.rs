//! Input handling: platform-agnostic events and the processor that turns
//! them into view mutations.

/// Platform-agnostic input events.
pub mod event;
/// Converts raw events into view commands.
pub mod processor;

pub use event::{InputEvent, MouseButton};
pub use processor::{InputProcessor, KeyAction, ViewCommand};
