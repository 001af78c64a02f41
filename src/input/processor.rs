//! Converts raw platform events into view commands.
//!
//! The `InputProcessor` owns the transient mouse state (last cursor
//! position, held buttons, shift) and the sensitivity multipliers from
//! [`ControlOptions`]. Commands mutate a [`ViewState`] through
//! [`ViewCommand::apply`], which reports whether accumulated shading is now
//! stale.

use glam::Vec2;

use super::event::{InputEvent, MouseButton};
use crate::options::ControlOptions;
use crate::view::{Resolution, ViewState};

/// A camera mutation produced by the mouse.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Orbit by a cursor delta in pixels.
    Rotate {
        /// Scaled cursor delta.
        delta: Vec2,
    },
    /// Translate by a cursor delta in pixels.
    Pan {
        /// Scaled cursor delta.
        delta: Vec2,
    },
    /// Zoom by wheel steps.
    Zoom {
        /// Scaled wheel steps (positive = in).
        steps: f32,
    },
}

impl ViewCommand {
    /// Apply to `state`. Returns `true` when the view changed and the
    /// renderer must be reset.
    pub fn apply(self, state: &mut ViewState, resolution: Resolution) -> bool {
        match self {
            Self::Rotate { delta } => {
                if delta == Vec2::ZERO {
                    return false;
                }
                state.rotate(delta.x, delta.y);
            }
            Self::Pan { delta } => {
                if delta == Vec2::ZERO {
                    return false;
                }
                state.translate(delta.x, delta.y, resolution);
            }
            Self::Zoom { steps } => {
                if steps == 0.0 {
                    return false;
                }
                state.zoom_by(steps);
            }
        }
        true
    }
}

/// Discrete keyboard actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Fit the structure in view.
    Recenter,
    /// Apply the built-in preset at this index.
    Preset(usize),
}

/// Converts raw window events into [`ViewCommand`]s.
///
/// ```ignore
/// if let Some(cmd) = input.handle_event(event) {
///     if cmd.apply(&mut state, resolution) {
///         renderer.reset();
///     }
/// }
/// ```
#[derive(Debug, Clone, Default)]
pub struct InputProcessor {
    controls: ControlOptions,
    cursor: Option<Vec2>,
    left_pressed: bool,
    right_pressed: bool,
    shift_pressed: bool,
}

impl InputProcessor {
    /// Create a processor with the given sensitivities.
    #[must_use]
    pub fn new(controls: ControlOptions) -> Self {
        Self {
            controls,
            ..Self::default()
        }
    }

    /// Whether any drag button is held.
    #[must_use]
    pub fn dragging(&self) -> bool {
        self.left_pressed || self.right_pressed
    }

    /// Map a physical key string (`winit::keyboard::KeyCode` debug form)
    /// to an action.
    #[must_use]
    pub fn handle_key_press(&self, key: &str) -> Option<KeyAction> {
        match key {
            "KeyC" => Some(KeyAction::Recenter),
            "Digit1" => Some(KeyAction::Preset(0)),
            "Digit2" => Some(KeyAction::Preset(1)),
            "Digit3" => Some(KeyAction::Preset(2)),
            "Digit4" => Some(KeyAction::Preset(3)),
            _ => None,
        }
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewCommand> {
        match event {
            InputEvent::CursorMoved { x, y } => self.handle_cursor_moved(Vec2::new(x, y)),
            InputEvent::MouseButton { button, pressed } => {
                match button {
                    MouseButton::Left => self.left_pressed = pressed,
                    MouseButton::Right => self.right_pressed = pressed,
                    MouseButton::Middle => {}
                }
                None
            }
            InputEvent::Scroll { delta } => Some(ViewCommand::Zoom {
                steps: delta * self.controls.zoom_speed,
            }),
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }

    fn handle_cursor_moved(&mut self, position: Vec2) -> Option<ViewCommand> {
        let last = self.cursor.replace(position)?;
        let delta = position - last;

        if self.right_pressed || (self.left_pressed && self.shift_pressed) {
            return Some(ViewCommand::Pan {
                delta: delta * self.controls.pan_speed,
            });
        }
        if self.left_pressed {
            return Some(ViewCommand::Rotate {
                delta: delta * self.controls.rotate_speed,
            });
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pressed(button: MouseButton) -> InputEvent {
        InputEvent::MouseButton {
            button,
            pressed: true,
        }
    }

    fn moved(x: f32, y: f32) -> InputEvent {
        InputEvent::CursorMoved { x, y }
    }

    #[test]
    fn hover_produces_nothing() {
        let mut input = InputProcessor::default();
        assert_eq!(input.handle_event(moved(10.0, 10.0)), None);
        assert_eq!(input.handle_event(moved(20.0, 10.0)), None);
    }

    #[test]
    fn left_drag_rotates() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(moved(10.0, 10.0));
        let _ = input.handle_event(pressed(MouseButton::Left));
        assert!(input.dragging());
        assert_eq!(
            input.handle_event(moved(13.0, 6.0)),
            Some(ViewCommand::Rotate {
                delta: Vec2::new(3.0, -4.0)
            })
        );
    }

    #[test]
    fn shift_or_right_drag_pans() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(moved(0.0, 0.0));
        let _ = input.handle_event(pressed(MouseButton::Right));
        assert!(matches!(
            input.handle_event(moved(1.0, 0.0)),
            Some(ViewCommand::Pan { .. })
        ));

        let mut input = InputProcessor::default();
        let _ = input.handle_event(moved(0.0, 0.0));
        let _ = input.handle_event(InputEvent::ModifiersChanged { shift: true });
        let _ = input.handle_event(pressed(MouseButton::Left));
        assert!(matches!(
            input.handle_event(moved(1.0, 0.0)),
            Some(ViewCommand::Pan { .. })
        ));
    }

    #[test]
    fn release_stops_dragging() {
        let mut input = InputProcessor::default();
        let _ = input.handle_event(pressed(MouseButton::Left));
        let _ = input.handle_event(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        assert!(!input.dragging());
        let _ = input.handle_event(moved(0.0, 0.0));
        assert_eq!(input.handle_event(moved(5.0, 5.0)), None);
    }

    #[test]
    fn speeds_scale_commands() {
        let mut input = InputProcessor::new(ControlOptions {
            rotate_speed: 2.0,
            pan_speed: 1.0,
            zoom_speed: 0.5,
        });
        assert_eq!(
            input.handle_event(InputEvent::Scroll { delta: 2.0 }),
            Some(ViewCommand::Zoom { steps: 1.0 })
        );
        let _ = input.handle_event(moved(0.0, 0.0));
        let _ = input.handle_event(pressed(MouseButton::Left));
        assert_eq!(
            input.handle_event(moved(1.0, 1.0)),
            Some(ViewCommand::Rotate {
                delta: Vec2::new(2.0, 2.0)
            })
        );
    }

    #[test]
    fn apply_reports_reset() {
        let resolution = Resolution::new(100, 100);
        let mut state = ViewState::default();
        let zoom = state.zoom;

        assert!(ViewCommand::Zoom { steps: 1.0 }.apply(&mut state, resolution));
        assert!(state.zoom > zoom);

        let rotation = state.rotation;
        assert!(ViewCommand::Rotate {
            delta: Vec2::new(10.0, 0.0)
        }
        .apply(&mut state, resolution));
        assert_ne!(state.rotation, rotation);

        assert!(!ViewCommand::Pan { delta: Vec2::ZERO }.apply(&mut state, resolution));
    }

    #[test]
    fn keys_map_to_actions() {
        let input = InputProcessor::default();
        assert_eq!(input.handle_key_press("KeyC"), Some(KeyAction::Recenter));
        assert_eq!(input.handle_key_press("Digit3"), Some(KeyAction::Preset(2)));
        assert_eq!(input.handle_key_press("KeyQ"), None);
    }
}
