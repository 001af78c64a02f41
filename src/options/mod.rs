//! Application options and view presets, persisted as TOML.
//!
//! Options cover what sits around the renderer (window, background,
//! mouse sensitivity). Shading parameters live in
//! [`ViewState`](crate::view::ViewState) and are bundled into
//! [`Preset`]s.

mod controls;
mod display;
mod presets;

use std::path::Path;

pub use controls::ControlOptions;
pub use display::DisplayOptions;
pub use presets::{list_presets, Preset};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::SpeckleError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[controls]`) work.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Window and output settings.
    pub display: DisplayOptions,
    /// Mouse sensitivity.
    pub controls: ControlOptions,
}

impl Options {
    /// JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Io`] if the file cannot be read and
    /// [`SpeckleError::OptionsParse`] on malformed TOML.
    pub fn load(path: &Path) -> Result<Self, SpeckleError> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content)
            .map_err(|e| SpeckleError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::OptionsParse`] if serialization fails and
    /// [`SpeckleError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), SpeckleError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| SpeckleError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[controls]
rotate_speed = 2.0
";
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.controls.rotate_speed, 2.0);
        assert_eq!(opts.controls.pan_speed, 1.0);
        assert_eq!(opts.display.preset, "default");
        assert_eq!(opts.display.background, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("speckle-options-{}", std::process::id()))
            .join("options.toml");
        let mut opts = Options::default();
        opts.display.background = [1.0, 1.0, 1.0];
        opts.display.preset = "toon".to_owned();
        opts.save(&path).unwrap();
        assert_eq!(Options::load(&path).unwrap(), opts);
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).unwrap();
        }
    }

    #[test]
    fn schema_lists_sections() {
        let schema = serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema.get("properties").unwrap();
        assert!(props.get("display").is_some());
        assert!(props.get("controls").is_some());
    }

    #[test]
    fn load_errors() {
        let dir = std::env::temp_dir()
            .join(format!("speckle-bad-options-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.toml");
        std::fs::write(&path, "[display\n").unwrap();
        assert!(matches!(
            Options::load(&path),
            Err(SpeckleError::OptionsParse(_))
        ));
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(SpeckleError::Io(_))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
