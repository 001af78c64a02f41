//! Named view presets: partial [`ViewState`] overrides stored as TOML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SpeckleError;
use crate::view::{ViewOverrides, ViewState};

/// Built-in presets in menu order: `(id, toml)`.
const BUILTIN: [(&str, &str); 4] = [
    ("default", include_str!("../../assets/presets/default.toml")),
    ("stickball", include_str!("../../assets/presets/stickball.toml")),
    ("toon", include_str!("../../assets/presets/toon.toml")),
    ("licorice", include_str!("../../assets/presets/licorice.toml")),
];

/// A named bundle of view overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preset {
    /// Display name.
    pub name: String,
    /// Fields this preset sets.
    pub view: ViewOverrides,
}

impl Preset {
    /// Parse a preset from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::OptionsParse`] on malformed TOML.
    pub fn from_toml(text: &str) -> Result<Self, SpeckleError> {
        toml::from_str(text).map_err(|e| SpeckleError::OptionsParse(e.to_string()))
    }

    /// Load a preset from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`SpeckleError::Io`] if the file cannot be read and
    /// [`SpeckleError::OptionsParse`] if it is not a valid preset.
    pub fn load(path: &Path) -> Result<Self, SpeckleError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Save this preset as pretty-printed TOML.
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

    /// Look up a built-in preset by id.
    #[must_use]
    pub fn builtin(id: &str) -> Option<Self> {
        let (_, text) = BUILTIN.iter().find(|(name, _)| *name == id)?;
        match Self::from_toml(text) {
            Ok(preset) => Some(preset),
            Err(e) => {
                log::error!("built-in preset {id} is invalid: {e}");
                None
            }
        }
    }

    /// Ids of the built-in presets in menu order.
    #[must_use]
    pub fn builtin_ids() -> Vec<&'static str> {
        BUILTIN.iter().map(|(id, _)| *id).collect()
    }

    /// Resolve `name` as a built-in id first, then as a file in `dir`.
    ///
    /// # Errors
    ///
    /// Returns the load error when `name` is neither a built-in nor a
    /// readable preset file.
    pub fn find(name: &str, dir: &Path) -> Result<Self, SpeckleError> {
        if let Some(preset) = Self::builtin(name) {
            return Ok(preset);
        }
        Self::load(&dir.join(format!("{name}.toml")))
    }

    /// Apply this preset's overrides to `state` (which is then resolved).
    pub fn apply(&self, state: &mut ViewState) {
        log::debug!("applying preset {}", self.name);
        state.apply(&self.view);
    }
}

/// List preset names (TOML file stems) in a directory, sorted.
#[must_use]
pub fn list_presets(dir: &Path) -> Vec<String> {
    let mut names = Vec::new();
    if let Ok(entries) = std::fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "toml") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_owned());
                }
            }
        }
    }
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_builtins_parse() {
        for id in Preset::builtin_ids() {
            let preset = Preset::builtin(id).unwrap();
            assert!(!preset.name.is_empty(), "{id} has no name");
        }
        assert!(Preset::builtin("nope").is_none());
    }

    #[test]
    fn default_preset_restores_defaults() {
        let mut state = ViewState::default();
        Preset::builtin("licorice").unwrap().apply(&mut state);
        Preset::builtin("toon").unwrap().apply(&mut state);
        Preset::builtin("default").unwrap().apply(&mut state);
        assert_eq!(state, ViewState::default());
    }

    #[test]
    fn stickball_values() {
        let mut state = ViewState::default();
        Preset::builtin("stickball").unwrap().apply(&mut state);
        assert_eq!(state.atom_scale, 0.24);
        assert_eq!(state.relative_atom_scale, 0.64);
        assert_eq!(state.bond_scale, 0.5);
        assert!(state.bonds);
        assert_eq!(state.bond_threshold, 1.2);
        // Untouched fields keep their value.
        assert_eq!(state.ao, 0.75);
    }

    #[test]
    fn toon_disables_sampling() {
        let mut state = ViewState::default();
        Preset::builtin("toon").unwrap().apply(&mut state);
        assert_eq!(state.ao, 0.0);
        assert_eq!(state.spf, 0);
        assert_eq!(state.outline, 1.0);
    }

    #[test]
    fn save_load_and_list() {
        let dir = std::env::temp_dir().join(format!("speckle-presets-{}", std::process::id()));
        let preset = Preset {
            name: "Mine".to_owned(),
            view: ViewOverrides {
                fxaa: Some(4),
                ..ViewOverrides::default()
            },
        };
        preset.save(&dir.join("mine.toml")).unwrap();
        assert_eq!(Preset::load(&dir.join("mine.toml")).unwrap(), preset);
        assert_eq!(list_presets(&dir), vec!["mine".to_owned()]);
        assert_eq!(Preset::find("mine", &dir).unwrap(), preset);
        assert_eq!(Preset::find("toon", &dir).unwrap().name, "Toon");
        assert!(Preset::find("missing", &dir).is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
