use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Window and output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
pub struct DisplayOptions {
    /// Colour behind the molecule (linear RGB).
    #[schemars(title = "Background")]
    pub background: [f32; 3],
    /// Initial window width in logical pixels.
    #[schemars(skip)]
    pub window_width: u32,
    /// Initial window height in logical pixels.
    #[schemars(skip)]
    pub window_height: u32,
    /// Built-in or on-disk preset applied at startup.
    #[schemars(title = "Preset")]
    pub preset: String,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            background: [0.0, 0.0, 0.0],
            window_width: 1280,
            window_height: 800,
            preset: "default".to_owned(),
        }
    }
}
