use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::render::atlas::{FilterMode, VerticalFlip};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub graphics: GraphicsSettings,
    pub sampler: SamplerSettings,
    pub demo: DemoSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphicsSettings {
    pub resolution: (u16, u16),
    pub fullscreen: bool,
}

impl Default for GraphicsSettings {
    fn default() -> Self {
        Self {
            resolution: (1280, 720),
            fullscreen: false,
        }
    }
}

/// How the atlas is sampled. Both fields configure the atlas resource and the
/// stage's flip toggle, never the remap math itself.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerSettings {
    pub filter: FilterMode,
    /// Turn off when the image loader already stores rows bottom-up.
    pub flip_vertical: bool,
}

impl Default for SamplerSettings {
    fn default() -> Self {
        Self {
            filter: FilterMode::Nearest,
            flip_vertical: true,
        }
    }
}

impl SamplerSettings {
    pub fn vertical_flip(&self) -> VerticalFlip {
        VerticalFlip::from(self.flip_vertical)
    }
}

/// What the demo window shows.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    /// Atlas image to load, a generated test atlas is used when unset.
    pub atlas_path: Option<PathBuf>,
    /// Normalized (x_min, y_min, x_max, y_max) of the tile to repeat.
    pub tile: [f32; 4],
    /// How many times the tile repeats across the window.
    pub repeats: [f32; 2],
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            atlas_path: None,
            tile: [0.0, 0.0, 0.5, 0.5],
            repeats: [4.0, 3.0],
        }
    }
}

impl Settings {
    pub fn load_from_file(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("reading settings from {}", path.display()))?;
        let settings = serde_json::from_str(&contents)
            .with_context(|| format!("parsing settings in {}", path.display()))?;
        Ok(settings)
    }

    /// Falls back to defaults when the file does not exist.
    pub fn load_or_default(file_path: impl AsRef<Path>) -> Result<Self> {
        let path = file_path.as_ref();
        if !path.exists() {
            log::info!("no settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Self::load_from_file(path)
    }

    pub fn save_to_file(&self, file_path: impl AsRef<Path>) -> Result<()> {
        let path = file_path.as_ref();
        let serialized = serde_json::to_string_pretty(self)?;
        fs::write(path, serialized)
            .with_context(|| format!("writing settings to {}", path.display()))?;
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_files_fill_in_defaults() {
        let settings: Settings = serde_json::from_str(r#"{ "sampler": { "filter": "linear" } }"#).unwrap();
        assert_eq!(settings.sampler.filter, FilterMode::Linear);
        assert!(settings.sampler.flip_vertical);
        assert_eq!(settings.graphics, GraphicsSettings::default());
    }

    #[test]
    fn flip_toggle_maps_to_vertical_flip() {
        let mut sampler = SamplerSettings::default();
        assert_eq!(sampler.vertical_flip(), VerticalFlip::Flip);
        sampler.flip_vertical = false;
        assert_eq!(sampler.vertical_flip(), VerticalFlip::Keep);
    }

    #[test]
    fn saves_and_loads_through_a_file() {
        let path = std::env::temp_dir().join(format!("atlascraft-settings-{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.sampler.flip_vertical = false;
        settings.demo.repeats = [2.0, 2.0];

        settings.save_to_file(&path).unwrap();
        let loaded = Settings::load_from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(loaded, settings);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let settings = Settings::load_or_default("/nonexistent/atlascraft/settings.json").unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = std::env::temp_dir().join(format!("atlascraft-bad-{}.json", std::process::id()));
        fs::write(&path, "{ not json").unwrap();
        let result = Settings::load_from_file(&path);
        fs::remove_file(&path).unwrap();
        assert!(result.is_err());
    }
}
