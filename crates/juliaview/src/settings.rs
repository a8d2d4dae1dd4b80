//! Optional TOML settings file.
//!
//! Every key is optional; whatever is present overrides the built-in
//! defaults and is itself overridden by command-line flags. Unknown keys are
//! rejected so typos surface instead of being silently ignored.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use renderer::{GpuPowerPreference, RenderPolicy, RendererConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid settings file {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
    #[error("failed to serialise settings to TOML")]
    Serialize(#[from] toml::ser::Error),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Pins the animation clock; absent means free-running.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub still_time: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gpu_power: Option<GpuPower>,
    pub window: WindowSettings,
    pub shaders: ShaderSettings,
    pub view: ViewSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WindowSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ShaderSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertex: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fragment: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewSettings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_offset: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zoom: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_offset: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_offset: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuPower {
    Low,
    High,
}

impl From<GpuPower> for GpuPowerPreference {
    fn from(value: GpuPower) -> Self {
        match value {
            GpuPower::Low => GpuPowerPreference::Low,
            GpuPower::High => GpuPowerPreference::High,
        }
    }
}

impl From<GpuPowerPreference> for GpuPower {
    fn from(value: GpuPowerPreference) -> Self {
        match value {
            GpuPowerPreference::Low => GpuPower::Low,
            GpuPowerPreference::High => GpuPower::High,
        }
    }
}

impl Settings {
    /// Reads and parses a settings file.
    ///
    /// Relative shader paths are resolved against the file's directory so a
    /// settings file can ship next to its shaders.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings = Self::from_toml(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        settings
            .validate()
            .map_err(|reason| SettingsError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;

        if let Some(base) = path.parent() {
            settings.shaders.resolve_relative_to(base);
        }
        Ok(settings)
    }

    /// Rejects zero window dimensions and non-finite numbers.
    pub fn validate(&self) -> Result<(), String> {
        for (key, value) in [
            ("window.width", self.window.width),
            ("window.height", self.window.height),
        ] {
            if value == Some(0) {
                return Err(format!("{key} must be greater than zero"));
            }
        }

        for (key, value) in [
            ("still_time", self.still_time),
            ("view.time_offset", self.view.time_offset),
            ("view.zoom", self.view.zoom),
            ("view.x_offset", self.view.x_offset),
            ("view.y_offset", self.view.y_offset),
        ] {
            if let Some(value) = value.filter(|value| !value.is_finite()) {
                return Err(format!("{key} must be a finite number, found {value}"));
            }
        }
        Ok(())
    }

    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }

    pub fn to_toml(&self) -> Result<String, SettingsError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Overlays every value present in the file onto `config`.
    pub fn apply(&self, config: &mut RendererConfig) {
        if let Some(width) = self.window.width {
            config.surface_size.0 = width;
        }
        if let Some(height) = self.window.height {
            config.surface_size.1 = height;
        }
        if let Some(title) = &self.window.title {
            config.title = title.clone();
        }

        if let Some(vertex) = &self.shaders.vertex {
            config.shaders.vertex = vertex.clone();
        }
        if let Some(fragment) = &self.shaders.fragment {
            config.shaders.fragment = fragment.clone();
        }

        let view = &mut config.view;
        if let Some(paused) = self.view.paused {
            view.paused = paused;
        }
        if let Some(time_offset) = self.view.time_offset {
            view.time_offset = time_offset;
        }
        if let Some(zoom) = self.view.zoom {
            view.zoom = zoom;
        }
        if let Some(x_offset) = self.view.x_offset {
            view.x_offset = x_offset;
        }
        if let Some(y_offset) = self.view.y_offset {
            view.y_offset = y_offset;
        }

        if let Some(time) = self.still_time {
            config.policy = RenderPolicy::Still { time };
        }
        if let Some(power) = self.gpu_power {
            config.gpu_power = power.into();
        }
    }

    /// Fully populated settings describing a resolved configuration.
    pub fn from_config(config: &RendererConfig) -> Self {
        let still_time = match config.policy {
            RenderPolicy::Animate => None,
            RenderPolicy::Still { time } => Some(time),
        };

        Self {
            still_time,
            gpu_power: Some(config.gpu_power.into()),
            window: WindowSettings {
                width: Some(config.surface_size.0),
                height: Some(config.surface_size.1),
                title: Some(config.title.clone()),
            },
            shaders: ShaderSettings {
                vertex: Some(config.shaders.vertex.clone()),
                fragment: Some(config.shaders.fragment.clone()),
            },
            view: ViewSettings {
                paused: Some(config.view.paused),
                time_offset: Some(config.view.time_offset),
                zoom: Some(config.view.zoom),
                x_offset: Some(config.view.x_offset),
                y_offset: Some(config.view.y_offset),
            },
        }
    }
}

impl ShaderSettings {
    fn resolve_relative_to(&mut self, base: &Path) {
        for path in [&mut self.vertex, &mut self.fragment].into_iter().flatten() {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        }
    }
}
