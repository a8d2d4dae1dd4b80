use std::path::PathBuf;

use crate::runtime::RenderPolicy;
use crate::view::ViewState;

/// Window size requested when nothing else is configured.
pub const DEFAULT_SURFACE_SIZE: (u32, u32) = (800, 600);

/// Title of the preview window.
pub const DEFAULT_WINDOW_TITLE: &str = "Julia Set Renderer";

/// Vertex stage shipped with the crate.
pub const DEFAULT_VERTEX_SHADER: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/julia.vert");

/// Fragment stage shipped with the crate.
pub const DEFAULT_FRAGMENT_SHADER: &str =
    concat!(env!("CARGO_MANIFEST_DIR"), "/shaders/julia.frag");

/// Power profile hint handed to the adapter request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GpuPowerPreference {
    /// Prefer integrated GPUs.
    Low,
    /// Prefer discrete GPUs.
    #[default]
    High,
}

impl std::fmt::Display for GpuPowerPreference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GpuPowerPreference::Low => f.write_str("low"),
            GpuPowerPreference::High => f.write_str("high"),
        }
    }
}

/// Paths of the two shader stages linked into the Julia program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderPaths {
    pub vertex: PathBuf,
    pub fragment: PathBuf,
}

impl Default for ShaderPaths {
    fn default() -> Self {
        Self {
            vertex: PathBuf::from(DEFAULT_VERTEX_SHADER),
            fragment: PathBuf::from(DEFAULT_FRAGMENT_SHADER),
        }
    }
}

/// Immutable configuration passed to the renderer at start-up.
///
/// `RendererConfig` mirrors the CLI and settings file: which shaders to
/// compile, how large the window should be, and the initial view.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Window size in physical pixels.
    pub surface_size: (u32, u32),
    /// Window title.
    pub title: String,
    /// Vertex and fragment shader sources.
    pub shaders: ShaderPaths,
    /// Initial values of the user-adjustable view parameters.
    pub view: ViewState,
    /// Where animation time comes from.
    pub policy: RenderPolicy,
    /// Adapter power preference.
    pub gpu_power: GpuPowerPreference,
}

impl Default for RendererConfig {
    /// Provides the classic 800x600 animated configuration.
    fn default() -> Self {
        Self {
            surface_size: DEFAULT_SURFACE_SIZE,
            title: DEFAULT_WINDOW_TITLE.to_string(),
            shaders: ShaderPaths::default(),
            view: ViewState::default(),
            policy: RenderPolicy::default(),
            gpu_power: GpuPowerPreference::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_matches_sample_window() {
        let config = RendererConfig::default();
        assert_eq!(config.surface_size, (800, 600));
        assert_eq!(config.title, "Julia Set Renderer");
        assert!(config.shaders.vertex.ends_with("shaders/julia.vert"));
        assert!(config.shaders.fragment.ends_with("shaders/julia.frag"));
        assert_eq!(config.policy, RenderPolicy::Animate);
    }
}
