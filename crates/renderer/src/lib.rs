//! Renderer crate for the Julia set viewer.
//!
//! A single full-screen quad is drawn each frame; the fragment stage iterates
//! `z -> z^2 + C` per pixel and colours the escape count through a 256-entry
//! gradient. `C` drifts with time and the user steers time, zoom and pan from
//! the keyboard.
//!
//! ```text
//!   CLI / settings
//!          │ RendererConfig
//!          ▼
//!   Renderer::run ──▶ WindowState ──▶ winit event loop ──▶ render_scene()
//!                                                  │
//!                     ViewState ◀── key presses    └─▶ JuliaUniforms ─▶ GPU UBO
//! ```
//!
//! `WindowState` owns the GPU resources and the view; `Renderer` is the thin
//! entry point handed a fully resolved configuration.

pub mod compile;
pub mod geometry;
mod gpu;
pub mod palette;
pub mod runtime;
mod types;
pub mod view;
pub mod viewport;
mod window;

use anyhow::Result;

pub use compile::{ProgramSources, ShaderError, StageKind, StageSource};
pub use gpu::{julia_constant, JuliaUniforms};
pub use runtime::{
    time_source_for_policy, BoxedTimeSource, FixedTimeSource, FrameClock, RenderPolicy,
    SystemTimeSource, TimeSample, TimeSource,
};
pub use types::{
    GpuPowerPreference, RendererConfig, ShaderPaths, DEFAULT_FRAGMENT_SHADER,
    DEFAULT_SURFACE_SIZE, DEFAULT_VERTEX_SHADER, DEFAULT_WINDOW_TITLE,
};
pub use view::ViewState;
pub use viewport::Viewport;

/// Public entry point used by the `juliaview` binary.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
}

impl Renderer {
    /// Builds a renderer for the supplied configuration.
    pub fn new(config: RendererConfig) -> Self {
        Self { config }
    }

    /// Opens the window and blocks until it is closed.
    ///
    /// Fails before the window becomes visible when the GPU cannot be brought
    /// up or the shaders do not compile and link.
    pub fn run(self) -> Result<()> {
        window::run(self.config)
    }
}
