//! GPU side of the Julia viewer.
//!
//! - `context` owns the wgpu instance, device and surface, and reconfigures
//!   the swapchain when the window resizes.
//! - `pipeline` links the two GLSL stages into a render pipeline with one
//!   bind group layout (uniform block, gradient texture, sampler).
//! - `scene` uploads the quad and the mipmapped gradient.
//! - `uniforms` derives the per-frame `JuliaParams` block from the view.
//! - `state` glues everything together behind `GpuState`.

mod context;
mod pipeline;
mod scene;
mod state;
mod uniforms;

pub(crate) use state::GpuState;
pub use uniforms::{julia_constant, JuliaUniforms};
