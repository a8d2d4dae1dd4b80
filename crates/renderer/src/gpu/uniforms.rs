use bytemuck::{Pod, Zeroable};

use crate::view::ViewState;

/// Julia parameter for animation time `r`.
///
/// The four frequencies are mutually incommensurate, so `C` wanders through
/// the plane without settling into a short repeating cycle.
pub fn julia_constant(r: f32) -> [f32; 2] {
    [
        ((r * 0.1).sin() + (r * 0.23).cos()) * 0.5,
        ((r * 0.13).cos() + (r * 0.21).sin()) * 0.5,
    ]
}

/// Mirror of the std140 `JuliaParams` block declared by both shader stages.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct JuliaUniforms {
    pub c: [f32; 2],
    pub offset: [f32; 2],
    pub zoom: f32,
    pub _padding: [f32; 3],
}

impl JuliaUniforms {
    /// Uniform values for one frame at `elapsed` seconds.
    pub fn for_frame(view: &ViewState, elapsed: f32) -> Self {
        let r = elapsed + view.time_offset;
        Self {
            c: julia_constant(r),
            offset: view.offset(),
            zoom: view.zoom,
            _padding: [0.0; 3],
        }
    }
}

impl Default for JuliaUniforms {
    fn default() -> Self {
        Self::for_frame(&ViewState::default(), 0.0)
    }
}
