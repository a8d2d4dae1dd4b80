//! User-adjustable visualization parameters.
//!
//! The view is five scalars mutated only by key presses. Nothing is clamped:
//! zoom may grow or shrink without bound and the offsets are unbounded.

/// Time-scrub step sizes, finest to coarsest.
const NUDGE_FINEST: f32 = 0.00001;
const NUDGE_FINE: f32 = 0.0001;
const NUDGE_COARSE: f32 = 0.01;
const NUDGE_COARSEST: f32 = 1.0;

/// Multiplicative zoom step for `]` and `[`.
const ZOOM_STEP: f32 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Freezes the animation clock at its last sample.
    pub paused: bool,
    /// Seconds added to the elapsed time before computing `C`.
    pub time_offset: f32,
    /// Scale of the complex plane covered by the quad.
    pub zoom: f32,
    pub x_offset: f32,
    pub y_offset: f32,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            paused: false,
            time_offset: 50.0,
            zoom: 1.0,
            x_offset: 0.0,
            y_offset: 0.0,
        }
    }
}

impl ViewState {
    /// Applies a single key press, returning `false` for unmapped keys.
    ///
    /// Panning steps by the current zoom so the apparent speed is constant.
    /// `a` moves towards +x and `d` towards -x, which is the reverse of the
    /// usual WASD layout; the mapping is kept as the sample always shipped it.
    pub fn handle_key(&mut self, key: char) -> bool {
        match key {
            ' ' => self.paused = !self.paused,
            '+' => self.time_offset -= NUDGE_FINEST,
            '-' => self.time_offset += NUDGE_FINEST,
            '9' => self.time_offset += NUDGE_FINE,
            '3' => self.time_offset -= NUDGE_FINE,
            '8' => self.time_offset += NUDGE_COARSE,
            '2' => self.time_offset -= NUDGE_COARSE,
            '7' => self.time_offset += NUDGE_COARSEST,
            '1' => self.time_offset -= NUDGE_COARSEST,
            ']' => self.zoom *= ZOOM_STEP,
            '[' => self.zoom /= ZOOM_STEP,
            'w' => self.y_offset += self.zoom,
            's' => self.y_offset -= self.zoom,
            'a' => self.x_offset += self.zoom,
            'd' => self.x_offset -= self.zoom,
            _ => return false,
        }
        tracing::trace!(?key, view = ?self, "view updated");
        true
    }

    /// Pan offset in the layout expected by the shader.
    pub fn offset(&self) -> [f32; 2] {
        [self.x_offset, self.y_offset]
    }
}
