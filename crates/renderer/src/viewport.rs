/// Pixel rectangle the quad is drawn into, anchored at the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Viewport for a reported window size.
    ///
    /// A zero height is replaced with 1; the width is taken as reported.
    pub fn from_window_size(width: u32, height: u32) -> Self {
        Self {
            width,
            height: height.max(1),
        }
    }

    /// A zero-width viewport belongs to a minimised window and draws nothing.
    pub fn is_drawable(&self) -> bool {
        self.width > 0
    }

    /// Whether a surface of this size fits the device's 2-D texture limit.
    pub fn fits_within(&self, max_dimension: u32) -> bool {
        self.width <= max_dimension && self.height <= max_dimension
    }
}

impl From<winit::dpi::PhysicalSize<u32>> for Viewport {
    fn from(size: winit::dpi::PhysicalSize<u32>) -> Self {
        Self::from_window_size(size.width, size.height)
    }
}
