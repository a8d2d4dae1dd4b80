//! Colour ramp sampled by the fragment shader.
//!
//! The ramp ships as 768 raw bytes (256 RGB triples). It is uploaded as a
//! 256x1 RGBA texture because wgpu has neither 3-channel 8-bit formats nor
//! mipmapped 1-D textures; the mip chain is built on the CPU.

/// Number of texels in the ramp.
pub const GRADIENT_ENTRIES: usize = 256;

/// Raw RGB ramp, byte order exactly as sampled.
pub static GRADIENT_RGB: &[u8; GRADIENT_ENTRIES * 3] = include_bytes!("../assets/gradient.rgb");

/// A full mip chain for a one-row RGBA8 texture, levels stored back to back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MipChain {
    pub base_width: u32,
    pub level_count: u32,
    pub data: Vec<u8>,
}

impl MipChain {
    /// Width of the given level; the chain halves down to a single texel.
    pub fn level_width(&self, level: u32) -> u32 {
        (self.base_width >> level).max(1)
    }

    /// Bytes belonging to one level.
    pub fn level(&self, level: u32) -> &[u8] {
        let start: usize = (0..level).map(|l| self.level_width(l) as usize * 4).sum();
        let len = self.level_width(level) as usize * 4;
        &self.data[start..start + len]
    }
}

/// Widens RGB triples to opaque RGBA.
pub fn expand_to_rgba(rgb: &[u8]) -> Vec<u8> {
    rgb.chunks_exact(3)
        .flat_map(|texel| [texel[0], texel[1], texel[2], u8::MAX])
        .collect()
}

/// Builds every mip level of a one-row RGBA8 image with a 2:1 box filter.
pub fn build_mip_chain(base: &[u8]) -> MipChain {
    let base_width = (base.len() / 4) as u32;
    let level_count = u32::BITS - base_width.max(1).leading_zeros();

    let mut data = Vec::with_capacity(base.len() * 2);
    data.extend_from_slice(base);
    let mut previous = base.to_vec();
    for level in 1..level_count {
        let previous_width = previous.len() / 4;
        let width = (base_width >> level).max(1) as usize;
        let next: Vec<u8> = (0..width)
            .flat_map(|texel| {
                let left = &previous[texel * 8..texel * 8 + 4];
                let right_index = (texel * 2 + 1).min(previous_width - 1);
                let right = &previous[right_index * 4..right_index * 4 + 4];
                std::array::from_fn::<u8, 4, _>(|channel| {
                    ((u16::from(left[channel]) + u16::from(right[channel]) + 1) / 2) as u8
                })
            })
            .collect();
        data.extend_from_slice(&next);
        previous = next;
    }

    MipChain {
        base_width,
        level_count,
        data,
    }
}

/// The gradient ready for upload.
pub fn gradient_mip_chain() -> MipChain {
    build_mip_chain(&expand_to_rgba(GRADIENT_RGB))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_ramp_is_intact() {
        assert_eq!(GRADIENT_RGB.len(), 768);
        assert_eq!(&GRADIENT_RGB[..6], &[0xFF, 0x00, 0x00, 0xFF, 0x0E, 0x03]);
        assert_eq!(&GRADIENT_RGB[128 * 3..128 * 3 + 3], &[0xB4, 0xFF, 0xFF]);
        assert_eq!(&GRADIENT_RGB[255 * 3..], &[0xFF, 0x09, 0x00]);
        let checksum: u32 = GRADIENT_RGB.iter().map(|&byte| u32::from(byte)).sum();
        assert_eq!(checksum, 117_264);
    }

    #[test]
    fn rgba_expansion_keeps_channel_order() {
        let rgba = expand_to_rgba(GRADIENT_RGB);
        assert_eq!(rgba.len(), GRADIENT_ENTRIES * 4);
        assert_eq!(&rgba[..8], &[0xFF, 0x00, 0x00, 0xFF, 0xFF, 0x0E, 0x03, 0xFF]);
    }

    #[test]
    fn gradient_chain_halves_to_one_texel() {
        let chain = gradient_mip_chain();
        assert_eq!(chain.base_width, 256);
        assert_eq!(chain.level_count, 9);
        assert_eq!(chain.level_width(8), 1);
        assert_eq!(chain.data.len(), (256 + 128 + 64 + 32 + 16 + 8 + 4 + 2 + 1) * 4);
        assert_eq!(chain.level(0), &expand_to_rgba(GRADIENT_RGB)[..]);
        // (FF,00,00) and (FF,0E,03) average with rounding.
        assert_eq!(&chain.level(1)[..4], &[0xFF, 0x07, 0x02, 0xFF]);
    }

    #[test]
    fn odd_widths_round_down() {
        let base: [u8; 12] = [10, 20, 30, 255, 30, 40, 50, 255, 90, 90, 90, 255];
        let chain = build_mip_chain(&base);
        assert_eq!(chain.level_count, 2);
        assert_eq!(chain.level(1), &[20, 30, 40, 255]);
    }
}
