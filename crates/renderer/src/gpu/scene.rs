use wgpu::util::{DeviceExt, TextureDataOrder};

use crate::geometry::{fan_indices, QUAD_VERTICES};
use crate::palette::{gradient_mip_chain, MipChain};

/// Full-screen quad uploaded as a vertex buffer plus its fan index list.
pub(crate) struct QuadMesh {
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub index_count: u32,
}

impl QuadMesh {
    pub(crate) fn new(device: &wgpu::Device) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad vertices"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let indices = fan_indices(QUAD_VERTICES.len() as u16);
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("quad fan indices"),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            vertex_buffer,
            index_buffer,
            index_count: indices.len() as u32,
        }
    }

    pub(crate) fn destroy(&self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
    }
}

/// The colour ramp indexed by escape iteration count.
pub(crate) struct GradientTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    pub sampler: wgpu::Sampler,
}

impl GradientTexture {
    pub(crate) fn new(device: &wgpu::Device, queue: &wgpu::Queue) -> Self {
        let chain = gradient_mip_chain();
        Self::from_mip_chain(device, queue, &chain)
    }

    fn from_mip_chain(device: &wgpu::Device, queue: &wgpu::Queue, chain: &MipChain) -> Self {
        let texture = device.create_texture_with_data(
            queue,
            &wgpu::TextureDescriptor {
                label: Some("gradient texture"),
                size: wgpu::Extent3d {
                    width: chain.base_width,
                    height: 1,
                    depth_or_array_layers: 1,
                },
                mip_level_count: chain.level_count,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format: wgpu::TextureFormat::Rgba8Unorm,
                usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
                view_formats: &[],
            },
            TextureDataOrder::LayerMajor,
            &chain.data,
        );

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        // Repeat along the ramp like an unconfigured GL texture would.
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("gradient sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::ClampToEdge,
            address_mode_w: wgpu::AddressMode::ClampToEdge,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        tracing::debug!(
            width = chain.base_width,
            mip_levels = chain.level_count,
            "uploaded gradient texture"
        );

        Self {
            texture,
            view,
            sampler,
        }
    }

    pub(crate) fn destroy(&self) {
        self.texture.destroy();
    }
}
