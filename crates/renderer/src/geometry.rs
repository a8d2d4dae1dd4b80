use bytemuck::{Pod, Zeroable};

/// Shader location of the single position attribute (`vVertex`).
pub const POSITION_ATTRIBUTE: u32 = 0;

/// Plain position-only vertex.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
}

/// Unit square in normalized device coordinates, in triangle-fan order.
pub const QUAD_VERTICES: [Vertex; 4] = [
    Vertex {
        position: [-1.0, -1.0, 0.0],
    },
    Vertex {
        position: [1.0, -1.0, 0.0],
    },
    Vertex {
        position: [1.0, 1.0, 0.0],
    },
    Vertex {
        position: [-1.0, 1.0, 0.0],
    },
];

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 1] =
    wgpu::vertex_attr_array![POSITION_ATTRIBUTE => Float32x3];

impl Vertex {
    /// Tightly packed layout with positions only.
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &VERTEX_ATTRIBUTES,
        }
    }
}

/// Expands a triangle fan into a triangle list.
///
/// wgpu has no fan topology, so vertex 0 is repeated as the apex of every
/// triangle: `(0,1,2), (0,2,3), ...`. Fewer than three vertices yield nothing.
pub fn fan_indices(vertex_count: u16) -> Vec<u16> {
    (1..vertex_count.saturating_sub(1))
        .flat_map(|i| [0, i, i + 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quad_fan_becomes_two_triangles() {
        assert_eq!(fan_indices(4), vec![0, 1, 2, 0, 2, 3]);
    }

    #[test]
    fn degenerate_fans_are_empty() {
        assert!(fan_indices(0).is_empty());
        assert!(fan_indices(2).is_empty());
        assert_eq!(fan_indices(3), vec![0, 1, 2]);
    }

    #[test]
    fn quad_covers_clip_space() {
        let bytes: &[u8] = bytemuck::cast_slice(&QUAD_VERTICES);
        assert_eq!(bytes.len(), 4 * 3 * 4);
        for vertex in QUAD_VERTICES {
            assert_eq!(vertex.position[0].abs(), 1.0);
            assert_eq!(vertex.position[1].abs(), 1.0);
            assert_eq!(vertex.position[2], 0.0);
        }
    }

    #[test]
    fn layout_is_position_only() {
        let layout = Vertex::layout();
        assert_eq!(layout.array_stride, 12);
        assert_eq!(layout.attributes.len(), 1);
        assert_eq!(layout.attributes[0].shader_location, POSITION_ATTRIBUTE);
        assert_eq!(layout.attributes[0].format, wgpu::VertexFormat::Float32x3);
    }
}
