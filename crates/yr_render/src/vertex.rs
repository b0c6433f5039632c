#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        const ATTRIBUTES: [wgpu::VertexAttribute; 3] =
            wgpu::vertex_attr_array![0 => Float32x2, 1 => Float32x2, 2 => Float32x4];
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRIBUTES,
        }
    }
}

/// Axis-aligned quad in screen space (top-left origin, y down).
#[derive(Debug, Clone, Copy)]
pub struct Quad {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub color: [f32; 4],
}

impl Quad {
    /// Four corners in top-left, top-right, bottom-right, bottom-left order,
    /// with texture v = 0 on the top edge.
    pub fn vertices(&self) -> [SpriteVertex; 4] {
        let (x0, y0) = (self.x, self.y);
        let (x1, y1) = (self.x + self.width, self.y + self.height);
        [
            SpriteVertex {
                position: [x0, y0],
                tex_coords: [0.0, 0.0],
                color: self.color,
            },
            SpriteVertex {
                position: [x1, y0],
                tex_coords: [1.0, 0.0],
                color: self.color,
            },
            SpriteVertex {
                position: [x1, y1],
                tex_coords: [1.0, 1.0],
                color: self.color,
            },
            SpriteVertex {
                position: [x0, y1],
                tex_coords: [0.0, 1.0],
                color: self.color,
            },
        ]
    }

    pub fn indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }
}

/// Convert an 8-bit sRGB color to the linear values the sRGB surface expects.
pub fn rgba8_to_linear(rgba: [u8; 4]) -> [f32; 4] {
    fn channel(c: u8) -> f32 {
        let c = c as f32 / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    [
        channel(rgba[0]),
        channel(rgba[1]),
        channel(rgba[2]),
        rgba[3] as f32 / 255.0,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_conversion_keeps_extremes() {
        assert_eq!(rgba8_to_linear([0, 0, 0, 255]), [0.0, 0.0, 0.0, 1.0]);
        let white = rgba8_to_linear([255, 255, 255, 128]);
        assert!((white[0] - 1.0).abs() < 1e-6);
        assert!((white[3] - 128.0 / 255.0).abs() < 1e-6);
        let mid = rgba8_to_linear([128, 128, 128, 255]);
        assert!(mid[0] > 0.2 && mid[0] < 0.23);
    }

    #[test]
    fn quad_corners_follow_screen_axes() {
        let quad = Quad {
            x: 10.0,
            y: 20.0,
            width: 30.0,
            height: 40.0,
            color: [1.0; 4],
        };
        let v = quad.vertices();
        assert_eq!(v[0].position, [10.0, 20.0]);
        assert_eq!(v[2].position, [40.0, 60.0]);
        assert_eq!(v[0].tex_coords, [0.0, 0.0]);
        assert_eq!(v[2].tex_coords, [1.0, 1.0]);
    }

    #[test]
    fn indices_form_two_triangles() {
        assert_eq!(Quad::indices(4), [4, 5, 6, 4, 6, 7]);
    }
}
