//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};
use glam::Vec2;

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub const fn at(p: Vec2, color: [f32; 4]) -> Self {
        Self::new(p.x, p.y, color)
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Colors for scene elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.62, 0.78, 0.92, 1.0];
    pub const RAIL: [f32; 4] = [0.35, 0.33, 0.32, 1.0];
    pub const BOILER: [f32; 4] = [0.12, 0.14, 0.18, 1.0];
    pub const CAB: [f32; 4] = [0.55, 0.12, 0.10, 1.0];
    pub const CHIMNEY: [f32; 4] = [0.08, 0.08, 0.10, 1.0];
    pub const WHEEL: [f32; 4] = [0.78, 0.16, 0.12, 1.0];
    pub const HUB: [f32; 4] = [0.20, 0.20, 0.22, 1.0];
    pub const CRANK_ARM: [f32; 4] = [0.72, 0.72, 0.76, 1.0];
    pub const SIDE_ROD: [f32; 4] = [0.85, 0.85, 0.88, 1.0];
    pub const PIN: [f32; 4] = [0.95, 0.80, 0.25, 1.0];
    /// Smoke base color; alpha comes from the puff's opacity
    pub const SMOKE: [f32; 3] = [0.85, 0.85, 0.87];
}
