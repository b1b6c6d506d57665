//! WebGPU rendering module
//!
//! Flat-shaded triangle lists rebuilt from the scene every frame.

pub mod pipeline;
pub mod scene_mesh;
pub mod shapes;
pub mod vertex;

pub use pipeline::RenderState;
pub use vertex::Vertex;
