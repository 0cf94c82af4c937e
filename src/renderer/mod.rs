//! WebGPU rendering module
//!
//! Flat-lit triangle lists: scenery is uploaded once per session, the thief,
//! jewels and alarms are rebuilt from `GameState` every frame.

pub mod mesh;
pub mod painter;
pub mod pipeline;
pub mod vertex;

pub use mesh::{Material, MeshBuilder, MeshData};
pub use painter::ScenePainter;
pub use pipeline::RenderState;
pub use vertex::SceneVertex;
