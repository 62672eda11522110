//! WebGPU rendering module
//!
//! The simulation paints through `sim::Painter`; `FrameBuilder` turns those
//! calls into a triangle list that `RenderState` uploads and draws.

pub mod painter;
pub mod pipeline;
pub mod shapes;
pub mod vertex;

pub use painter::FrameBuilder;
pub use pipeline::RenderState;
pub use vertex::Vertex;
