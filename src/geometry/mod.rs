//! Vertex and screen-space geometry types

pub mod vertex;
pub mod winding;

pub use self::vertex::{ShaderVertex, MAX_PARAMS};
pub use self::winding::CullMode;
