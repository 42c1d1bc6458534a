//! Marionette Core Library - Hierarchical puppet animation
//!
//! This library provides the renderer-independent core: the matrix stack,
//! the puppet skeleton, the animation modes and the scene that turns them into
//! draw calls for an external renderer.

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod light;
pub mod material;
pub mod pose;
pub mod projection;
pub mod scene;
pub mod skeleton;
pub mod transform;

// Re-export commonly used types
pub use animation::{AnimationController, AnimationMode, AnimationParams};
pub use config::Config;
pub use error::{Error, Result};
pub use geometry::{Mesh, Primitive, Triangle, Vertex};
pub use input::{Input, Key, KeyboardState};
pub use light::{Light, LightKind, LightUniforms};
pub use material::Material;
pub use pose::{JointInstance, PoseEvaluator};
pub use projection::{project_to_screen, Camera, ProjectionMode};
pub use scene::{DrawCall, RenderState, Renderer, Scene};
pub use skeleton::{JointId, Skeleton};
pub use transform::{StackFrame, Transform, TransformStack};
