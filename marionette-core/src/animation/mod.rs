//! Parametric animation modes and their per-frame integration
pub mod controller;
pub mod mode;
pub mod params;

pub use controller::AnimationController;
pub use mode::AnimationMode;
pub use params::AnimationParams;
