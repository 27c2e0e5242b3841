//! 360° equirectangular panorama viewer.
//!
//! The camera model ([`camera`]), gesture fusion ([`input`]) and projection math
//! ([`projection`]) are plain Rust and run without a GPU; [`renderer`] drives the same
//! projection through wgpu and [`lifecycle`] decides when its resources live.

pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod lifecycle;
pub mod loader;
pub mod panorama;
pub mod projection;
pub mod renderer;
pub mod ui;

pub use camera::{CameraOrientation, CameraState, CameraVelocity, FovLimits, PhysicsParams};
pub use config::{LaunchOptions, ViewerConfig};
pub use error::ViewerError;
pub use input::{Gesture, InputFusion, InputParams, TouchTracker};
pub use lifecycle::{LoadRequest, LoadStatus, PanoramaBackend, PanoramaMount, PanoramaSource};
pub use panorama::PanoramaViewer;
pub use projection::{EquirectTexture, ViewUniform};
