// error.rs — failure taxonomy shared by the library and the windowed host

use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum ViewerError {
    #[error("no compatible GPU adapter")]
    NoAdapter,

    #[error("surface creation failed: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),

    #[error("device request failed: {0}")]
    RequestDevice(#[from] wgpu::RequestDeviceError),

    #[error("shader program failed to build: {0}")]
    ShaderCompilation(String),

    #[error("cannot open {path:?}: {source}")]
    ImageOpen {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("cannot decode image: {0}")]
    ImageDecode(#[from] image::ImageError),

    #[error("cannot read config {path:?}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed config {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("invalid config {path:?}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("surface offers no {0}")]
    IncompatibleSurface(&'static str),
}
