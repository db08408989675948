//! Error types for driftfield.
//!
//! Configuration problems are caught when a sketch starts; provider faults
//! surface from the tick that hit them. Nothing here is retryable.

use thiserror::Error;

/// Errors detected while validating or loading a [`SketchConfig`](crate::SketchConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A weighted option table has no entries.
    #[error("option table `{0}` is empty")]
    EmptyTable(&'static str),
    /// A weight is negative, NaN or infinite.
    #[error("option table `{table}` has an invalid weight {weight}")]
    InvalidWeight { table: &'static str, weight: f64 },
    /// Every weight in the table is zero.
    #[error("option table `{0}` has no positive weight")]
    ZeroTotalWeight(&'static str),
    /// A palette has no colors.
    #[error("palette `{0}` has no colors")]
    EmptyPalette(String),
    /// A color string could not be parsed as `#rrggbb`.
    #[error("invalid hex color `{0}`")]
    InvalidColor(String),
    /// A count, size or duration that must be positive is zero.
    #[error("`{0}` must be greater than zero")]
    NotPositive(&'static str),
    /// A numeric parameter is NaN, infinite or out of its range.
    #[error("`{name}` is out of range: {value}")]
    OutOfRange { name: &'static str, value: f64 },
    /// No preset with the requested name exists.
    #[error("unknown preset `{0}` (expected one of: classic, spiral, fixed, snapshot, wave)")]
    UnknownPreset(String),
    /// The configuration file is not valid JSON for a sketch config.
    #[error("failed to parse sketch config: {0}")]
    Json(#[from] serde_json::Error),
    /// The configuration file could not be read or written.
    #[error("failed to access sketch config: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that can occur while running a sketch.
#[derive(Debug, Error)]
pub enum SketchError {
    /// The configuration was rejected at start or regeneration.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    /// `tick` was called before `start`.
    #[error("sketch has not been started")]
    NotStarted,
    /// A random or noise provider returned a value outside `[0, 1)`.
    #[error("provider fault: {0}")]
    ProviderFault(String),
}

/// Errors that can occur while exporting the canvas.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Image encoding failed.
    #[error("failed to encode image: {0}")]
    Image(#[from] image::ImageError),
    /// Writing the output file failed.
    #[error("failed to write export: {0}")]
    Io(#[from] std::io::Error),
    /// Serializing the metadata records failed.
    #[error("failed to serialize features: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur during GPU initialization for the viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    #[error("failed to create GPU surface: {0}")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    #[error("no compatible GPU adapter found; ensure your system supports WebGPU/Vulkan/Metal/DX12")]
    NoAdapter,
    /// Failed to create GPU device.
    #[error("failed to create GPU device: {0}")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
    /// The surface reports no texture format the adapter can present.
    #[error("GPU surface reports no supported texture format")]
    NoSurfaceFormat,
}

/// Errors that can occur when running the windowed viewer.
#[cfg(feature = "viewer")]
#[derive(Debug, Error)]
pub enum ViewerError {
    /// Failed to create event loop.
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    /// Failed to create window.
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    /// GPU initialization failed.
    #[error("GPU error: {0}")]
    Gpu(#[from] GpuError),
    /// The sketch failed mid-run.
    #[error(transparent)]
    Sketch(#[from] SketchError),
    /// Saving a snapshot or the final canvas failed.
    #[error(transparent)]
    Export(#[from] ExportError),
}
