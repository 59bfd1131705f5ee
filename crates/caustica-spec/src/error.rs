//! Error types for config parsing and validation.

use thiserror::Error;

/// Errors raised while parsing or validating a [`LensConfig`].
///
/// [`LensConfig`]: crate::LensConfig
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `iterations` was below the minimum accepted by the JSON surface.
    #[error("iterations must be at least 1, got {0}")]
    Iterations(u32),

    /// `refractive_index` must exceed 1 for Snell refraction to bend rays.
    #[error("refractive_index must be greater than 1, got {0}")]
    RefractiveIndex(f64),

    /// `solidify_offset` must be a positive thickness.
    #[error("solidify_offset must be positive, got {0}")]
    SolidifyOffset(f64),

    /// `inner_tolerance` must be a positive convergence threshold.
    #[error("inner_tolerance must be positive, got {0}")]
    InnerTolerance(f64),

    /// `inner_max_sweeps` must allow at least one sweep.
    #[error("inner_max_sweeps must be at least 1")]
    InnerMaxSweeps,

    /// `omega` outside the open interval (1, 2) makes SOR diverge or stall.
    #[error("omega must lie strictly between 1 and 2, got {0}")]
    Omega(f64),

    /// `meters_per_pixel`, when given, must be a positive physical pitch.
    #[error("meters_per_pixel must be positive, got {0}")]
    MetersPerPixel(f64),

    /// `focal_distance` must be a positive distance to the target plane.
    #[error("focal_distance must be positive, got {0}")]
    FocalDistance(f64),

    /// `yield_every` must allow at least one sweep between yields.
    #[error("yield_every must be at least 1")]
    YieldEvery,

    /// The config document was not valid JSON, or contained unknown fields.
    #[error("malformed config: {0}")]
    Json(#[from] serde_json::Error),
}
