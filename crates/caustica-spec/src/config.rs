//! The lens generation configuration record.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::validation::validate_config;

/// Physical width of the lens, in meters, used to derive `meters_per_pixel`
/// when the config does not pin it explicitly.
pub const DEFAULT_LENS_WIDTH_METERS: f64 = 0.1;

/// Configuration for one lens generation run.
///
/// This is a closed record: deserializing a document with fields outside
/// this enumeration fails. Every field has a default, so `{}` is a valid
/// config document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LensConfig {
    /// Number of outer transport iterations.
    #[serde(default = "default_iterations")]
    pub iterations: u32,

    /// Refractive index of the lens material. Must exceed 1.
    #[serde(default = "default_refractive_index")]
    pub refractive_index: f64,

    /// Extrusion thickness of the solidified lens, in lattice units.
    #[serde(default = "default_solidify_offset")]
    pub solidify_offset: f64,

    /// Relaxer convergence threshold on the largest per-sweep update.
    #[serde(default = "default_inner_tolerance")]
    pub inner_tolerance: f64,

    /// Relaxer sweep cap per Poisson solve.
    #[serde(default = "default_inner_max_sweeps")]
    pub inner_max_sweeps: u32,

    /// Over-relaxation factor. Must lie strictly between 1 and 2.
    #[serde(default = "default_omega")]
    pub omega: f64,

    /// Physical pixel pitch in meters. Derived from
    /// [`DEFAULT_LENS_WIDTH_METERS`] and the image width when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meters_per_pixel: Option<f64>,

    /// Distance from the lens to the target plane, in meters.
    #[serde(default = "default_focal_distance")]
    pub focal_distance: f64,

    /// Sweeps between cooperative yields inside the relaxer.
    #[serde(default = "default_yield_every")]
    pub yield_every: u32,
}

fn default_iterations() -> u32 {
    4
}

fn default_refractive_index() -> f64 {
    1.49
}

fn default_solidify_offset() -> f64 {
    10.0
}

fn default_inner_tolerance() -> f64 {
    1e-5
}

fn default_inner_max_sweeps() -> u32 {
    10_000
}

fn default_omega() -> f64 {
    1.99
}

fn default_focal_distance() -> f64 {
    1.0
}

fn default_yield_every() -> u32 {
    100
}

impl Default for LensConfig {
    fn default() -> Self {
        Self {
            iterations: default_iterations(),
            refractive_index: default_refractive_index(),
            solidify_offset: default_solidify_offset(),
            inner_tolerance: default_inner_tolerance(),
            inner_max_sweeps: default_inner_max_sweeps(),
            omega: default_omega(),
            meters_per_pixel: None,
            focal_distance: default_focal_distance(),
            yield_every: default_yield_every(),
        }
    }
}

impl LensConfig {
    /// Starts building a config from the defaults.
    pub fn builder() -> LensConfigBuilder {
        LensConfigBuilder {
            config: Self::default(),
        }
    }

    /// Parses and validates a JSON config document.
    ///
    /// Unknown fields are rejected. On top of [`validate_config`], the JSON
    /// surface treats an explicit `iterations: 0` as a user error; the typed
    /// API accepts 0 to mean "no transport passes".
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        validate_config(&config)?;
        if config.iterations < 1 {
            return Err(ConfigError::Iterations(config.iterations));
        }
        Ok(config)
    }

    /// The physical pixel pitch for an image `width` pixels wide.
    pub fn meters_per_pixel_for(&self, width: usize) -> f64 {
        self.meters_per_pixel
            .unwrap_or(DEFAULT_LENS_WIDTH_METERS / (width as f64 + 1.0))
    }
}

/// Builder for [`LensConfig`].
///
/// `build` does not validate; run [`validate_config`] on the result (the
/// engine does so on every run).
#[derive(Debug, Clone)]
pub struct LensConfigBuilder {
    config: LensConfig,
}

impl LensConfigBuilder {
    /// Sets the number of outer transport iterations.
    pub fn iterations(mut self, iterations: u32) -> Self {
        self.config.iterations = iterations;
        self
    }

    /// Sets the refractive index of the lens material.
    pub fn refractive_index(mut self, refractive_index: f64) -> Self {
        self.config.refractive_index = refractive_index;
        self
    }

    /// Sets the extrusion thickness of the solidified lens.
    pub fn solidify_offset(mut self, solidify_offset: f64) -> Self {
        self.config.solidify_offset = solidify_offset;
        self
    }

    /// Sets the relaxer convergence threshold.
    pub fn inner_tolerance(mut self, inner_tolerance: f64) -> Self {
        self.config.inner_tolerance = inner_tolerance;
        self
    }

    /// Sets the relaxer sweep cap per Poisson solve.
    pub fn inner_max_sweeps(mut self, inner_max_sweeps: u32) -> Self {
        self.config.inner_max_sweeps = inner_max_sweeps;
        self
    }

    /// Sets the over-relaxation factor.
    pub fn omega(mut self, omega: f64) -> Self {
        self.config.omega = omega;
        self
    }

    /// Pins the physical pixel pitch instead of deriving it.
    pub fn meters_per_pixel(mut self, meters_per_pixel: f64) -> Self {
        self.config.meters_per_pixel = Some(meters_per_pixel);
        self
    }

    /// Sets the distance from the lens to the target plane.
    pub fn focal_distance(mut self, focal_distance: f64) -> Self {
        self.config.focal_distance = focal_distance;
        self
    }

    /// Sets the sweep count between cooperative yields.
    pub fn yield_every(mut self, yield_every: u32) -> Self {
        self.config.yield_every = yield_every;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> LensConfig {
        self.config
    }
}
