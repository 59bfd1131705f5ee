//! Config validation logic.

use crate::config::LensConfig;
use crate::error::ConfigError;

/// Validates every constraint a [`LensConfig`] must satisfy before a run.
///
/// `iterations` is deliberately not checked here: the typed API accepts 0
/// (no transport passes, flat surface); only the JSON ingestion surface
/// rejects it.
///
/// # Example
/// ```
/// use caustica_spec::{validate_config, LensConfig};
///
/// let config = LensConfig::builder().omega(2.5).build();
/// assert!(validate_config(&config).is_err());
/// ```
pub fn validate_config(config: &LensConfig) -> Result<(), ConfigError> {
    validate_omega(config.omega)?;
    validate_refractive_index(config.refractive_index)?;
    validate_solidify_offset(config.solidify_offset)?;
    validate_inner_tolerance(config.inner_tolerance)?;
    validate_inner_max_sweeps(config.inner_max_sweeps)?;
    validate_meters_per_pixel(config.meters_per_pixel)?;
    validate_focal_distance(config.focal_distance)?;
    validate_yield_every(config.yield_every)?;
    Ok(())
}

fn validate_omega(omega: f64) -> Result<(), ConfigError> {
    if !(omega > 1.0 && omega < 2.0) {
        return Err(ConfigError::Omega(omega));
    }
    Ok(())
}

fn validate_refractive_index(refractive_index: f64) -> Result<(), ConfigError> {
    if !(refractive_index > 1.0) {
        return Err(ConfigError::RefractiveIndex(refractive_index));
    }
    Ok(())
}

fn validate_solidify_offset(solidify_offset: f64) -> Result<(), ConfigError> {
    if !(solidify_offset > 0.0) {
        return Err(ConfigError::SolidifyOffset(solidify_offset));
    }
    Ok(())
}

fn validate_inner_tolerance(inner_tolerance: f64) -> Result<(), ConfigError> {
    if !(inner_tolerance > 0.0) {
        return Err(ConfigError::InnerTolerance(inner_tolerance));
    }
    Ok(())
}

fn validate_inner_max_sweeps(inner_max_sweeps: u32) -> Result<(), ConfigError> {
    if inner_max_sweeps < 1 {
        return Err(ConfigError::InnerMaxSweeps);
    }
    Ok(())
}

fn validate_meters_per_pixel(meters_per_pixel: Option<f64>) -> Result<(), ConfigError> {
    if let Some(pitch) = meters_per_pixel {
        if !(pitch > 0.0) {
            return Err(ConfigError::MetersPerPixel(pitch));
        }
    }
    Ok(())
}

fn validate_focal_distance(focal_distance: f64) -> Result<(), ConfigError> {
    if !(focal_distance > 0.0) {
        return Err(ConfigError::FocalDistance(focal_distance));
    }
    Ok(())
}

fn validate_yield_every(yield_every: u32) -> Result<(), ConfigError> {
    if yield_every < 1 {
        return Err(ConfigError::YieldEvery);
    }
    Ok(())
}
