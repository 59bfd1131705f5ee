//! Lens generation facade: the full Poisson-transport pipeline.

use caustica_spec::{validate_config, ConfigError, LensConfig};
use thiserror::Error;

use crate::area::accumulate_cell_areas;
use crate::grid::ScalarGrid;
use crate::height::{solve_height, HeightParams};
use crate::march::{march, VelocityField};
use crate::mesh::Mesh;
use crate::progress::{Phase, RunHooks};
use crate::relax::{relax, RelaxError, RelaxOptions};
use crate::report::{MeshMetrics, RunReport};
use crate::solidify::solidify;

/// Errors from lens generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The target image cannot drive a run.
    #[error("invalid target image: {0}")]
    InvalidInput(String),

    /// The configuration failed validation.
    #[error("invalid config: {0}")]
    BadConfig(#[from] ConfigError),

    /// A relaxer sweep produced a non-finite update.
    #[error("relaxation diverged in {phase} during sweep {sweep}")]
    Diverged {
        /// Poisson solve that diverged.
        phase: Phase,
        /// 1-based sweep in which the non-finite update appeared.
        sweep: u32,
    },

    /// Cancellation was requested and observed at a yield point.
    #[error("generation cancelled")]
    Cancelled,
}

impl GenerateError {
    fn from_relax(error: RelaxError, phase: Phase) -> Self {
        match error {
            RelaxError::Diverged { sweep } => Self::Diverged { phase, sweep },
            RelaxError::Cancelled => Self::Cancelled,
        }
    }
}

/// Computes the lens for `target` and returns the closed solid mesh.
///
/// Convenience wrapper over [`generate_lens_with_hooks`] that observes
/// nothing and discards the run report.
pub fn generate_lens(target: ScalarGrid, config: &LensConfig) -> Result<Mesh, GenerateError> {
    generate_lens_with_hooks(target, config, &mut RunHooks::new()).map(|(mesh, _)| mesh)
}

/// Computes the lens for `target`, reporting through `hooks`.
///
/// The pipeline: energy-normalize the target, build the lattice, run the
/// configured number of transport iterations (accumulate areas, form the
/// zero-mean residual, solve for the potential, advect by the half
/// collapse step), solve the height field, apply it, and extrude the
/// closed solid. On any failure the progress sink receives a final
/// `error` phase event and no mesh is returned.
pub fn generate_lens_with_hooks(
    target: ScalarGrid,
    config: &LensConfig,
    hooks: &mut RunHooks<'_>,
) -> Result<(Mesh, RunReport), GenerateError> {
    let result = validate_and_run(target, config, hooks);
    if result.is_err() {
        hooks.emit(Phase::Error, 1.0);
    }
    result
}

fn validate_and_run(
    mut target: ScalarGrid,
    config: &LensConfig,
    hooks: &mut RunHooks<'_>,
) -> Result<(Mesh, RunReport), GenerateError> {
    validate_config(config)?;
    validate_target(&target)?;
    normalize_energy(&mut target);
    run(target, config, hooks)
}

fn run(
    target: ScalarGrid,
    config: &LensConfig,
    hooks: &mut RunHooks<'_>,
) -> Result<(Mesh, RunReport), GenerateError> {
    let width = target.width;
    let height = target.height;
    let options = RelaxOptions {
        omega: config.omega,
        tolerance: config.inner_tolerance,
        max_sweeps: config.inner_max_sweeps,
        yield_every: config.yield_every,
    };

    hooks.emit(Phase::Init, 0.0);
    let mut mesh = Mesh::lattice(width, height);
    hooks.emit(Phase::Init, 1.0);

    let mut transport_relax = Vec::with_capacity(config.iterations as usize);
    let mut final_residual_max = 0.0;

    for iteration in 1..=config.iterations {
        if hooks.cancelled() {
            return Err(GenerateError::Cancelled);
        }

        let areas = accumulate_cell_areas(&mesh);
        let mut residual = areas;
        for (cell, intensity) in residual.data.iter_mut().zip(&target.data) {
            *cell -= intensity;
        }
        residual.add_scalar(-residual.mean());
        final_residual_max = residual.max_abs();
        hooks.emit_residual(iteration, &residual.normalized());

        let mut phi = ScalarGrid::new(width, height);
        let phase = Phase::IterRelax(iteration);
        let stats = relax(&mut phi, &residual, &options, phase, hooks)
            .map_err(|error| GenerateError::from_relax(error, phase))?;
        transport_relax.push(stats);

        let velocities = VelocityField::from_potential(&phi);
        march(&mut mesh, &velocities);
        hooks.emit(
            Phase::IterMarch(iteration),
            f64::from(iteration) / f64::from(config.iterations),
        );
    }

    if hooks.cancelled() {
        return Err(GenerateError::Cancelled);
    }

    let params = HeightParams {
        refractive_index: config.refractive_index,
        focal_distance: config.focal_distance,
        meters_per_pixel: config.meters_per_pixel_for(width),
    };
    let height_relax = solve_height(&mut mesh, &params, &options, hooks)
        .map_err(|error| GenerateError::from_relax(error, Phase::HeightRelax))?;

    hooks.emit(Phase::Solidify, 0.0);
    let solid = solidify(&mesh, config.solidify_offset);
    hooks.emit(Phase::Solidify, 1.0);

    let report = RunReport {
        iterations_run: config.iterations,
        transport_relax,
        height_relax,
        final_residual_max,
        mesh: MeshMetrics::of(&solid),
    };

    hooks.emit(Phase::Done, 1.0);
    Ok((solid, report))
}

/// Scales `target` in place so its energy sums to `width * height`.
///
/// Idempotent: normalizing an already-normalized image is a no-op up to
/// floating-point rounding. The caller must ensure the sum is positive.
pub fn normalize_energy(target: &mut ScalarGrid) {
    let sum = target.sum();
    target.scale((target.width * target.height) as f64 / sum);
}

fn validate_target(target: &ScalarGrid) -> Result<(), GenerateError> {
    if target.width < 2 || target.height < 2 {
        return Err(GenerateError::InvalidInput(format!(
            "target must be at least 2x2, got {}x{}",
            target.width, target.height
        )));
    }
    for &value in &target.data {
        if !value.is_finite() {
            return Err(GenerateError::InvalidInput(
                "target contains non-finite values".to_string(),
            ));
        }
        if value < 0.0 {
            return Err(GenerateError::InvalidInput(
                "target contains negative values".to_string(),
            ));
        }
    }
    if target.sum() <= 0.0 {
        return Err(GenerateError::InvalidInput(
            "target has no energy".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_tiny_target() {
        let err = generate_lens(ScalarGrid::filled(1, 8, 1.0), &LensConfig::default())
            .unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_dark_target() {
        let err =
            generate_lens(ScalarGrid::new(8, 8), &LensConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_negative_target() {
        let mut target = ScalarGrid::filled(8, 8, 1.0);
        target.set(3, 3, -0.5);
        let err = generate_lens(target, &LensConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_non_finite_target() {
        let mut target = ScalarGrid::filled(8, 8, 1.0);
        target.set(0, 0, f64::INFINITY);
        let err = generate_lens(target, &LensConfig::default()).unwrap_err();
        assert!(matches!(err, GenerateError::InvalidInput(_)));
    }

    #[test]
    fn test_rejects_bad_config() {
        let config = LensConfig::builder().omega(2.2).build();
        let err = generate_lens(ScalarGrid::filled(8, 8, 1.0), &config).unwrap_err();
        assert!(matches!(err, GenerateError::BadConfig(_)));
    }

    #[test]
    fn test_normalize_energy_is_idempotent() {
        let mut target = ScalarGrid::from_fn(8, 8, |x, y| 1.0 + (x * y) as f64);
        normalize_energy(&mut target);
        assert!((target.sum() - 64.0).abs() < 1e-9);

        let once = target.clone();
        normalize_energy(&mut target);
        for (a, b) in target.data.iter().zip(&once.data) {
            assert!((a - b).abs() < 1e-12);
        }
    }

    #[test]
    fn test_uniform_target_stays_flat() {
        // With a uniform target the residual is exactly zero, nothing
        // moves, and the top surface stays at z = 0.
        let target = ScalarGrid::filled(8, 8, 2.0);
        let config = LensConfig::builder().iterations(4).build();
        let (solid, report) =
            generate_lens_with_hooks(target, &config, &mut RunHooks::new()).unwrap();

        assert_eq!(report.final_residual_max, 0.0);
        assert!(report.mesh.watertight);
        let layer = 9 * 9;
        assert!(solid.nodes[..layer].iter().all(|n| n.z == 0.0));
        assert!(solid.nodes[layer..].iter().all(|n| n.z == -10.0));
    }

    #[test]
    fn test_zero_iterations_returns_flat_solid() {
        let target = ScalarGrid::filled(4, 4, 1.0);
        let config = LensConfig::builder().iterations(0).build();
        let (solid, report) =
            generate_lens_with_hooks(target, &config, &mut RunHooks::new()).unwrap();

        assert_eq!(report.iterations_run, 0);
        assert!(report.transport_relax.is_empty());
        assert_eq!(report.final_residual_max, 0.0);
        assert!(solid.nodes.iter().take(25).all(|n| n.z == 0.0));
        assert!(report.mesh.watertight);
    }

    #[test]
    fn test_smallest_valid_target() {
        // 2x2 exercises every stage at its minimum grid size.
        let target = ScalarGrid::from_fn(2, 2, |x, y| 1.0 + (x + y) as f64);
        let config = LensConfig::builder().iterations(4).build();
        let (solid, report) =
            generate_lens_with_hooks(target, &config, &mut RunHooks::new()).unwrap();

        assert_eq!(report.iterations_run, 4);
        assert_eq!(solid.nodes.len(), 2 * 9);
        assert_eq!(solid.triangles.len(), 4 * 4 + 4 * 2 + 4 * 2);
        assert!(report.mesh.watertight);
    }

    #[test]
    fn test_error_phase_is_emitted_on_failure() {
        use crate::progress::CancelFlag;

        let flag = CancelFlag::new();
        flag.cancel();

        let mut phases = Vec::new();
        let mut hooks = RunHooks::new()
            .with_progress(|phase, _| phases.push(phase))
            .with_cancel(flag);

        let target = ScalarGrid::filled(8, 8, 1.0);
        assert!(matches!(
            generate_lens_with_hooks(target, &LensConfig::default(), &mut hooks),
            Err(GenerateError::Cancelled)
        ));
        drop(hooks);
        assert_eq!(phases.last(), Some(&Phase::Error));
    }
}
