//! Target images and pipeline helpers shared by the e2e tests.

use std::collections::HashMap;

use caustica_engine::area::accumulate_cell_areas;
use caustica_engine::march::{march, VelocityField};
use caustica_engine::{normalize_energy, relax, Mesh, Phase, RelaxOptions, RunHooks, ScalarGrid};
use caustica_spec::LensConfig;

/// A uniform target: every pixel already carries its share of the energy.
pub fn uniform(size: usize) -> ScalarGrid {
    ScalarGrid::filled(size, size, 1.0)
}

/// All the energy in one pixel at the center.
pub fn bright_spot(size: usize) -> ScalarGrid {
    let mut target = ScalarGrid::new(size, size);
    target.set(size / 2, size / 2, (size * size) as f64);
    target
}

/// All the energy in one column.
pub fn bright_stripe(width: usize, height: usize, column: usize) -> ScalarGrid {
    ScalarGrid::from_fn(width, height, |x, _| if x == column { 1.0 } else { 0.0 })
}

/// A smooth ramp, dark at one corner and bright at the other.
pub fn corner_ramp(size: usize) -> ScalarGrid {
    ScalarGrid::from_fn(size, size, |x, y| 1.0 + (x + y) as f64)
}

/// Relaxer options matching the config defaults.
pub fn default_relax_options(config: &LensConfig) -> RelaxOptions {
    RelaxOptions {
        omega: config.omega,
        tolerance: config.inner_tolerance,
        max_sweeps: config.inner_max_sweeps,
        yield_every: config.yield_every,
    }
}

/// Runs the transport loop only (no height solve, no solidify), returning
/// the deformed top-surface mesh. Mirrors the facade's outer loop so tests
/// can inspect intermediate state the facade does not expose.
pub fn run_transport(target: &ScalarGrid, config: &LensConfig, iterations: u32) -> Mesh {
    let mut target = target.clone();
    normalize_energy(&mut target);
    let options = default_relax_options(config);

    let mut mesh = Mesh::lattice(target.width, target.height);
    for iteration in 1..=iterations {
        let areas = accumulate_cell_areas(&mesh);
        let mut residual = areas;
        for (cell, intensity) in residual.data.iter_mut().zip(&target.data) {
            *cell -= intensity;
        }
        residual.add_scalar(-residual.mean());

        let mut phi = ScalarGrid::new(target.width, target.height);
        relax(
            &mut phi,
            &residual,
            &options,
            Phase::IterRelax(iteration),
            &mut RunHooks::new(),
        )
        .unwrap();

        let velocities = VelocityField::from_potential(&phi);
        march(&mut mesh, &velocities);
    }
    mesh
}

/// Histogram of undirected edge uses over a mesh's triangles.
pub fn edge_histogram(mesh: &Mesh) -> HashMap<(usize, usize), u32> {
    let mut uses = HashMap::new();
    for triangle in &mesh.triangles {
        let [a, b, c] = triangle.0;
        for (lo, hi) in [(a, b), (b, c), (c, a)] {
            let edge = (lo.min(hi), lo.max(hi));
            *uses.entry(edge).or_insert(0) += 1;
        }
    }
    uses
}
