//! Lens surface height from the converged in-plane transport.
//!
//! Each node's in-plane displacement says where a vertical ray entering the
//! lens must land on the target plane. Snell's law turns that lateral
//! offset into a required surface normal; integrating the normal field is
//! another Poisson solve, sharing the relaxer and its zero-flux boundary.

use crate::gradient::divergence;
use crate::grid::ScalarGrid;
use crate::mesh::Mesh;
use crate::progress::{Phase, RunHooks};
use crate::relax::{relax, RelaxError, RelaxOptions, RelaxStats};

/// Physical parameters of the height solve.
#[derive(Debug, Clone, Copy)]
pub struct HeightParams {
    /// Refractive index of the lens material.
    pub refractive_index: f64,
    /// Distance from the lens to the target plane, in meters.
    pub focal_distance: f64,
    /// Physical pixel pitch, in meters.
    pub meters_per_pixel: f64,
}

/// Required surface normal components on the `(w+1, h+1)` node grid.
///
/// Per axis: `N = tan(atan(δ / H) / (n − 1))` where `δ` is the node's
/// physical in-plane displacement and `H` the focal distance.
pub fn surface_normals(mesh: &Mesh, params: &HeightParams) -> (ScalarGrid, ScalarGrid) {
    let bend = |delta: f64| {
        ((delta / params.focal_distance).atan() / (params.refractive_index - 1.0)).tan()
    };
    let mut nx = ScalarGrid::new(mesh.width + 1, mesh.height + 1);
    let mut ny = ScalarGrid::new(mesh.width + 1, mesh.height + 1);
    for node in &mesh.nodes {
        let dx = (node.ix as f64 - node.x) * params.meters_per_pixel;
        let dy = (node.iy as f64 - node.y) * params.meters_per_pixel;
        nx.set(node.ix, node.iy, bend(dx));
        ny.set(node.ix, node.iy, bend(dy));
    }
    (nx, ny)
}

/// Solves `∇²z = ∇·N` and writes the heights back onto the mesh.
///
/// The divergence is zero-meaned before the solve. Heights live on the
/// `(w, h)` cell grid; nodes on the far row and column clamp-index it.
/// Returns the relaxer's convergence record.
pub fn solve_height(
    mesh: &mut Mesh,
    params: &HeightParams,
    options: &RelaxOptions,
    hooks: &mut RunHooks<'_>,
) -> Result<RelaxStats, RelaxError> {
    let (nx, ny) = surface_normals(mesh, params);
    let mut rhs = divergence(&nx, &ny);
    rhs.add_scalar(-rhs.mean());

    let mut z = ScalarGrid::new(mesh.width, mesh.height);
    let stats = relax(&mut z, &rhs, options, Phase::HeightRelax, hooks)?;

    let max_x = mesh.width - 1;
    let max_y = mesh.height - 1;
    for node in &mut mesh.nodes {
        node.z = z.get(node.ix.min(max_x), node.iy.min(max_y));
    }
    Ok(stats)
}
