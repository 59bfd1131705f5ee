//! Per-pixel accumulation of mesh triangle areas.

use crate::grid::ScalarGrid;
use crate::mesh::Mesh;

/// Bins the unsigned area of every triangle into the pixel cell containing
/// its centroid.
///
/// Triangles whose centroid falls outside the pixel grid are dropped;
/// degenerate triangles contribute zero. On the undeformed lattice every
/// cell accumulates exactly 1.0.
pub fn accumulate_cell_areas(mesh: &Mesh) -> ScalarGrid {
    let mut areas = ScalarGrid::new(mesh.width, mesh.height);
    for &triangle in &mesh.triangles {
        let area = mesh.signed_area(triangle).abs();
        let (cx, cy) = mesh.centroid(triangle);
        let x = cx.floor();
        let y = cy.floor();
        if x >= 0.0 && y >= 0.0 && x < mesh.width as f64 && y < mesh.height as f64 {
            areas.add(x as usize, y as usize, area);
        }
    }
    areas
}
