//! Forward-difference stencils shared by the transport and height stages.

use crate::grid::ScalarGrid;

/// Forward-difference gradient of a scalar grid.
///
/// `gx[x][y] = u[x+1][y] − u[x][y]` with a zero last column; `gy` likewise
/// with a zero last row. Both outputs keep the input shape.
pub fn gradient(u: &ScalarGrid) -> (ScalarGrid, ScalarGrid) {
    let width = u.width;
    let height = u.height;
    let gx = ScalarGrid::from_fn(width, height, |x, y| {
        if x + 1 < width {
            u.get(x + 1, y) - u.get(x, y)
        } else {
            0.0
        }
    });
    let gy = ScalarGrid::from_fn(width, height, |x, y| {
        if y + 1 < height {
            u.get(x, y + 1) - u.get(x, y)
        } else {
            0.0
        }
    });
    (gx, gy)
}

/// Forward-difference divergence of a node-grid vector field.
///
/// Takes the two components on the `(w+1, h+1)` node grid and produces the
/// `(w, h)` cell grid `∇·N[x][y] = (Nx[x+1][y] − Nx[x][y]) + (Ny[x][y+1] −
/// Ny[x][y])`.
///
/// # Panics
///
/// Panics if the components differ in shape or are smaller than 2x2.
pub fn divergence(nx: &ScalarGrid, ny: &ScalarGrid) -> ScalarGrid {
    assert_eq!(
        (nx.width, nx.height),
        (ny.width, ny.height),
        "vector field components must share a shape"
    );
    assert!(
        nx.width >= 2 && nx.height >= 2,
        "divergence needs at least a 2x2 node grid"
    );

    ScalarGrid::from_fn(nx.width - 1, nx.height - 1, |x, y| {
        (nx.get(x + 1, y) - nx.get(x, y)) + (ny.get(x, y + 1) - ny.get(x, y))
    })
}
