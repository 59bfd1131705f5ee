//! Extrusion of the sculpted top surface into a closed solid.

use crate::mesh::{Mesh, Node, Triangle};

/// Extrudes a top-surface mesh into a closed prismatic solid.
///
/// The output keeps the top layer's nodes first (same order as the input)
/// and appends a bottom layer that duplicates each node's `(x, y)` at
/// `z = −offset`. Triangles are wound so every outward normal points away
/// from the interior: the top cap up, the bottom cap down, and four side
/// bands around the rim. For pixel dims `(w, h)` the solid has
/// `2(w+1)(h+1)` nodes and `4wh + 4w + 4h` triangles, and every edge is
/// used by exactly two triangles.
pub fn solidify(mesh: &Mesh, offset: f64) -> Mesh {
    let width = mesh.width;
    let height = mesh.height;
    let layer = mesh.nodes.len();

    let mut nodes = Vec::with_capacity(2 * layer);
    nodes.extend_from_slice(&mesh.nodes);
    nodes.extend(mesh.nodes.iter().map(|node| Node {
        z: -offset,
        ..*node
    }));

    let top = |ix: usize, iy: usize| iy * (width + 1) + ix;
    let bottom = |ix: usize, iy: usize| layer + top(ix, iy);

    let mut triangles = Vec::with_capacity(4 * width * height + 4 * width + 4 * height);

    // Caps. The lattice winds downward, so the bottom cap reuses it and the
    // top cap flips it.
    for &Triangle([a, b, c]) in &mesh.triangles {
        triangles.push(Triangle([a, c, b]));
        triangles.push(Triangle([layer + a, layer + b, layer + c]));
    }

    // Side bands, one quad per rim edge, each split along the same diagonal.
    for x in 0..width {
        // y = 0 rim, outward −y.
        triangles.push(Triangle([top(x, 0), bottom(x, 0), bottom(x + 1, 0)]));
        triangles.push(Triangle([top(x, 0), bottom(x + 1, 0), top(x + 1, 0)]));
        // y = height rim, outward +y.
        triangles.push(Triangle([
            top(x, height),
            bottom(x + 1, height),
            bottom(x, height),
        ]));
        triangles.push(Triangle([
            top(x, height),
            top(x + 1, height),
            bottom(x + 1, height),
        ]));
    }
    for y in 0..height {
        // x = 0 rim, outward −x.
        triangles.push(Triangle([top(0, y), bottom(0, y + 1), bottom(0, y)]));
        triangles.push(Triangle([top(0, y), top(0, y + 1), bottom(0, y + 1)]));
        // x = width rim, outward +x.
        triangles.push(Triangle([
            top(width, y),
            bottom(width, y),
            bottom(width, y + 1),
        ]));
        triangles.push(Triangle([
            top(width, y),
            bottom(width, y + 1),
            top(width, y + 1),
        ]));
    }

    Mesh {
        nodes,
        triangles,
        width,
        height,
    }
}
