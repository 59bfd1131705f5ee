//! Lens mesh data model and the initial lattice builder.

use std::collections::HashMap;

use crate::report::BoundingBox;

/// A mesh vertex.
///
/// `(ix, iy)` is the vertex's immutable lattice address, used to look up
/// per-node quantities from node-grid sized fields after the coordinates
/// have been deformed away from the lattice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Node {
    /// Current x coordinate, in lattice units.
    pub x: f64,
    /// Current y coordinate, in lattice units.
    pub y: f64,
    /// Surface height.
    pub z: f64,
    /// Original lattice column.
    pub ix: usize,
    /// Original lattice row.
    pub iy: usize,
}

/// Three indices into a mesh's node list. Winding is fixed at construction
/// and never re-sorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Triangle(pub [usize; 3]);

/// A triangle mesh over a `width` x `height` pixel grid.
///
/// Nodes live in one dense list; the 2D lattice view is computed with
/// [`Mesh::node_index`], so there is exactly one owner for every vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    /// Vertex list, lattice row-major for the initial layer.
    pub nodes: Vec<Node>,
    /// Triangle list.
    pub triangles: Vec<Triangle>,
    /// Pixel-grid width.
    pub width: usize,
    /// Pixel-grid height.
    pub height: usize,
}

impl Mesh {
    /// Builds the initial uniform lattice over a `width` x `height` pixel
    /// grid: `(width+1)(height+1)` nodes at integer coordinates with `z = 0`,
    /// two triangles per cell with the diagonal from the cell's upper-left
    /// to lower-right corner.
    pub fn lattice(width: usize, height: usize) -> Self {
        let mut nodes = Vec::with_capacity((width + 1) * (height + 1));
        for iy in 0..=height {
            for ix in 0..=width {
                nodes.push(Node {
                    x: ix as f64,
                    y: iy as f64,
                    z: 0.0,
                    ix,
                    iy,
                });
            }
        }

        let index = |ix: usize, iy: usize| iy * (width + 1) + ix;
        let mut triangles = Vec::with_capacity(2 * width * height);
        for y in 0..height {
            for x in 0..width {
                triangles.push(Triangle([index(x, y), index(x, y + 1), index(x + 1, y)]));
                triangles.push(Triangle([
                    index(x + 1, y + 1),
                    index(x + 1, y),
                    index(x, y + 1),
                ]));
            }
        }

        Self {
            nodes,
            triangles,
            width,
            height,
        }
    }

    /// Flat index of the node at lattice address `(ix, iy)`.
    #[inline]
    pub fn node_index(&self, ix: usize, iy: usize) -> usize {
        debug_assert!(ix <= self.width && iy <= self.height);
        iy * (self.width + 1) + ix
    }

    /// The node at lattice address `(ix, iy)`.
    #[inline]
    pub fn node(&self, ix: usize, iy: usize) -> &Node {
        &self.nodes[self.node_index(ix, iy)]
    }

    /// Mutable node at lattice address `(ix, iy)`.
    #[inline]
    pub fn node_mut(&mut self, ix: usize, iy: usize) -> &mut Node {
        let index = self.node_index(ix, iy);
        &mut self.nodes[index]
    }

    /// Signed area of a triangle, using x and y only.
    pub fn signed_area(&self, triangle: Triangle) -> f64 {
        let [a, b, c] = triangle.0;
        let p1 = &self.nodes[a];
        let p2 = &self.nodes[b];
        let p3 = &self.nodes[c];
        ((p2.x - p1.x) * (p3.y - p1.y) - (p3.x - p1.x) * (p2.y - p1.y)) / 2.0
    }

    /// Centroid of a triangle, using x and y only.
    pub fn centroid(&self, triangle: Triangle) -> (f64, f64) {
        let [a, b, c] = triangle.0;
        let p1 = &self.nodes[a];
        let p2 = &self.nodes[b];
        let p3 = &self.nodes[c];
        ((p1.x + p2.x + p3.x) / 3.0, (p1.y + p2.y + p3.y) / 3.0)
    }

    /// Axis-aligned bounds over all nodes.
    pub fn bounding_box(&self) -> BoundingBox {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for node in &self.nodes {
            for (axis, value) in [node.x, node.y, node.z].into_iter().enumerate() {
                min[axis] = min[axis].min(value);
                max[axis] = max[axis].max(value);
            }
        }
        BoundingBox { min, max }
    }

    /// Whether every undirected edge is used by exactly two triangles.
    ///
    /// True for the closed solids produced by the solidifier; false for the
    /// open top-surface lattice, whose rim edges are used once.
    pub fn is_watertight(&self) -> bool {
        let mut uses: HashMap<(usize, usize), u32> = HashMap::new();
        for triangle in &self.triangles {
            let [a, b, c] = triangle.0;
            for (lo, hi) in [(a, b), (b, c), (c, a)] {
                let edge = (lo.min(hi), lo.max(hi));
                *uses.entry(edge).or_insert(0) += 1;
            }
        }
        uses.values().all(|&count| count == 2)
    }
}
