//! Structured metrics describing a finished generation run.

use serde::{Deserialize, Serialize};

use crate::mesh::Mesh;
use crate::relax::RelaxStats;

/// Axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Minimum corner `[x, y, z]`.
    pub min: [f64; 3],
    /// Maximum corner `[x, y, z]`.
    pub max: [f64; 3],
}

/// Size and closure facts about an output mesh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshMetrics {
    /// Vertex count.
    pub nodes: usize,
    /// Triangle count.
    pub triangles: usize,
    /// Axis-aligned bounds.
    pub bounding_box: BoundingBox,
    /// Whether every edge is used by exactly two triangles.
    pub watertight: bool,
}

impl MeshMetrics {
    /// Measures a mesh.
    pub fn of(mesh: &Mesh) -> Self {
        Self {
            nodes: mesh.nodes.len(),
            triangles: mesh.triangles.len(),
            bounding_box: mesh.bounding_box(),
            watertight: mesh.is_watertight(),
        }
    }
}

/// Convergence and output metrics for one generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Outer transport iterations actually run.
    pub iterations_run: u32,
    /// Per-iteration convergence of the transport potential solve.
    pub transport_relax: Vec<RelaxStats>,
    /// Convergence of the height-field solve.
    pub height_relax: RelaxStats,
    /// Largest absolute residual cell observed in the last transport
    /// iteration; 0 when no transport iterations ran.
    pub final_residual_max: f64,
    /// Metrics of the solidified output mesh.
    pub mesh: MeshMetrics,
}
