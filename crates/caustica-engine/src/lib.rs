//! Caustica inverse-caustics engine.
//!
//! Computes the top surface of a refractive lens whose caustic on a flat
//! target plane reproduces a target grayscale image, then extrudes it into
//! a closed watertight triangle mesh.
//!
//! The engine is the Poisson-transport method: a mesh-deformation loop
//! redistributes lattice vertices until per-pixel cell areas match the
//! target intensities (each step solves a Poisson equation for a transport
//! potential whose gradient advects the nodes), and a second Poisson solve
//! turns the converged in-plane displacement into a surface height field
//! via Snell's law. Decoding images and exporting meshes are the caller's
//! business; the engine consumes an irradiance grid and returns a mesh.
//!
//! # Example
//!
//! ```
//! use caustica_engine::{generate_lens, ScalarGrid};
//! use caustica_spec::LensConfig;
//!
//! let target = ScalarGrid::filled(8, 8, 1.0);
//! let config = LensConfig::builder().iterations(2).build();
//!
//! let solid = generate_lens(target, &config).unwrap();
//! assert_eq!(solid.nodes.len(), 2 * 9 * 9);
//! ```
//!
//! # Modules
//!
//! - [`grid`]: dense 2D scalar grids
//! - [`mesh`]: mesh data model and lattice builder
//! - [`area`]: per-pixel triangle-area accumulation
//! - [`relax`]: SOR Poisson solver
//! - [`gradient`]: forward-difference stencils
//! - [`march`]: collapse-time control and advection
//! - [`height`]: Snell height-field solve
//! - [`solidify`]: closed-solid extrusion
//! - [`progress`]: phases, sinks, and cancellation
//! - [`report`]: run metrics
//! - [`generate`]: the pipeline facade

pub mod area;
pub mod generate;
pub mod gradient;
pub mod grid;
pub mod height;
pub mod march;
pub mod mesh;
pub mod progress;
pub mod relax;
pub mod report;
pub mod solidify;

// Re-export commonly used types at the crate root
pub use generate::{generate_lens, generate_lens_with_hooks, normalize_energy, GenerateError};
pub use grid::ScalarGrid;
pub use mesh::{Mesh, Node, Triangle};
pub use progress::{CancelFlag, Phase, RunHooks};
pub use relax::{relax, stencil_residual, RelaxOptions, RelaxStats};
pub use report::{BoundingBox, MeshMetrics, RunReport};
