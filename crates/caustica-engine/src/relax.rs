//! Successive over-relaxation for the discrete Poisson problem.
//!
//! Solves `∇²u = f` in place with Gauss–Seidel sweeps and over-relaxation.
//! Boundary cells use degree-counted averaging (the update weight is
//! `ω / neighbor_count`), which approximates a zero-flux boundary; the
//! mesh-advection coupling downstream was tuned against exactly this
//! stencil, so it must not be swapped for ghost-cell mirroring.
//!
//! Solutions are unique only up to a constant: the caller must shift `f`
//! to zero mean before calling, or the sweeps will not settle.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::grid::ScalarGrid;
use crate::progress::{Phase, RunHooks};

/// Failure modes of a relaxation call.
#[derive(Debug, Error)]
pub enum RelaxError {
    /// A sweep produced a non-finite update; the system cannot recover.
    #[error("relaxation diverged during sweep {sweep}")]
    Diverged {
        /// 1-based sweep in which the non-finite update appeared.
        sweep: u32,
    },

    /// The cancel flag was observed at a yield point.
    #[error("relaxation cancelled")]
    Cancelled,
}

/// Tuning knobs for [`relax`], taken from the run configuration.
#[derive(Debug, Clone, Copy)]
pub struct RelaxOptions {
    /// Over-relaxation factor, strictly between 1 and 2.
    pub omega: f64,
    /// Convergence threshold on the largest per-sweep update.
    pub tolerance: f64,
    /// Sweep cap.
    pub max_sweeps: u32,
    /// Sweeps between cooperative yields.
    pub yield_every: u32,
}

/// Convergence record of one relaxation call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RelaxStats {
    /// Sweeps performed.
    pub sweeps: u32,
    /// Largest update of the final sweep.
    pub max_delta: f64,
}

/// Relaxes `u` toward the solution of `∇²u = f` in place.
///
/// Sweeps run in row-major order; later cells in a sweep see neighbors
/// already updated in that sweep. Returns once the largest update of a
/// sweep drops below `tolerance` or the sweep cap is reached. Every
/// `yield_every` sweeps the cancel flag is observed and a fractional
/// progress event tagged `phase` is emitted.
///
/// # Panics
///
/// Panics if `u` and `f` differ in shape.
pub fn relax(
    u: &mut ScalarGrid,
    f: &ScalarGrid,
    options: &RelaxOptions,
    phase: Phase,
    hooks: &mut RunHooks<'_>,
) -> Result<RelaxStats, RelaxError> {
    assert_eq!(
        (u.width, u.height),
        (f.width, f.height),
        "unknown and right-hand side must share a shape"
    );

    let width = u.width;
    let height = u.height;
    let mut max_delta: f64 = 0.0;

    for sweep in 1..=options.max_sweeps {
        max_delta = 0.0;

        for y in 0..height {
            for x in 0..width {
                let mut neighbor_sum = 0.0;
                let mut neighbor_count = 0.0;
                if x > 0 {
                    neighbor_sum += u.get(x - 1, y);
                    neighbor_count += 1.0;
                }
                if x + 1 < width {
                    neighbor_sum += u.get(x + 1, y);
                    neighbor_count += 1.0;
                }
                if y > 0 {
                    neighbor_sum += u.get(x, y - 1);
                    neighbor_count += 1.0;
                }
                if y + 1 < height {
                    neighbor_sum += u.get(x, y + 1);
                    neighbor_count += 1.0;
                }

                let delta = options.omega / neighbor_count
                    * (neighbor_sum - neighbor_count * u.get(x, y) - f.get(x, y));
                if !delta.is_finite() {
                    return Err(RelaxError::Diverged { sweep });
                }

                u.add(x, y, delta);
                max_delta = max_delta.max(delta.abs());
            }
        }

        if sweep % options.yield_every == 0 {
            if hooks.cancelled() {
                return Err(RelaxError::Cancelled);
            }
            hooks.emit(phase, f64::from(sweep) / f64::from(options.max_sweeps));
        }

        if max_delta < options.tolerance {
            return Ok(RelaxStats { sweeps: sweep, max_delta });
        }
    }

    Ok(RelaxStats {
        sweeps: options.max_sweeps,
        max_delta,
    })
}

/// Per-cell defect `|stencil(u) − f|` of a candidate solution.
///
/// Diagnostic companion to [`relax`]: a converged solve leaves every cell
/// within a small multiple of the configured tolerance.
pub fn stencil_residual(u: &ScalarGrid, f: &ScalarGrid) -> ScalarGrid {
    let width = u.width;
    let height = u.height;
    ScalarGrid::from_fn(width, height, |x, y| {
        let mut neighbor_sum = 0.0;
        let mut neighbor_count = 0.0;
        if x > 0 {
            neighbor_sum += u.get(x - 1, y);
            neighbor_count += 1.0;
        }
        if x + 1 < width {
            neighbor_sum += u.get(x + 1, y);
            neighbor_count += 1.0;
        }
        if y > 0 {
            neighbor_sum += u.get(x, y - 1);
            neighbor_count += 1.0;
        }
        if y + 1 < height {
            neighbor_sum += u.get(x, y + 1);
            neighbor_count += 1.0;
        }
        (neighbor_sum - neighbor_count * u.get(x, y) - f.get(x, y)).abs()
    })
}
