//! Progress phases, diagnostic sinks, and cooperative cancellation.
//!
//! The engine does no I/O and owns no event bus; everything a host wants to
//! observe flows through the [`RunHooks`] it passes in.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::grid::ScalarGrid;

/// Pipeline phase tags reported through the progress sink.
///
/// Progress events carry a fraction in `[0, 1]` and arrive in monotonic
/// non-decreasing iteration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Target normalization and lattice construction.
    Init,
    /// Poisson solve for the transport potential of the given iteration.
    IterRelax(u32),
    /// Advection step of the given iteration.
    IterMarch(u32),
    /// Poisson solve for the surface height field.
    HeightRelax,
    /// Extrusion into the closed solid.
    Solidify,
    /// The run finished and the mesh was emitted.
    Done,
    /// The run failed; no mesh was emitted.
    Error,
}

impl Phase {
    /// The outer iteration this phase belongs to, if any.
    pub fn iteration(&self) -> Option<u32> {
        match self {
            Self::IterRelax(k) | Self::IterMarch(k) => Some(*k),
            _ => None,
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init => write!(f, "init"),
            Self::IterRelax(k) => write!(f, "iter({})/relax", k),
            Self::IterMarch(k) => write!(f, "iter({})/march", k),
            Self::HeightRelax => write!(f, "height/relax"),
            Self::Solidify => write!(f, "solidify"),
            Self::Done => write!(f, "done"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// One-shot cancellation flag shared between a host and a run.
///
/// Clones observe the same flag. Once set it stays set; the run returns
/// `Cancelled` at its next yield point and drops all working buffers.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    /// Creates an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Optional observation surfaces for one generation run.
#[derive(Default)]
pub struct RunHooks<'a> {
    /// Receives `(phase, fraction)` progress events.
    pub progress: Option<Box<dyn FnMut(Phase, f64) + 'a>>,
    /// Receives the per-iteration residual diagnostic image, remapped to
    /// `[0, 1]`, at most once per outer iteration.
    pub residual: Option<Box<dyn FnMut(u32, &ScalarGrid) + 'a>>,
    /// Cooperative cancellation flag.
    pub cancel: Option<CancelFlag>,
}

impl<'a> RunHooks<'a> {
    /// Hooks that observe nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attaches a progress sink.
    pub fn with_progress(mut self, sink: impl FnMut(Phase, f64) + 'a) -> Self {
        self.progress = Some(Box::new(sink));
        self
    }

    /// Attaches a residual diagnostic sink.
    pub fn with_residual_sink(mut self, sink: impl FnMut(u32, &ScalarGrid) + 'a) -> Self {
        self.residual = Some(Box::new(sink));
        self
    }

    /// Attaches a cancellation flag.
    pub fn with_cancel(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub(crate) fn emit(&mut self, phase: Phase, fraction: f64) {
        if let Some(sink) = self.progress.as_mut() {
            sink(phase, fraction);
        }
    }

    pub(crate) fn emit_residual(&mut self, iteration: u32, residual: &ScalarGrid) {
        if let Some(sink) = self.residual.as_mut() {
            sink(iteration, residual);
        }
    }

    pub(crate) fn cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_tags() {
        assert_eq!(Phase::Init.to_string(), "init");
        assert_eq!(Phase::IterRelax(3).to_string(), "iter(3)/relax");
        assert_eq!(Phase::IterMarch(7).to_string(), "iter(7)/march");
        assert_eq!(Phase::HeightRelax.to_string(), "height/relax");
        assert_eq!(Phase::Solidify.to_string(), "solidify");
        assert_eq!(Phase::Done.to_string(), "done");
        assert_eq!(Phase::Error.to_string(), "error");
    }

    #[test]
    fn test_phase_iteration_accessor() {
        assert_eq!(Phase::IterRelax(2).iteration(), Some(2));
        assert_eq!(Phase::IterMarch(2).iteration(), Some(2));
        assert_eq!(Phase::HeightRelax.iteration(), None);
    }

    #[test]
    fn test_cancel_flag_is_shared_and_sticky() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        assert!(!clone.is_cancelled());

        flag.cancel();
        assert!(clone.is_cancelled());
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_hooks_forward_events() {
        let mut phases = Vec::new();
        let mut hooks = RunHooks::new().with_progress(|phase, fraction| {
            phases.push((phase, fraction));
        });

        hooks.emit(Phase::Init, 0.0);
        hooks.emit(Phase::Done, 1.0);
        drop(hooks);

        assert_eq!(phases, vec![(Phase::Init, 0.0), (Phase::Done, 1.0)]);
    }

    #[test]
    fn test_hooks_without_cancel_never_cancel() {
        let hooks = RunHooks::new();
        assert!(!hooks.cancelled());
    }
}
