//! Thread-local context tracking for failure reports.
//!
//! Records the active analysis phase and file so warnings and collected
//! failures can say where they happened. Context is per thread, which works
//! with rayon workers and is restored when each guard drops, so nothing
//! outlives a run.

use std::cell::RefCell;
use std::path::PathBuf;

thread_local! {
    static CURRENT_CONTEXT: RefCell<AnalysisContext> = const { RefCell::new(AnalysisContext::new()) };
}

/// Snapshot of what the current thread is doing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisContext {
    pub phase: Option<AnalysisPhase>,
    pub current_file: Option<PathBuf>,
}

impl AnalysisContext {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            phase: None,
            current_file: None,
        }
    }
}

/// Stages of one analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisPhase {
    FileDiscovery,
    /// Reading files and applying the pattern catalogs
    Extraction,
    Linking,
    Aggregation,
    ConflictDetection,
    CycleDetection,
    /// Mapping a foreign analyzer result
    ExternalImport,
    OutputGeneration,
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::FileDiscovery => write!(f, "file_discovery"),
            Self::Extraction => write!(f, "extraction"),
            Self::Linking => write!(f, "linking"),
            Self::Aggregation => write!(f, "aggregation"),
            Self::ConflictDetection => write!(f, "conflict_detection"),
            Self::CycleDetection => write!(f, "cycle_detection"),
            Self::ExternalImport => write!(f, "external_import"),
            Self::OutputGeneration => write!(f, "output_generation"),
        }
    }
}

/// Restores the previous context when dropped, so guards nest.
pub struct ContextGuard {
    previous: AnalysisContext,
}

impl Drop for ContextGuard {
    fn drop(&mut self) {
        let previous = std::mem::take(&mut self.previous);
        CURRENT_CONTEXT.with(|cell| cell.replace(previous));
    }
}

/// Set the current phase until the returned guard drops.
///
/// ```
/// use dimap::observability::{current_context, set_phase, AnalysisPhase};
///
/// {
///     let _phase = set_phase(AnalysisPhase::Linking);
///     assert_eq!(current_context().phase, Some(AnalysisPhase::Linking));
/// }
/// assert_eq!(current_context().phase, None);
/// ```
#[must_use]
pub fn set_phase(phase: AnalysisPhase) -> ContextGuard {
    update_context(|ctx| ctx.phase = Some(phase))
}

/// Set the file being processed until the returned guard drops.
#[must_use]
pub fn set_current_file(path: impl Into<PathBuf>) -> ContextGuard {
    let path = path.into();
    update_context(|ctx| ctx.current_file = Some(path))
}

fn update_context(change: impl FnOnce(&mut AnalysisContext)) -> ContextGuard {
    CURRENT_CONTEXT.with(|cell| {
        let mut ctx = cell.borrow_mut();
        let previous = ctx.clone();
        change(&mut ctx);
        ContextGuard { previous }
    })
}

#[must_use]
pub fn current_context() -> AnalysisContext {
    CURRENT_CONTEXT.with(|ctx| ctx.borrow().clone())
}

pub fn reset_context() {
    CURRENT_CONTEXT.with(|cell| cell.replace(AnalysisContext::new()));
}
