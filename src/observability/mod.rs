//! Logging setup and analysis context tracking.
//!
//! The binary calls [`init_logging`] once; library code only emits
//! `tracing` events and sets phase guards:
//!
//! ```ignore
//! let _phase = set_phase(AnalysisPhase::Extraction);
//! for file in files {
//!     let _file = set_current_file(file);
//!     // failures recorded here carry the phase and file
//! }
//! ```

pub mod context;

pub use context::{
    current_context, set_current_file, set_phase, AnalysisContext, AnalysisPhase, ContextGuard,
};

use tracing_subscriber::{fmt, EnvFilter};

/// Default filter directive for a `-v` count.
pub fn level_for_verbosity(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over the verbosity-derived level. Calling this twice
/// is harmless; the second call leaves the first subscriber in place.
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for_verbosity(verbosity)));

    let _ = fmt()
        .with_env_filter(filter)
        .with_target(verbosity >= 2)
        .with_writer(std::io::stderr)
        .try_init();
}
