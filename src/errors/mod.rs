pub mod collection;

pub use collection::{AnalysisFailure, AnalysisResults, OperationType};
