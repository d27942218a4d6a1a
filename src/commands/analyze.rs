use crate::builders::{AnalysisOptions, CancellationToken, ProjectAnalyzer};
use crate::config::{load_config, load_config_from, DimapConfig};
use crate::io::{find_project_name, FileWalker, OutputFormat};
use crate::observability::{set_phase, AnalysisPhase};
use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;

#[derive(Debug, Clone)]
pub struct AnalyzeArgs {
    pub path: PathBuf,
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub exclude: Vec<String>,
    pub jobs: Option<usize>,
}

fn resolve_config(args: &AnalyzeArgs) -> Result<DimapConfig> {
    let mut config = match &args.config {
        Some(path) => load_config_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => load_config(&args.path),
    };
    config.files.exclude.extend(args.exclude.iter().cloned());
    if let Some(jobs) = args.jobs {
        config.parallel.jobs = jobs;
    }
    Ok(config)
}

/// Analyze `args.path` and write the result. A `failed` analysis is still
/// a successful command; only unusable inputs return an error.
pub fn handle_analyze(args: AnalyzeArgs, cancellation: CancellationToken) -> Result<()> {
    let config = resolve_config(&args)?;
    let root = args.path.clone();

    let files = {
        let _phase = set_phase(AnalysisPhase::FileDiscovery);
        let walker = FileWalker::new(root.clone())
            .with_extensions(config.files.extensions.clone())
            .with_exclude_patterns(&config.files.exclude)
            .context("Invalid exclude pattern")?;
        if root.is_dir() {
            walker
                .walk()
                .with_context(|| format!("Failed to list files under {}", root.display()))?
        } else {
            Vec::new()
        }
    };
    info!(files = files.len(), root = %root.display(), "discovered source files");

    let project_name = find_project_name(&root);
    let analyzer = ProjectAnalyzer::new(AnalysisOptions::from_config(&config))
        .with_cancellation(cancellation);
    let project = analyzer
        .analyze(&root, &project_name, &files)
        .with_context(|| format!("Failed to analyze {}", root.display()))?;

    info!(
        status = %project.parse_status,
        services = project.services().len(),
        conflicts = project.conflict_count(),
        cycles = project.cycles.len(),
        "analysis finished"
    );

    let format = args.format.unwrap_or(config.output.format);
    super::emit(std::slice::from_ref(&project), format, args.output.as_deref())
}
