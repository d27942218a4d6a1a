//! Whole-project analysis: read files, extract in parallel, merge, then run
//! the single-threaded model passes.

use super::cancellation::CancellationToken;
use crate::analysis::{build_model, AnalysisRun};
use crate::config::DimapConfig;
use crate::core::{Error, ParseStatus, ProjectDI};
use crate::errors::{AnalysisFailure, AnalysisResults};
use crate::extraction::{extract_file, FileExtraction};
use crate::io::{FileSystem, RealFileSystem};
use crate::observability::{set_current_file, set_phase, AnalysisPhase};
use crate::patterns::{PatternSet, Vendor};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, info, info_span, warn};

/// Knobs of one analysis run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisOptions {
    pub vendors: Vec<Vendor>,
    pub follow_registrations: bool,
    pub ignored_service_types: Vec<String>,
    pub parallel: bool,
    /// Worker threads; `0` uses rayon's global pool.
    pub jobs: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&DimapConfig::default())
    }
}

impl AnalysisOptions {
    pub fn from_config(config: &DimapConfig) -> Self {
        Self {
            vendors: config.analysis.vendors.clone(),
            follow_registrations: config.analysis.follow_registrations,
            ignored_service_types: config.analysis.ignored_service_types.clone(),
            parallel: config.parallel.enabled,
            jobs: config.parallel.jobs,
        }
    }
}

/// UTF-8 text of a source file, without a leading byte-order mark.
fn decode_source(path: &Path, bytes: Vec<u8>) -> Result<String, AnalysisFailure> {
    let mut text = String::from_utf8(bytes).map_err(|e| {
        AnalysisFailure::extraction(path.to_path_buf(), format!("not valid UTF-8: {e}"))
    })?;
    if text.starts_with('\u{feff}') {
        text.replace_range(..'\u{feff}'.len_utf8(), "");
    }
    Ok(text)
}

pub struct ProjectAnalyzer<F: FileSystem> {
    fs: F,
    options: AnalysisOptions,
    patterns: PatternSet,
    cancellation: CancellationToken,
}

impl ProjectAnalyzer<RealFileSystem> {
    pub fn new(options: AnalysisOptions) -> Self {
        Self::with_file_system(RealFileSystem::new(), options)
    }
}

impl<F: FileSystem> ProjectAnalyzer<F> {
    pub fn with_file_system(fs: F, options: AnalysisOptions) -> Self {
        let patterns = PatternSet::new(&options.vendors);
        Self {
            fs,
            options,
            patterns,
            cancellation: CancellationToken::new(),
        }
    }

    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = token;
        self
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Read and extract one file, counting it in `processed`. `None` when
    /// the run was cancelled before the file was read.
    fn process_file(
        &self,
        path: &Path,
        processed: &AtomicUsize,
    ) -> Option<Result<FileExtraction, AnalysisFailure>> {
        if self.cancellation.is_cancelled() {
            return None;
        }
        let _file = set_current_file(path);

        let outcome = self
            .fs
            .read_bytes(path)
            .map_err(|e| AnalysisFailure::file_read(path.to_path_buf(), e))
            .and_then(|bytes| decode_source(path, bytes))
            .map(|text| {
                extract_file(
                    path,
                    &text,
                    &self.patterns,
                    &self.options.ignored_service_types,
                )
            });

        if let Err(failure) = &outcome {
            warn!(phase = %AnalysisPhase::Extraction, "{failure}");
        }
        processed.fetch_add(1, Ordering::Relaxed);
        Some(outcome)
    }

    fn extract_all(
        &self,
        files: &[PathBuf],
        processed: &AtomicUsize,
    ) -> Vec<Option<Result<FileExtraction, AnalysisFailure>>> {
        if !self.options.parallel {
            return files.iter().map(|f| self.process_file(f, processed)).collect();
        }

        let run = || {
            files
                .par_iter()
                .map(|f| self.process_file(f, processed))
                .collect()
        };
        if self.options.jobs == 0 {
            return run();
        }
        match rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .build()
        {
            Ok(pool) => pool.install(run),
            Err(e) => {
                warn!(error = %e, "failed to build thread pool, using the global pool");
                run()
            }
        }
    }

    /// Analyze `files` under `root`.
    ///
    /// Only an unusable project root is an error. Unreadable files degrade
    /// the result to `partial` or `failed`; cancellation yields `failed`
    /// with no services.
    pub fn analyze(
        &self,
        root: &Path,
        project_name: &str,
        files: &[PathBuf],
    ) -> Result<ProjectDI, Error> {
        let span = info_span!("analyze_project", root = %root.display());
        let _span = span.enter();

        let mut run = AnalysisRun::new();
        run.start()?;

        if !self.fs.is_dir(root) {
            return Err(Error::project_root(root, "not a readable directory"));
        }

        if files.is_empty() {
            run.finish(false, false, true)?;
            return Ok(ProjectDI::failed(
                root,
                project_name.to_string(),
                vec![format!("No source files found under {}", root.display())],
            ));
        }

        let outcomes = {
            let _phase = set_phase(AnalysisPhase::Extraction);
            let processed = AtomicUsize::new(0);
            let outcomes = self.extract_all(files, &processed);
            debug!(
                processed = processed.load(Ordering::Relaxed),
                total = files.len(),
                "extraction pass finished"
            );
            outcomes
        };

        if self.cancellation.is_cancelled() {
            run.finish(true, false, true)?;
            info!("analysis cancelled");
            return Ok(ProjectDI::failed(
                root,
                project_name.to_string(),
                vec![Error::Cancelled.to_string()],
            ));
        }

        let results: AnalysisResults<FileExtraction> = outcomes.into_iter().flatten().collect();

        let mut registrations = Vec::new();
        let mut sites = Vec::new();
        for extraction in results.successes.iter() {
            debug!(
                file = %extraction.path.display(),
                registrations = extraction.registrations.len(),
                sites = extraction.injection_sites.len(),
                "extracted file"
            );
            registrations.extend(extraction.registrations.iter().cloned());
            sites.extend(extraction.injection_sites.iter().cloned());
        }

        let model = build_model(&registrations, sites, self.options.follow_registrations);

        let mut errors = results.error_details();
        let status = run.finish(false, !model.service_groups.is_empty(), !errors.is_empty())?;
        if status == ParseStatus::Failed && errors.is_empty() {
            errors.push(format!(
                "No DI registrations found in {} source files",
                files.len()
            ));
        }

        info!(
            status = %status,
            files = files.len(),
            failures = results.failure_count(),
            registrations = registrations.len(),
            cycles = model.cycles.len(),
            "analysis complete"
        );

        Ok(ProjectDI {
            project_path: root.to_path_buf(),
            project_name: project_name.to_string(),
            service_groups: model.service_groups,
            dependency_graph: model.dependency_graph,
            cycles: model.cycles,
            parse_status: status,
            error_details: (!errors.is_empty()).then_some(errors),
            unregistered_services: model.unregistered_services,
        })
    }
}

/// Analyze `files` under `root` from disk with default options, naming the
/// project after `root`.
pub fn analyze_project(root: &Path, files: &[PathBuf]) -> Result<ProjectDI, Error> {
    let name = crate::io::find_project_name(root);
    ProjectAnalyzer::new(AnalysisOptions::default()).analyze(root, &name, files)
}
