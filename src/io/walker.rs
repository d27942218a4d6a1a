use crate::core::Error;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Enumerates the source files of a project, honouring `.gitignore`.
pub struct FileWalker {
    root: PathBuf,
    extensions: Vec<String>,
    exclude: Vec<glob::Pattern>,
}

impl FileWalker {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            extensions: vec!["cs".to_string()],
            exclude: Vec::new(),
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.trim_start_matches('.').to_string())
            .collect();
        self
    }

    /// Exclude files matching any of `patterns`, tested against both the
    /// root-relative and the full path.
    pub fn with_exclude_patterns(mut self, patterns: &[String]) -> Result<Self, Error> {
        self.exclude = patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<_, _>>()?;
        Ok(self)
    }

    /// Matching files in sorted order.
    ///
    /// Only a root that is not a directory is an error. Entries that cannot
    /// be read are logged and skipped.
    pub fn walk(&self) -> Result<Vec<PathBuf>, Error> {
        if !self.root.is_dir() {
            return Err(Error::project_root(&self.root, "not a readable directory"));
        }

        let mut files = Vec::new();
        let walker = WalkBuilder::new(&self.root)
            .hidden(false)
            .git_ignore(true)
            .build();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "skipping unreadable entry");
                    continue;
                }
            };
            let path = entry.path();

            if path.is_file() && self.should_process(path) {
                files.push(path.to_path_buf());
            }
        }

        files.sort();
        debug!(root = %self.root.display(), count = files.len(), "discovered source files");
        Ok(files)
    }

    fn should_process(&self, path: &Path) -> bool {
        let Some(ext) = path.extension() else {
            return false;
        };
        let ext = ext.to_string_lossy();
        if !self.extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext)) {
            return false;
        }

        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        !self
            .exclude
            .iter()
            .any(|pattern| pattern.matches_path(relative) || pattern.matches_path(path))
    }
}

fn first_stem_with_extension(entries: &[PathBuf], extension: &str) -> Option<String> {
    entries
        .iter()
        .filter(|p| {
            p.extension()
                .is_some_and(|e| e.eq_ignore_ascii_case(extension))
        })
        .find_map(|p| p.file_stem().map(|s| s.to_string_lossy().into_owned()))
}

/// Name of the project at `root`: the first solution file's stem, else the
/// first project file's stem, else the directory name.
pub fn find_project_name(root: &Path) -> String {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(root)
        .map(|dir| dir.filter_map(|e| e.ok()).map(|e| e.path()).collect())
        .unwrap_or_default();
    entries.sort();

    first_stem_with_extension(&entries, "sln")
        .or_else(|| first_stem_with_extension(&entries, "csproj"))
        .or_else(|| {
            root.canonicalize()
                .ok()
                .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        })
        .unwrap_or_else(|| root.display().to_string())
}
