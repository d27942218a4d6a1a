use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::DimapConfig;
use crate::core::Error;

pub const CONFIG_FILE_NAME: &str = ".dimap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

fn parse_config(contents: &str, path: &Path) -> Result<DimapConfig, Error> {
    toml::from_str::<DimapConfig>(contents)
        .map_err(|e| Error::configuration(format!("failed to parse {}: {e}", path.display())))
}

/// Load an explicitly named configuration file. Any failure is an error.
pub fn load_config_from(path: &Path) -> Result<DimapConfig, Error> {
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::configuration(format!("failed to read {}: {e}", path.display()))
    })?;
    let config = parse_config(&contents, path)?;
    debug!(path = %path.display(), "loaded config");
    Ok(config)
}

fn try_load_config_from_path(config_path: &Path) -> Option<DimapConfig> {
    let contents = match fs::read_to_string(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            // a missing file is the normal case while walking up
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %config_path.display(), error = %e, "failed to read config file");
            }
            return None;
        }
    };

    match parse_config(&contents, config_path) {
        Ok(config) => {
            debug!(path = %config_path.display(), "loaded config");
            Some(config)
        }
        Err(e) => {
            warn!("{e}. Using defaults.");
            None
        }
    }
}

/// `start` and its ancestors, nearest first, at most `max_depth` entries.
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest `.dimap.toml` at or above `start`.
///
/// Unreadable or invalid files are skipped with a warning; when nothing
/// usable is found the defaults apply.
pub fn load_config(start: &Path) -> DimapConfig {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find_map(|path| try_load_config_from_path(&path))
        .unwrap_or_else(|| {
            debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            DimapConfig::default()
        })
}
