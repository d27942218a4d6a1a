//! Registration extractor.
//!
//! Applies every registration pattern, lifetime by lifetime, and keeps all
//! matches. Overlapping patterns may report the same call twice; no
//! deduplication happens here.

use super::call_args::has_lambda_argument;
use super::types::{is_valid_service_type, normalize_type};
use super::LineIndex;
use crate::core::{Lifetime, Registration};
use crate::patterns::{groups, PatternKind, PatternSet, RegistrationPattern, FACTORY_IMPLEMENTATION};
use regex::Captures;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

/// Hands out per-file unique registration ids of the form
/// `<file name>-<line>`, with `-2`, `-3`, ... appended on repeats.
#[derive(Debug, Default)]
pub struct RegistrationIds {
    used: HashMap<String, usize>,
}

impl RegistrationIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, file_path: &Path, line_number: usize) -> String {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| file_path.display().to_string());
        let base = format!("{file_name}-{line_number}");
        let seen = self.used.entry(base.clone()).or_insert(0);
        *seen += 1;
        if *seen == 1 {
            base
        } else {
            format!("{base}-{seen}")
        }
    }
}

/// Service and implementation named by one match, or `None` when the
/// match cannot be interpreted.
fn extract_types(
    pattern: &RegistrationPattern,
    caps: &Captures<'_>,
    text: &str,
) -> Option<(String, String)> {
    let capture = |name: &str| caps.name(name).map(|m| normalize_type(m.as_str()));

    match pattern.kind {
        PatternKind::TwoTypes => Some((
            capture(groups::SERVICE)?,
            capture(groups::IMPLEMENTATION)?,
        )),
        PatternKind::OneType => {
            let service = capture(groups::SERVICE)?;
            Some((service.clone(), service))
        }
        PatternKind::FactoryLambda => {
            Some((capture(groups::SERVICE)?, FACTORY_IMPLEMENTATION.to_string()))
        }
        PatternKind::OneTypeArgument => {
            let argument = caps.name(groups::ARGUMENT)?;
            let whole = caps.get(0)?;
            let open = whole.start() + text.get(whole.start()..)?.find('(')?;
            if argument.as_str() == "new" || has_lambda_argument(text, open) {
                return None;
            }
            let service = capture(groups::SERVICE)?;
            Some((service.clone(), service))
        }
        PatternKind::MethodOnly { label } => {
            let method = caps.name(groups::METHOD)?;
            let service = method
                .as_str()
                .strip_prefix("Add")
                .unwrap_or(method.as_str())
                .to_string();
            let whole = caps.get(0)?;
            let open = whole.end().checked_sub(1)?;
            let implementation = if has_lambda_argument(text, open) {
                FACTORY_IMPLEMENTATION
            } else {
                label
            };
            Some((service, implementation.to_string()))
        }
    }
}

pub(super) fn extract_with_index(
    file_path: &Path,
    text: &str,
    index: &LineIndex,
    patterns: &PatternSet,
) -> Vec<Registration> {
    let mut ids = RegistrationIds::new();
    let mut registrations = Vec::new();

    for lifetime in Lifetime::ALL {
        for pattern in patterns.registration_patterns(lifetime) {
            for caps in pattern.regex.captures_iter(text) {
                let Some(whole) = caps.get(0) else { continue };
                let Some((service_type, implementation_type)) =
                    extract_types(pattern, &caps, text)
                else {
                    debug!(
                        pattern = pattern.name,
                        file = %file_path.display(),
                        "discarding uninterpretable registration match"
                    );
                    continue;
                };
                if !is_valid_service_type(&service_type) {
                    continue;
                }

                let line_number = index.line_number(whole.start());
                registrations.push(Registration {
                    id: ids.next(file_path, line_number),
                    lifetime,
                    service_type,
                    implementation_type,
                    file_path: file_path.to_path_buf(),
                    line_number,
                    method_call: whole.as_str().trim().to_string(),
                });
            }
        }
    }

    registrations
}

/// Extract every registration in `text`, in pattern order then text order.
pub fn extract_registrations(
    file_path: &Path,
    text: &str,
    patterns: &PatternSet,
) -> Vec<Registration> {
    extract_with_index(file_path, text, &LineIndex::new(text), patterns)
}
