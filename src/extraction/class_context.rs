//! Backward scan recovering the class that encloses a line.
//!
//! Starting at the match line and moving up, the first `class <Name>`,
//! `record <Name>` or `record class <Name>` declaration wins. A `struct`,
//! `record struct`, `interface` or `enum` declaration, or a block
//! `namespace`, reached first means the site is not inside a class we can
//! name, and the scan yields [`UNKNOWN_CLASS`]. A file-scoped
//! `namespace X;` spans the whole file and does not stop the scan. The
//! scan never goes past the first line of the file.

use crate::core::UNKNOWN_CLASS;
use once_cell::sync::Lazy;
use regex::Regex;

const MODIFIERS: &str =
    r"(?:(?:public|private|protected|internal|abstract|sealed|static|partial|unsafe|new|file)\s+)*";

static CLASS_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    crate::patterns::compile(&format!(r"^\s*(?:\[[^\]]*\]\s*)*{MODIFIERS}(?:record\s+class|class|record)\s+([A-Za-z_]\w*)"))
});

static OTHER_TYPE_DECLARATION: Lazy<Regex> = Lazy::new(|| {
    crate::patterns::compile(&format!(
        r"^\s*(?:\[[^\]]*\]\s*)*{MODIFIERS}(?:readonly\s+|ref\s+)*(?:struct|interface|enum|record\s+struct)\s+[A-Za-z_]\w*"
    ))
});

static NAMESPACE_DECLARATION: Lazy<Regex> =
    Lazy::new(|| crate::patterns::compile(r"^\s*namespace\s+[\w.]+\s*(?:$|\{|//)"));

/// Outcome of scanning one line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LineContext {
    Class(String),
    Boundary,
    Unrelated,
}

fn classify(line: &str) -> LineContext {
    // `record struct` would otherwise read as a record named `struct`.
    if OTHER_TYPE_DECLARATION.is_match(line) {
        return LineContext::Boundary;
    }
    if let Some(name) = CLASS_DECLARATION
        .captures(line)
        .and_then(|caps| caps.get(1))
    {
        return LineContext::Class(name.as_str().to_string());
    }
    if NAMESPACE_DECLARATION.is_match(line) {
        return LineContext::Boundary;
    }
    LineContext::Unrelated
}

/// Name of the class enclosing `line_number` (1-based) in `lines`.
pub fn enclosing_class(lines: &[&str], line_number: usize) -> String {
    let start = line_number.saturating_sub(1).min(lines.len().saturating_sub(1));

    lines
        .get(..=start)
        .unwrap_or(&[])
        .iter()
        .rev()
        .find_map(|line| match classify(line) {
            LineContext::Class(name) => Some(name),
            LineContext::Boundary => Some(UNKNOWN_CLASS.to_string()),
            LineContext::Unrelated => None,
        })
        .unwrap_or_else(|| UNKNOWN_CLASS.to_string())
}
