//! Type-name normalization and parameter-list parsing.

use crate::core::UNKNOWN_TYPE;

/// Types that are never resolved from a container.
pub const BUILTIN_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "decimal", "double", "float", "int", "uint", "nint",
    "nuint", "long", "ulong", "short", "ushort", "object", "string", "dynamic", "var", "void",
    "String", "Boolean", "Byte", "Char", "Decimal", "Double", "Single", "Int16", "Int32",
    "Int64", "UInt16", "UInt32", "UInt64", "Object", "Guid", "DateTime", "DateTimeOffset",
    "TimeSpan", "Uri", "CancellationToken", "System.String", "System.Threading.CancellationToken",
];

const PARAMETER_MODIFIERS: &[&str] = &["this", "ref", "out", "in", "params", "scoped", "readonly"];

/// Canonical spelling of a captured type: whitespace removed, `global::`
/// prefix and nullable marker dropped.
pub fn normalize_type(raw: &str) -> String {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let trimmed = compact.strip_prefix("global::").unwrap_or(&compact);
    trimmed.trim_end_matches('?').to_string()
}

/// Whether an extracted type is usable as a service key.
pub fn is_valid_service_type(service_type: &str) -> bool {
    !service_type.is_empty() && service_type != UNKNOWN_TYPE
}

/// Whether a parameter type can name an injected service.
pub fn is_service_candidate(type_name: &str, ignored: &[String]) -> bool {
    let base = type_name.trim_end_matches("[]");
    is_valid_service_type(type_name)
        && !BUILTIN_TYPES.contains(&base)
        && !ignored.iter().any(|t| t == type_name || t == base)
        && base
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
}

/// One declared parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub type_name: String,
    pub name: String,
}

/// Split a parameter list at top-level commas.
fn split_top_level(list: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;

    for (i, c) in list.char_indices() {
        match c {
            '<' | '[' | '(' | '{' => depth += 1,
            '>' | ']' | ')' | '}' => depth -= 1,
            ',' if depth == 0 => {
                parts.push(&list[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    parts.push(&list[start..]);
    parts
}

/// Drop leading `[Attribute(...)]` groups.
fn strip_attributes(mut param: &str) -> &str {
    loop {
        param = param.trim_start();
        if !param.starts_with('[') {
            return param;
        }
        let mut depth = 0i32;
        let mut end = None;
        for (i, c) in param.char_indices() {
            match c {
                '[' => depth += 1,
                ']' => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(i);
                        break;
                    }
                }
                _ => {}
            }
        }
        match end {
            Some(i) => param = &param[i + 1..],
            None => return "",
        }
    }
}

fn parse_parameter(raw: &str) -> Option<Parameter> {
    let without_attrs = strip_attributes(raw);
    let declaration = without_attrs
        .split_once('=')
        .map(|(decl, _)| decl)
        .unwrap_or(without_attrs)
        .trim();

    // the name is the last identifier; everything before it is the type
    let split_at = declaration
        .char_indices()
        .rev()
        .find(|(_, c)| c.is_whitespace() || *c == '>' || *c == ']' || *c == '?')
        .map(|(i, c)| i + c.len_utf8())?;
    let (type_part, name) = declaration.split_at(split_at);
    let name = name.trim();
    if name.is_empty() || !name.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '@') {
        return None;
    }

    let mut type_part = type_part.trim();
    while let Some((first, rest)) = type_part.split_once(char::is_whitespace) {
        if PARAMETER_MODIFIERS.contains(&first) {
            type_part = rest.trim_start();
        } else {
            break;
        }
    }

    let type_name = normalize_type(type_part);
    if type_name.is_empty() {
        return None;
    }

    Some(Parameter {
        type_name,
        name: name.to_string(),
    })
}

/// Parse a declared parameter list such as
/// `[FromServices] IClock clock, ILogger<Foo> logger = null`.
pub fn parse_parameters(list: &str) -> Vec<Parameter> {
    if list.trim().is_empty() {
        return Vec::new();
    }
    split_top_level(list)
        .into_iter()
        .filter_map(parse_parameter)
        .collect()
}
