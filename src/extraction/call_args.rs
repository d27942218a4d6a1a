//! Argument text of a call, recovered from the opening parenthesis.

/// Upper bound on how far a call's arguments are scanned.
pub const MAX_ARGUMENT_SCAN: usize = 4096;

/// Text between the parenthesis at `open` and its matching close.
///
/// String and char literals are skipped so parentheses inside them do not
/// count. An unbalanced call yields everything up to the scan bound.
pub fn call_arguments(text: &str, open: usize) -> Option<&str> {
    if text.as_bytes().get(open) != Some(&b'(') {
        return None;
    }

    let start = open + 1;
    let limit = text.len().min(start + MAX_ARGUMENT_SCAN);
    let bytes = text.as_bytes();
    let mut depth = 1usize;
    let mut quote: Option<u8> = None;
    let mut i = start;

    while i < limit {
        let b = bytes[i];
        match quote {
            Some(q) => {
                if b == b'\\' {
                    i += 1;
                } else if b == q {
                    quote = None;
                }
            }
            None => match b {
                b'"' | b'\'' => quote = Some(b),
                b'(' => depth += 1,
                b')' => {
                    depth -= 1;
                    if depth == 0 {
                        return text.get(start..i);
                    }
                }
                _ => {}
            },
        }
        i += 1;
    }

    text.get(start..limit)
}

/// Whether the call starting at `open` passes a lambda.
pub fn has_lambda_argument(text: &str, open: usize) -> bool {
    call_arguments(text, open).is_some_and(|args| args.contains("=>"))
}
