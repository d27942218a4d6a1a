//! Injection shapes that belong to the language rather than a container.

use super::{
    groups, ClassSource, InjectionPattern, InjectionShape, MemberSource, TYPE,
};
use once_cell::sync::Lazy;

pub static INJECTIONS: Lazy<Vec<InjectionPattern>> = Lazy::new(|| {
    let c = groups::CLASS;
    let p = groups::PARAMS;
    let s = groups::SERVICE;
    let m = groups::MEMBER;

    vec![
        // A constructor is the only member declared as `Name(...)` with no
        // return type in front of it. The body is a block or an expression.
        InjectionPattern::new(
            "constructor",
            &format!(
                r"(?m)^[ \t]*(?:(?:public|protected|internal|private)\s+)*(?P<{c}>[A-Z]\w*)\s*\((?P<{p}>[^()]*)\)\s*(?::\s*(?:base|this)\s*\([^()]*\)\s*)?(?:\{{|=>)"
            ),
            InjectionShape::constructor(ClassSource::Captured),
        ),
        InjectionPattern::new(
            "primary-constructor",
            &format!(
                r"\b(?:class|record|struct)\s+(?P<{c}>[A-Z]\w*)\s*(?:<[^<>()]*>)?\s*\((?P<{p}>[^()]*)\)"
            ),
            InjectionShape::constructor(ClassSource::Captured),
        ),
        InjectionPattern::new(
            "inject-property",
            &format!(
                r"\[Inject\]\s*(?:(?:public|protected|internal|private)\s+)?(?P<{s}>{TYPE})\s+(?P<{m}>\w+)\s*\{{"
            ),
            InjectionShape::field(MemberSource::Captured),
        ),
        InjectionPattern::new(
            "readonly-field",
            &format!(
                r"(?m)^[ \t]*(?:(?:private|protected|internal|public)\s+)?(?:static\s+)?readonly\s+(?P<{s}>I[A-Z]\w*(?:<(?:[^<>]|<[^<>]*>)*>)?)\s+(?P<{m}>\w+)\s*;"
            ),
            InjectionShape::field(MemberSource::Label("field")),
        ),
    ]
});
