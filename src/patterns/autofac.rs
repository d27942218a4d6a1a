//! Autofac catalog.
//!
//! Autofac chains the lifetime after the service binding
//! (`RegisterType<Foo>().As<IFoo>().SingleInstance()`), so every binding
//! head is combined with a lifetime tail. A chain without a lifetime call is
//! `InstancePerDependency`, i.e. transient.

use super::{
    groups, Catalog, InjectionPattern, InjectionShape, LifetimePatterns, MemberSource,
    PatternKind, RegistrationPattern, Vendor, LAMBDA_PARAMS, TYPE,
};
use crate::core::Lifetime;
use once_cell::sync::Lazy;

pub static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog {
    vendor: Vendor::Autofac,
    registrations: [Lifetime::Singleton, Lifetime::Scoped, Lifetime::Transient]
        .into_iter()
        .map(|lifetime| LifetimePatterns {
            lifetime,
            patterns: registration_patterns(lifetime),
        })
        .collect(),
    injections: injection_patterns(),
});

fn lifetime_tail(lifetime: Lifetime) -> &'static str {
    match lifetime {
        Lifetime::Singleton => r"[^;]*?\.SingleInstance\s*\(\s*\)",
        Lifetime::Scoped => {
            r"[^;]*?\.(?:InstancePerLifetimeScope|InstancePerRequest|InstancePerMatchingLifetimeScope|InstancePerOwned)\s*(?:<[^<>]*>)?\s*\("
        }
        Lifetime::Transient | Lifetime::Others => {
            r"(?:\s*\.InstancePerDependency\s*\(\s*\))?\s*;"
        }
    }
}

fn binding_heads() -> Vec<(&'static str, String, PatternKind)> {
    let s = groups::SERVICE;
    let i = groups::IMPLEMENTATION;
    let as_service = format!(r"\.As\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*\)");

    vec![
        (
            "register-type-as",
            format!(r"\.RegisterType\s*<\s*(?P<{i}>{TYPE})\s*>\s*\(\s*\)\s*{as_service}"),
            PatternKind::TwoTypes,
        ),
        (
            "register-type-as-self",
            format!(
                r"\.RegisterType\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*\)\s*\.(?:AsSelf|AsImplementedInterfaces)\s*\(\s*\)"
            ),
            PatternKind::OneType,
        ),
        (
            "register-lambda-as",
            format!(r"\.Register\s*\(\s*{LAMBDA_PARAMS}[^;]*?{as_service}"),
            PatternKind::FactoryLambda,
        ),
    ]
}

fn registration_patterns(lifetime: Lifetime) -> Vec<RegistrationPattern> {
    let tail = lifetime_tail(lifetime);
    let mut patterns: Vec<RegistrationPattern> = binding_heads()
        .into_iter()
        .map(|(name, head, kind)| RegistrationPattern::new(name, &format!("{head}{tail}"), kind))
        .collect();

    if lifetime == Lifetime::Singleton {
        let s = groups::SERVICE;
        let i = groups::IMPLEMENTATION;
        patterns.push(RegistrationPattern::new(
            "register-instance-as",
            &format!(
                r"\.RegisterInstance\s*\(\s*new\s+(?P<{i}>{TYPE})\s*[({{][^;]*?\.As\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*\)"
            ),
            PatternKind::TwoTypes,
        ));
    }

    patterns
}

fn injection_patterns() -> Vec<InjectionPattern> {
    let s = groups::SERVICE;

    vec![
        InjectionPattern::new(
            "resolve",
            &format!(r"\.Resolve\s*<\s*(?P<{s}>{TYPE})\s*>\s*\("),
            InjectionShape::method(MemberSource::Label("Resolve")),
        ),
        InjectionPattern::new(
            "resolve-optional",
            &format!(r"\.ResolveOptional\s*<\s*(?P<{s}>{TYPE})\s*>\s*\("),
            InjectionShape::method(MemberSource::Label("ResolveOptional")),
        ),
    ]
}
