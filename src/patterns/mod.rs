//! Declarative pattern catalogs for DI registrations and injection sites.
//!
//! Every vendor contributes a [`Catalog`]: one ordered registration list per
//! lifetime plus vendor specific injection shapes. Shapes that belong to the
//! language rather than a container (constructors, readonly fields, ...) live
//! in [`csharp`] and are applied once regardless of how many vendors are on.
//!
//! Extraction code never inspects regex arity. Each pattern carries an
//! explicit [`PatternKind`] or [`InjectionShape`] describing what its named
//! capture groups mean.

pub mod autofac;
pub mod csharp;
pub mod microsoft;

use crate::core::{InjectionKind, Lifetime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A type reference as it appears in source: dotted name, one level of
/// nested generic arguments, optional nullable marker.
pub(crate) const TYPE: &str = r"[A-Za-z_][\w.]*(?:<(?:[^<>]|<[^<>]*>)*>)?\??";

/// Lambda parameter list: `sp`, `(sp)`, `(sp, key)`, `_`.
pub(crate) const LAMBDA_PARAMS: &str = r"(?:\w+|\([^()]*\))\s*=>";

/// Named capture groups understood by the extractors.
pub mod groups {
    pub const SERVICE: &str = "service";
    pub const IMPLEMENTATION: &str = "implementation";
    pub const METHOD: &str = "method";
    pub const CLASS: &str = "class";
    pub const PARAMS: &str = "params";
    pub const MEMBER: &str = "member";
    pub const ARGUMENT: &str = "argument";
}

/// Compile a catalog pattern. Catalog patterns are constants, so a failure
/// here is a programming error caught by the catalog tests.
pub(crate) fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("invalid catalog pattern {pattern}: {e}"))
}

/// How the captures of a registration pattern map onto service and
/// implementation types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternKind {
    /// `service` and `implementation` are both captured.
    TwoTypes,
    /// Only `service` is captured; the implementation is the service itself.
    OneType,
    /// A well-known extension without generic arguments. The service is
    /// derived from the `method` capture, the implementation is `label`
    /// unless the call passes a lambda.
    MethodOnly { label: &'static str },
    /// Only `service` is captured and the instance comes from a lambda.
    FactoryLambda,
    /// Only `service` is captured and the call passes an existing value:
    /// a variable, a static member or a method group. The `argument` group
    /// holds the leading identifier; lambdas and `new` expressions are left
    /// to the factory and instance patterns.
    OneTypeArgument,
}

/// Label used for implementations produced by a factory lambda.
pub const FACTORY_IMPLEMENTATION: &str = "Factory";

#[derive(Debug)]
pub struct RegistrationPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub kind: PatternKind,
}

impl RegistrationPattern {
    pub fn new(name: &'static str, pattern: &str, kind: PatternKind) -> Self {
        Self {
            name,
            regex: compile(pattern),
            kind,
        }
    }
}

/// Where a site's class name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassSource {
    /// The `class` capture.
    Captured,
    /// Scan upward from the match line, see [`crate::extraction::class_context`].
    BackwardScan,
}

/// Where a site's member name comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberSource {
    /// Always `"constructor"`.
    Constructor,
    /// The `member` capture (method or property name).
    Captured,
    /// A fixed label such as `"GetRequiredService"`.
    Label(&'static str),
}

/// Where a site's service types come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeSource {
    /// The `service` capture.
    Captured,
    /// Each service-typed parameter of the `params` capture.
    Parameters,
}

/// Fixed interpretation of one injection pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InjectionShape {
    pub kind: InjectionKind,
    pub class: ClassSource,
    pub member: MemberSource,
    pub types: TypeSource,
}

impl InjectionShape {
    pub const fn constructor(class: ClassSource) -> Self {
        Self {
            kind: InjectionKind::Constructor,
            class,
            member: MemberSource::Constructor,
            types: TypeSource::Parameters,
        }
    }

    pub const fn method(member: MemberSource) -> Self {
        Self {
            kind: InjectionKind::Method,
            class: ClassSource::BackwardScan,
            member,
            types: TypeSource::Captured,
        }
    }

    pub const fn field(member: MemberSource) -> Self {
        Self {
            kind: InjectionKind::Field,
            class: ClassSource::BackwardScan,
            member,
            types: TypeSource::Captured,
        }
    }
}

#[derive(Debug)]
pub struct InjectionPattern {
    pub name: &'static str,
    pub regex: Regex,
    pub shape: InjectionShape,
}

impl InjectionPattern {
    pub fn new(name: &'static str, pattern: &str, shape: InjectionShape) -> Self {
        Self {
            name,
            regex: compile(pattern),
            shape,
        }
    }
}

/// DI container vendors with a pattern catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Microsoft,
    Autofac,
}

impl Vendor {
    pub const ALL: [Vendor; 2] = [Vendor::Microsoft, Vendor::Autofac];

    pub fn name(&self) -> &'static str {
        match self {
            Vendor::Microsoft => "microsoft",
            Vendor::Autofac => "autofac",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "microsoft" | "msdi" | "microsoft.extensions.dependencyinjection" => {
                Some(Vendor::Microsoft)
            }
            "autofac" => Some(Vendor::Autofac),
            _ => None,
        }
    }

    pub fn catalog(&self) -> &'static Catalog {
        match self {
            Vendor::Microsoft => &*microsoft::CATALOG,
            Vendor::Autofac => &*autofac::CATALOG,
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Registration patterns of one lifetime, in declaration order.
#[derive(Debug)]
pub struct LifetimePatterns {
    pub lifetime: Lifetime,
    pub patterns: Vec<RegistrationPattern>,
}

/// Per-vendor pattern catalog.
#[derive(Debug)]
pub struct Catalog {
    pub vendor: Vendor,
    pub registrations: Vec<LifetimePatterns>,
    pub injections: Vec<InjectionPattern>,
}

impl Catalog {
    pub fn registration_patterns(&self, lifetime: Lifetime) -> &[RegistrationPattern] {
        self.registrations
            .iter()
            .find(|lp| lp.lifetime == lifetime)
            .map(|lp| lp.patterns.as_slice())
            .unwrap_or(&[])
    }

    pub fn pattern_count(&self) -> usize {
        self.registrations
            .iter()
            .map(|lp| lp.patterns.len())
            .sum::<usize>()
            + self.injections.len()
    }
}

/// The patterns applied by one analysis run.
#[derive(Debug, Clone)]
pub struct PatternSet {
    catalogs: Vec<&'static Catalog>,
    injections: Vec<&'static InjectionPattern>,
}

impl Default for PatternSet {
    fn default() -> Self {
        Self::new(&Vendor::ALL)
    }
}

impl PatternSet {
    pub fn new(vendors: &[Vendor]) -> Self {
        let mut selected: Vec<Vendor> = Vec::new();
        for vendor in vendors {
            if !selected.contains(vendor) {
                selected.push(*vendor);
            }
        }

        let catalogs: Vec<&'static Catalog> = selected.iter().map(|v| v.catalog()).collect();
        let injections = csharp::INJECTIONS
            .iter()
            .chain(catalogs.iter().copied().flat_map(|c| c.injections.iter()))
            .collect();

        Self {
            catalogs,
            injections,
        }
    }

    pub fn vendors(&self) -> Vec<Vendor> {
        self.catalogs.iter().map(|c| c.vendor).collect()
    }

    /// Registration patterns for `lifetime`, vendor by vendor.
    pub fn registration_patterns(
        &self,
        lifetime: Lifetime,
    ) -> impl Iterator<Item = &'static RegistrationPattern> + '_ {
        self.catalogs
            .iter()
            .copied()
            .flat_map(move |c| c.registration_patterns(lifetime).iter())
    }

    pub fn injection_patterns(&self) -> &[&'static InjectionPattern] {
        &self.injections
    }
}
