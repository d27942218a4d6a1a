//! Microsoft.Extensions.DependencyInjection catalog.
//!
//! Covers `Add{Lifetime}` with its `TryAdd` and `AddKeyed` forms,
//! `ServiceDescriptor` factories, `typeof` overloads and the well-known
//! framework extension methods.

use super::{
    groups, Catalog, InjectionPattern, InjectionShape, LifetimePatterns,
    MemberSource, PatternKind, RegistrationPattern, Vendor, LAMBDA_PARAMS, TYPE,
};
use crate::core::Lifetime;
use once_cell::sync::Lazy;

/// Well-known extension methods registered without generic arguments:
/// `(method, lifetime, implementation label)`.
pub const WELL_KNOWN_EXTENSIONS: &[(&str, Lifetime, &str)] = &[
    ("AddHttpClient", Lifetime::Transient, "HttpClient"),
    ("AddMemoryCache", Lifetime::Singleton, "MemoryCache"),
    ("AddDistributedMemoryCache", Lifetime::Singleton, "MemoryDistributedCache"),
    ("AddLogging", Lifetime::Singleton, "LoggerFactory"),
    ("AddOptions", Lifetime::Singleton, "OptionsManager"),
    ("AddDataProtection", Lifetime::Singleton, "DataProtectionProvider"),
    ("AddResponseCaching", Lifetime::Singleton, "ResponseCache"),
    ("AddControllers", Lifetime::Others, "MVC Controllers"),
    ("AddControllersWithViews", Lifetime::Others, "MVC Controllers with Views"),
    ("AddMvc", Lifetime::Others, "MVC"),
    ("AddRazorPages", Lifetime::Others, "Razor Pages"),
    ("AddSignalR", Lifetime::Others, "SignalR"),
    ("AddAuthentication", Lifetime::Others, "Authentication"),
    ("AddAuthorization", Lifetime::Others, "Authorization"),
    ("AddCors", Lifetime::Others, "CORS"),
    ("AddHealthChecks", Lifetime::Others, "Health Checks"),
    ("AddSwaggerGen", Lifetime::Others, "Swagger"),
    ("AddEndpointsApiExplorer", Lifetime::Others, "API Explorer"),
    ("AddGrpc", Lifetime::Others, "gRPC"),
];

/// Generic framework extensions: `(method, lifetime)`. Each gets a two-type
/// and a one-type pattern.
pub const GENERIC_EXTENSIONS: &[(&str, Lifetime)] = &[
    ("AddHttpClient", Lifetime::Transient),
    ("AddDbContext", Lifetime::Scoped),
    ("AddDbContextPool", Lifetime::Scoped),
    ("AddDbContextFactory", Lifetime::Singleton),
    ("AddPooledDbContextFactory", Lifetime::Singleton),
    ("AddHostedService", Lifetime::Singleton),
];

pub static CATALOG: Lazy<Catalog> = Lazy::new(|| Catalog {
    vendor: Vendor::Microsoft,
    registrations: Lifetime::ALL
        .iter()
        .map(|&lifetime| LifetimePatterns {
            lifetime,
            patterns: registration_patterns(lifetime),
        })
        .collect(),
    injections: injection_patterns(),
});

fn registration_patterns(lifetime: Lifetime) -> Vec<RegistrationPattern> {
    let mut patterns = Vec::new();

    if lifetime != Lifetime::Others {
        patterns.extend(lifetime_method_patterns(lifetime.name()));
    }

    for &(method, _) in GENERIC_EXTENSIONS
        .iter()
        .filter(|(_, l)| *l == lifetime)
    {
        patterns.push(RegistrationPattern::new(
            "generic-extension-two-types",
            &format!(
                r"\.(?P<{m}>{method})\s*<\s*(?P<{s}>{TYPE})\s*,\s*(?P<{i}>{TYPE})\s*>\s*\(",
                m = groups::METHOD,
                s = groups::SERVICE,
                i = groups::IMPLEMENTATION,
            ),
            PatternKind::TwoTypes,
        ));
        patterns.push(RegistrationPattern::new(
            "generic-extension-one-type",
            &format!(
                r"\.(?P<{m}>{method})\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(",
                m = groups::METHOD,
                s = groups::SERVICE,
            ),
            PatternKind::OneType,
        ));
    }

    for &(method, _, label) in WELL_KNOWN_EXTENSIONS
        .iter()
        .filter(|(_, l, _)| *l == lifetime)
    {
        patterns.push(RegistrationPattern::new(
            "well-known-extension",
            &format!(r"\.(?P<{m}>{method})\s*\(", m = groups::METHOD),
            PatternKind::MethodOnly { label },
        ));
    }

    patterns
}

/// `Add{L}` family for one of the three concrete lifetimes.
fn lifetime_method_patterns(l: &str) -> Vec<RegistrationPattern> {
    let s = groups::SERVICE;
    let i = groups::IMPLEMENTATION;
    let a = groups::ARGUMENT;
    let add = format!(r"\.(?:TryAdd|Add)(?:Keyed)?{l}");
    let key = r#"(?:"[^"]*"\s*,\s*|[\w.]+\s*,\s*)?"#;
    let bare_key = r#"(?:"[^"]*"\s*)?"#;

    vec![
        RegistrationPattern::new(
            "generic-two-types",
            &format!(r"{add}\s*<\s*(?P<{s}>{TYPE})\s*,\s*(?P<{i}>{TYPE})\s*>\s*\("),
            PatternKind::TwoTypes,
        ),
        RegistrationPattern::new(
            "generic-one-type",
            &format!(r"{add}\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*{bare_key}\)"),
            PatternKind::OneType,
        ),
        RegistrationPattern::new(
            "generic-factory",
            &format!(r"{add}\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*{key}{LAMBDA_PARAMS}"),
            PatternKind::FactoryLambda,
        ),
        RegistrationPattern::new(
            "generic-instance",
            &format!(r"{add}\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*{key}new\s+(?P<{i}>{TYPE})\s*[({{]"),
            PatternKind::TwoTypes,
        ),
        RegistrationPattern::new(
            "generic-argument",
            &format!(r"{add}\s*<\s*(?P<{s}>{TYPE})\s*>\s*\(\s*{key}(?P<{a}>[A-Za-z_][\w.]*)"),
            PatternKind::OneTypeArgument,
        ),
        RegistrationPattern::new(
            "typeof-two-types",
            &format!(
                r"\.(?:TryAdd|Add){l}\s*\(\s*typeof\s*\(\s*(?P<{s}>{TYPE})\s*\)\s*,\s*typeof\s*\(\s*(?P<{i}>{TYPE})\s*\)\s*\)"
            ),
            PatternKind::TwoTypes,
        ),
        RegistrationPattern::new(
            "typeof-one-type",
            &format!(r"\.(?:TryAdd|Add){l}\s*\(\s*typeof\s*\(\s*(?P<{s}>{TYPE})\s*\)\s*\)"),
            PatternKind::OneType,
        ),
        RegistrationPattern::new(
            "typeof-factory",
            &format!(
                r"\.(?:TryAdd|Add){l}\s*\(\s*typeof\s*\(\s*(?P<{s}>{TYPE})\s*\)\s*,\s*{LAMBDA_PARAMS}"
            ),
            PatternKind::FactoryLambda,
        ),
        RegistrationPattern::new(
            "service-descriptor",
            &format!(
                r"\bServiceDescriptor\.{l}\s*<\s*(?P<{s}>{TYPE})\s*,\s*(?P<{i}>{TYPE})\s*>\s*\("
            ),
            PatternKind::TwoTypes,
        ),
    ]
}

fn injection_patterns() -> Vec<InjectionPattern> {
    let s = groups::SERVICE;
    let m = groups::MEMBER;

    vec![
        InjectionPattern::new(
            "from-services-parameter",
            &format!(
                r"(?P<{m}>[A-Z]\w*)\s*(?:<[^<>()]*>)?\s*\([^()]*?\[FromServices\]\s*(?P<{s}>{TYPE})\s+\w+"
            ),
            InjectionShape::method(MemberSource::Captured),
        ),
        InjectionPattern::new(
            "get-required-service",
            &format!(r"\.GetRequiredService\s*<\s*(?P<{s}>{TYPE})\s*>\s*\("),
            InjectionShape::method(MemberSource::Label("GetRequiredService")),
        ),
        InjectionPattern::new(
            "get-required-service-typeof",
            &format!(r"\.GetRequiredService\s*\(\s*typeof\s*\(\s*(?P<{s}>{TYPE})\s*\)\s*\)"),
            InjectionShape::method(MemberSource::Label("GetRequiredService")),
        ),
        InjectionPattern::new(
            "get-service",
            &format!(r"\.GetService\s*<\s*(?P<{s}>{TYPE})\s*>\s*\("),
            InjectionShape::method(MemberSource::Label("GetService")),
        ),
        InjectionPattern::new(
            "get-service-typeof",
            &format!(r"\.GetService\s*\(\s*typeof\s*\(\s*(?P<{s}>{TYPE})\s*\)\s*\)"),
            InjectionShape::method(MemberSource::Label("GetService")),
        ),
        InjectionPattern::new(
            "activator-factory",
            &format!(
                r"\bActivatorUtilities\.(?:CreateInstance|GetServiceOrCreateInstance)\s*<\s*(?P<{s}>{TYPE})\s*>\s*\("
            ),
            InjectionShape::method(MemberSource::Label("factory")),
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(lifetime: Lifetime, text: &str) -> Vec<&'static str> {
        CATALOG
            .registration_patterns(lifetime)
            .iter()
            .filter(|p| p.regex.is_match(text))
            .map(|p| p.name)
            .collect()
    }

    #[test]
    fn test_two_type_call_matches_exactly_one_pattern() {
        let text = "builder.Services.AddScoped<IUserService, UserService>();";
        assert_eq!(matching(Lifetime::Scoped, text), vec!["generic-two-types"]);
        assert!(matching(Lifetime::Singleton, text).is_empty());
        assert!(matching(Lifetime::Transient, text).is_empty());
    }

    #[test]
    fn test_factory_and_instance_forms_are_disjoint() {
        // generic-argument also matches textually; the extractor rejects
        // lambda and `new` arguments for it.
        let factory = "services.AddSingleton<IClock>(sp => new SystemClock());";
        assert_eq!(
            matching(Lifetime::Singleton, factory),
            vec!["generic-factory", "generic-argument"]
        );

        let instance = "services.AddSingleton<IClock>(new SystemClock());";
        assert_eq!(
            matching(Lifetime::Singleton, instance),
            vec!["generic-instance", "generic-argument"]
        );
    }

    #[test]
    fn test_existing_value_arguments() {
        for text in [
            "services.AddSingleton<IConfiguration>(configuration);",
            "services.AddSingleton<IClock>(SystemClock.Instance);",
            "services.AddKeyedSingleton<IFoo>(Keys.Primary);",
        ] {
            assert_eq!(matching(Lifetime::Singleton, text), vec!["generic-argument"], "{text}");
        }
        assert!(matching(Lifetime::Singleton, "services.AddSingleton<IFoo>();")
            .iter()
            .all(|name| *name != "generic-argument"));
    }

    #[test]
    fn test_try_add_and_keyed_variants() {
        assert_eq!(
            matching(Lifetime::Transient, "services.TryAddTransient<IFoo, Foo>();"),
            vec!["generic-two-types"]
        );
        assert_eq!(
            matching(Lifetime::Scoped, r#"services.AddKeyedScoped<IFoo>("primary");"#),
            vec!["generic-one-type"]
        );
    }

    #[test]
    fn test_typeof_forms() {
        let text = "services.AddScoped(typeof(IRepository<>), typeof(Repository<>));";
        assert_eq!(matching(Lifetime::Scoped, text), vec!["typeof-two-types"]);
        let text = "services.AddScoped(typeof(Repository));";
        assert_eq!(matching(Lifetime::Scoped, text), vec!["typeof-one-type"]);
    }

    #[test]
    fn test_well_known_extensions_keep_generic_forms_apart() {
        assert_eq!(
            matching(Lifetime::Transient, "services.AddHttpClient();"),
            vec!["well-known-extension"]
        );
        assert_eq!(
            matching(Lifetime::Transient, "services.AddHttpClient<IGitHub, GitHub>(c => {});"),
            vec!["generic-extension-two-types"]
        );
        assert_eq!(
            matching(Lifetime::Others, "builder.Services.AddControllersWithViews();"),
            vec!["well-known-extension"]
        );
    }

    #[test]
    fn test_injection_patterns_recognize_service_locator_calls() {
        let names: Vec<_> = CATALOG
            .injections
            .iter()
            .filter(|p| p.regex.is_match("var clock = sp.GetRequiredService<IClock>();"))
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["get-required-service"]);
    }
}
