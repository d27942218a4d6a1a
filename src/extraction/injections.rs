//! Injection-site extractor.

use super::class_context::enclosing_class;
use super::types::{is_service_candidate, normalize_type, parse_parameters};
use super::LineIndex;
use crate::core::{InjectionKind, InjectionSite};
use crate::patterns::{
    groups, ClassSource, InjectionPattern, MemberSource, PatternSet, TypeSource,
};
use regex::Captures;
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// A site before the file path is attached.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawSite {
    line_number: usize,
    class_name: String,
    member_name: String,
    kind: InjectionKind,
    service_type: String,
}

fn sites_from_match(
    pattern: &InjectionPattern,
    caps: &Captures<'_>,
    lines: &[&str],
    index: &LineIndex,
    ignored_types: &[String],
) -> Option<Vec<RawSite>> {
    let shape = pattern.shape;
    let whole = caps.get(0)?;
    let line_number = index.line_number(whole.start());

    let class_name = match shape.class {
        ClassSource::Captured => caps.name(groups::CLASS)?.as_str().to_string(),
        ClassSource::BackwardScan => enclosing_class(lines, line_number),
    };

    let member_name = match shape.member {
        MemberSource::Constructor => "constructor".to_string(),
        MemberSource::Captured => caps.name(groups::MEMBER)?.as_str().to_string(),
        MemberSource::Label(label) => label.to_string(),
    };

    let service_types: Vec<String> = match shape.types {
        TypeSource::Captured => vec![normalize_type(caps.name(groups::SERVICE)?.as_str())],
        TypeSource::Parameters => parse_parameters(caps.name(groups::PARAMS)?.as_str())
            .into_iter()
            .map(|p| p.type_name)
            .collect(),
    };

    Some(
        service_types
            .into_iter()
            .filter(|t| is_service_candidate(t, ignored_types))
            .map(|service_type| RawSite {
                line_number,
                class_name: class_name.clone(),
                member_name: member_name.clone(),
                kind: shape.kind,
                service_type,
            })
            .collect(),
    )
}

/// Drop readonly-field sites that only back a constructor parameter of the
/// same class.
fn drop_constructor_backed_fields(sites: Vec<RawSite>) -> Vec<RawSite> {
    let constructor_injected: HashSet<(String, String)> = sites
        .iter()
        .filter(|s| s.kind == InjectionKind::Constructor)
        .map(|s| (s.class_name.clone(), s.service_type.clone()))
        .collect();

    sites
        .into_iter()
        .filter(|s| {
            !(s.kind == InjectionKind::Field
                && s.member_name == "field"
                && constructor_injected.contains(&(s.class_name.clone(), s.service_type.clone())))
        })
        .collect()
}

pub(super) fn extract_with_index(
    file_path: &Path,
    text: &str,
    index: &LineIndex,
    patterns: &PatternSet,
    ignored_types: &[String],
) -> Vec<InjectionSite> {
    let lines: Vec<&str> = text.lines().collect();
    let mut raw = Vec::new();

    for pattern in patterns.injection_patterns() {
        for caps in pattern.regex.captures_iter(text) {
            match sites_from_match(pattern, &caps, &lines, index, ignored_types) {
                Some(sites) => raw.extend(sites),
                None => debug!(
                    pattern = pattern.name,
                    file = %file_path.display(),
                    "discarding uninterpretable injection match"
                ),
            }
        }
    }

    drop_constructor_backed_fields(raw)
        .into_iter()
        .map(|site| InjectionSite {
            file_path: file_path.to_path_buf(),
            line_number: site.line_number,
            class_name: site.class_name,
            member_name: site.member_name,
            kind: site.kind,
            service_type: site.service_type,
            linked_registration_ids: Vec::new(),
        })
        .collect()
}

/// Extract every injection site in `text`, in pattern order then text order.
pub fn extract_injection_sites(
    file_path: &Path,
    text: &str,
    patterns: &PatternSet,
    ignored_types: &[String],
) -> Vec<InjectionSite> {
    extract_with_index(file_path, text, &LineIndex::new(text), patterns, ignored_types)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::UNKNOWN_CLASS;
    use crate::patterns::Vendor;
    use indoc::indoc;
    use pretty_assertions::assert_eq;

    fn extract(text: &str) -> Vec<InjectionSite> {
        extract_injection_sites(Path::new("Svc.cs"), text, &PatternSet::default(), &[])
    }

    fn summary(sites: &[InjectionSite]) -> Vec<(String, String, InjectionKind, String)> {
        sites
            .iter()
            .map(|s| {
                (
                    s.class_name.clone(),
                    s.member_name.clone(),
                    s.kind,
                    s.service_type.clone(),
                )
            })
            .collect()
    }

    #[test]
    fn test_constructor_injection() {
        let text = indoc! {"
            public class OrderService
            {
                private readonly IUserService _users;
                private readonly ILogger<OrderService> _logger;

                public OrderService(IUserService userService, ILogger<OrderService> logger, string name)
                {
                    _users = userService;
                }
            }
        "};
        let sites = extract(text);
        assert_eq!(
            summary(&sites),
            vec![
                (
                    "OrderService".into(),
                    "constructor".into(),
                    InjectionKind::Constructor,
                    "IUserService".into()
                ),
                (
                    "OrderService".into(),
                    "constructor".into(),
                    InjectionKind::Constructor,
                    "ILogger<OrderService>".into()
                ),
            ]
        );
        assert!(sites.iter().all(|s| s.line_number == 6));
    }

    #[test]
    fn test_field_without_constructor_is_kept() {
        let text = indoc! {"
            public class Cache
            {
                private static readonly IClock _clock;
            }
        "};
        assert_eq!(
            summary(&extract(text)),
            vec![(
                "Cache".into(),
                "field".into(),
                InjectionKind::Field,
                "IClock".into()
            )]
        );
    }

    #[test]
    fn test_expression_bodied_constructor_backs_its_field() {
        let text = indoc! {"
            public class Svc
            {
                private readonly IClock _c;

                public Svc(IClock clock) => _c = clock;
            }
        "};
        assert_eq!(
            summary(&extract(text)),
            vec![(
                "Svc".into(),
                "constructor".into(),
                InjectionKind::Constructor,
                "IClock".into()
            )]
        );
    }

    #[test]
    fn test_primary_constructor() {
        let sites = extract("public class Worker(IQueue queue, int retries) : BackgroundService { }");
        assert_eq!(
            summary(&sites),
            vec![(
                "Worker".into(),
                "constructor".into(),
                InjectionKind::Constructor,
                "IQueue".into()
            )]
        );
    }

    #[test]
    fn test_method_and_locator_sites() {
        let text = indoc! {"
            public class OrdersController : ControllerBase
            {
                public IActionResult Get([FromServices] IOrderQuery query) => Ok();

                void Warm(IServiceProvider sp)
                {
                    var clock = sp.GetRequiredService<IClock>();
                    var cache = sp.GetService(typeof(ICache));
                }
            }
        "};
        assert_eq!(
            summary(&extract(text)),
            vec![
                (
                    "OrdersController".into(),
                    "Get".into(),
                    InjectionKind::Method,
                    "IOrderQuery".into()
                ),
                (
                    "OrdersController".into(),
                    "GetRequiredService".into(),
                    InjectionKind::Method,
                    "IClock".into()
                ),
                (
                    "OrdersController".into(),
                    "GetService".into(),
                    InjectionKind::Method,
                    "ICache".into()
                ),
            ]
        );
    }

    #[test]
    fn test_top_level_locator_uses_unknown_class() {
        let sites = extract("var clock = app.Services.GetRequiredService<IClock>();");
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].class_name, UNKNOWN_CLASS);
    }

    #[test]
    fn test_inject_property() {
        let text = "public partial class Counter\n{\n    [Inject] public IJSRuntime Js { get; set; }\n}";
        assert_eq!(
            summary(&extract(text)),
            vec![(
                "Counter".into(),
                "Js".into(),
                InjectionKind::Field,
                "IJSRuntime".into()
            )]
        );
    }

    #[test]
    fn test_autofac_resolve() {
        let text = "class Boot\n{\n  void Run() { var r = container.Resolve<IRepo>(); }\n}";
        let sites = extract_injection_sites(
            Path::new("Boot.cs"),
            text,
            &PatternSet::new(&[Vendor::Autofac]),
            &[],
        );
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].member_name, "Resolve");
        assert_eq!(sites[0].class_name, "Boot");
    }

    #[test]
    fn test_ignored_types_are_skipped() {
        let text = "public class A\n{\n    public A(IOptions<Settings> o, IClock c) { }\n}";
        let sites = extract_injection_sites(
            Path::new("A.cs"),
            text,
            &PatternSet::default(),
            &["IOptions<Settings>".to_string()],
        );
        assert_eq!(sites.len(), 1);
        assert_eq!(sites[0].service_type, "IClock");
    }
}
