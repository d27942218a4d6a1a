//! End-to-end behavior of the text-pattern engine over on-disk and
//! in-memory projects.

use dimap::builders::{analyze_project, AnalysisOptions, ProjectAnalyzer};
use dimap::core::{ConflictKind, InjectionKind, Lifetime, ParseStatus, ProjectDI};
use dimap::io::FileWalker;
use dimap::testkit::MemoryFileSystem;
use indoc::indoc;
use pretty_assertions::assert_eq;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn analyze_dir(root: &Path) -> ProjectDI {
    let files = FileWalker::new(root.to_path_buf())
        .with_extensions(vec!["cs".to_string()])
        .walk()
        .unwrap();
    analyze_project(root, &files).unwrap()
}

fn analyze_memory(fs: MemoryFileSystem) -> ProjectDI {
    let files = fs.paths();
    ProjectAnalyzer::with_file_system(fs, AnalysisOptions::default())
        .analyze(Path::new("/repo"), "repo", &files)
        .unwrap()
}

#[test]
fn test_clock_controller_project() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Program.cs"),
        "services.AddSingleton<IClock, Clock>();\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("Controller.cs"),
        indoc! {"
            public class Controller
            {
                public Controller(IClock clock) { }
            }
        "},
    )
    .unwrap();

    let project = analyze_dir(dir.path());

    assert_eq!(project.parse_status, ParseStatus::Success);
    assert_eq!(project.error_details, None);
    assert_eq!(project.service_groups.len(), 1);
    let group = &project.service_groups[0];
    assert_eq!(group.lifetime, Lifetime::Singleton);
    assert_eq!(group.services.len(), 1);

    let service = &group.services[0];
    assert_eq!(service.name, "IClock");
    assert_eq!(service.registrations.len(), 1);
    assert_eq!(service.injection_sites.len(), 1);
    assert_eq!(
        service.injection_sites[0].linked_registration_ids,
        vec![service.registrations[0].id.clone()]
    );
    assert!(service.conflicts.is_empty());
    assert!(!service.has_conflicts);
    assert!(project.cycles.is_empty());

    let json = serde_json::to_value(&project).unwrap();
    assert_eq!(json["parseStatus"], "success");
    assert_eq!(json["serviceGroups"][0]["count"], 1);
}

#[test]
fn test_builder_services_registration() {
    let project = analyze_memory(MemoryFileSystem::new().with_file(
        "/repo/Program.cs",
        "builder.Services.AddScoped<IUserService, UserService>();",
    ));

    let registrations: Vec<_> = project
        .services()
        .into_iter()
        .flat_map(|s| s.registrations.iter())
        .collect();
    assert_eq!(registrations.len(), 1);
    assert_eq!(registrations[0].service_type, "IUserService");
    assert_eq!(registrations[0].implementation_type, "UserService");
    assert_eq!(registrations[0].lifetime, Lifetime::Scoped);
}

#[test]
fn test_constructor_site_links_to_registration() {
    let project = analyze_memory(
        MemoryFileSystem::new()
            .with_file(
                "/repo/Program.cs",
                "builder.Services.AddScoped<IUserService, UserService>();",
            )
            .with_file(
                "/repo/OrderService.cs",
                indoc! {"
                    public class OrderService
                    {
                        public OrderService(IUserService userService) { }
                    }
                "},
            ),
    );

    let service = project.find_service("IUserService").unwrap();
    let site = &service.injection_sites[0];
    assert_eq!(site.class_name, "OrderService");
    assert_eq!(site.kind, InjectionKind::Constructor);
    assert_eq!(site.service_type, "IUserService");
    assert!(!site.linked_registration_ids.is_empty());
}

#[test]
fn test_mixed_lifetimes_flag_the_service() {
    let project = analyze_memory(MemoryFileSystem::new().with_file(
        "/repo/Program.cs",
        indoc! {"
            services.AddSingleton<ICache, MemoryCache>();
            services.AddScoped<ICache, MemoryCache>();
        "},
    ));

    let service = project.find_service("ICache").unwrap();
    assert!(service.has_conflicts);
    assert!(service.has_conflict(ConflictKind::MixedLifetimes));

    // the service appears in both lifetime groups
    let lifetimes: Vec<_> = project
        .service_groups
        .iter()
        .filter(|g| g.services.iter().any(|s| s.name == "ICache"))
        .map(|g| g.lifetime)
        .collect();
    assert_eq!(lifetimes, vec![Lifetime::Scoped, Lifetime::Singleton]);
}

#[test]
fn test_mutual_injection_is_a_cycle() {
    let project = analyze_memory(
        MemoryFileSystem::new()
            .with_file(
                "/repo/Program.cs",
                indoc! {"
                    services.AddScoped<A>();
                    services.AddScoped<B>();
                "},
            )
            .with_file(
                "/repo/A.cs",
                indoc! {"
                    public class A
                    {
                        public A(B b) { }
                    }
                "},
            )
            .with_file(
                "/repo/B.cs",
                indoc! {"
                    public class B
                    {
                        public B(A a) { }
                    }
                "},
            ),
    );

    assert_eq!(project.cycles.len(), 1);
    assert!(project.cycles[0].contains('A'));
    assert!(project.cycles[0].contains('B'));
}

#[test]
fn test_acyclic_project_has_no_cycles() {
    let project = analyze_memory(
        MemoryFileSystem::new()
            .with_file("/repo/Program.cs", "services.AddScoped<IRepo, Repo>();")
            .with_file(
                "/repo/Api.cs",
                indoc! {"
                    public class Api
                    {
                        public Api(IRepo repo) { }
                    }
                "},
            ),
    );
    assert!(project.cycles.is_empty());
    assert_eq!(
        project.dependency_graph.dependencies("Api").to_vec(),
        vec!["IRepo".to_string()]
    );
}

#[test]
fn test_groups_only_hold_matching_lifetimes() {
    let project = analyze_memory(MemoryFileSystem::new().with_file(
        "/repo/Program.cs",
        indoc! {"
            services.AddSingleton<IClock, Clock>();
            services.AddScoped<IRepo, Repo>();
            services.AddTransient<IMailer, Mailer>();
            services.AddScoped<IClock, Clock>();
        "},
    ));

    let mut seen = HashSet::new();
    for group in &project.service_groups {
        assert!(seen.insert(group.lifetime), "duplicate group {:?}", group.lifetime);
        assert!(!group.services.is_empty());
        assert_eq!(group.count, group.services.len());
        for service in &group.services {
            assert!(service
                .registrations
                .iter()
                .any(|r| r.lifetime == group.lifetime));
        }
    }
    assert_eq!(seen.len(), 3);
}

#[test]
fn test_rerun_is_idempotent() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("src")).unwrap();
    fs::write(
        dir.path().join("src/Startup.cs"),
        indoc! {"
            services.AddSingleton<IClock, Clock>();
            services.AddScoped<IRepo, Repo>();
            services.AddScoped<IRepo, SqlRepo>();
        "},
    )
    .unwrap();
    fs::write(
        dir.path().join("src/Home.cs"),
        indoc! {"
            public class Home
            {
                public Home(IRepo repo, IClock clock, IMissing missing) { }
            }
        "},
    )
    .unwrap();

    let first = analyze_dir(dir.path());
    let second = analyze_dir(dir.path());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_unregistered_injection_is_reported() {
    let project = analyze_memory(
        MemoryFileSystem::new()
            .with_file("/repo/Program.cs", "services.AddSingleton<IClock, Clock>();")
            .with_file(
                "/repo/Home.cs",
                indoc! {"
                    public class Home
                    {
                        public Home(IClock clock, IMissing missing) { }
                    }
                "},
            ),
    );

    assert_eq!(project.parse_status, ParseStatus::Success);
    assert_eq!(project.unregistered_services.len(), 1);
    let missing = &project.unregistered_services[0];
    assert_eq!(missing.name, "IMissing");
    assert!(missing.has_conflict(ConflictKind::UnregisteredInjection));
    assert!(project
        .service_groups
        .iter()
        .all(|g| g.services.iter().all(|s| s.name != "IMissing")));
}

#[test]
fn test_excluded_directories_are_not_analyzed() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("obj")).unwrap();
    fs::write(
        dir.path().join("Program.cs"),
        "services.AddSingleton<IClock, Clock>();",
    )
    .unwrap();
    fs::write(
        dir.path().join("obj/Generated.cs"),
        "services.AddScoped<IGenerated, Generated>();",
    )
    .unwrap();

    let files = FileWalker::new(dir.path().to_path_buf())
        .with_extensions(vec!["cs".to_string()])
        .with_exclude_patterns(&["**/obj/**".to_string()])
        .unwrap()
        .walk()
        .unwrap();
    let project = analyze_project(dir.path(), &files).unwrap();

    assert!(project.find_service("IClock").is_some());
    assert!(project.find_service("IGenerated").is_none());
}
