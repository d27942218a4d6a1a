//! Command-line behavior of the `dimap` binary.

use assert_cmd::Command;
use indoc::indoc;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn dimap() -> Command {
    let mut cmd = Command::cargo_bin("dimap").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

fn sample_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("Program.cs"),
        indoc! {"
            var builder = WebApplication.CreateBuilder(args);
            builder.Services.AddSingleton<IClock, Clock>();
            builder.Services.AddScoped<IOrders, Orders>();
        "},
    )
    .unwrap();
    fs::write(
        dir.path().join("OrdersController.cs"),
        indoc! {"
            public class OrdersController
            {
                public OrdersController(IOrders orders, IClock clock) { }
            }
        "},
    )
    .unwrap();
    dir
}

#[test]
fn test_analyze_prints_json_model() {
    let project = sample_project();
    let output = dimap()
        .args(["analyze", "-f", "json"])
        .arg(project.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["parseStatus"], "success");
    let lifetimes: Vec<_> = json["serviceGroups"]
        .as_array()
        .unwrap()
        .iter()
        .map(|g| g["lifetime"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(lifetimes, vec!["Scoped", "Singleton"]);
    assert_eq!(json["cycles"].as_array().unwrap().len(), 0);
}

#[test]
fn test_analyze_terminal_report_to_file() {
    let project = sample_project();
    let out = project.path().join("report.txt");
    dimap()
        .arg("analyze")
        .arg(project.path())
        .arg("--output")
        .arg(&out)
        .assert()
        .success();

    let report = fs::read_to_string(out).unwrap();
    assert!(report.contains("SUMMARY"));
    assert!(report.contains("IOrders"));
    assert!(!report.contains("\u{1b}["));
}

#[test]
fn test_failed_analysis_still_exits_zero() {
    let dir = TempDir::new().unwrap();
    let output = dimap()
        .args(["analyze", "-f", "json"])
        .arg(dir.path())
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["parseStatus"], "failed");
    assert!(json["errorDetails"][0]
        .as_str()
        .unwrap()
        .contains("No source files"));
}

#[test]
fn test_missing_path_is_fatal() {
    let dir = TempDir::new().unwrap();
    dimap()
        .arg("analyze")
        .arg(dir.path().join("missing"))
        .assert()
        .failure();
}

#[test]
fn test_exclude_flag_skips_matching_files() {
    let project = sample_project();
    fs::create_dir_all(project.path().join("Legacy")).unwrap();
    fs::write(
        project.path().join("Legacy/Old.cs"),
        "services.AddTransient<IOld, Old>();",
    )
    .unwrap();

    let output = dimap()
        .args(["analyze", "-f", "json", "--exclude", "**/Legacy/**"])
        .arg(project.path())
        .output()
        .unwrap();

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("IClock"));
    assert!(!text.contains("IOld"));
}

#[test]
fn test_import_writes_array_for_several_projects() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    fs::write(
        &input,
        r#"{"Projects":[{"ProjectName":"A","ServiceRegistrations":[{"ServiceType":"IA","ImplementationType":"A","Lifetime":1}]},{"ProjectName":"B"}]}"#,
    )
    .unwrap();

    let output = dimap()
        .args(["import", "-f", "json"])
        .arg(&input)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json.as_array().unwrap().len(), 2);
    assert_eq!(json[0]["serviceGroups"][0]["lifetime"], "Scoped");
}

#[test]
fn test_import_rejects_malformed_json() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("result.json");
    fs::write(&input, "not json").unwrap();
    dimap().arg("import").arg(&input).assert().failure();
}

#[test]
fn test_init_creates_config_once() {
    let dir = TempDir::new().unwrap();
    dimap().current_dir(dir.path()).arg("init").assert().success();
    assert!(dir.path().join(".dimap.toml").exists());

    dimap().current_dir(dir.path()).arg("init").assert().failure();
    dimap()
        .current_dir(dir.path())
        .args(["init", "--force"])
        .assert()
        .success();
}

#[test]
fn test_config_file_selects_output_format() {
    let project = sample_project();
    let config = project.path().join("custom.toml");
    fs::write(&config, "[output]\nformat = \"json\"\n").unwrap();

    let output = dimap()
        .arg("analyze")
        .arg(project.path())
        .arg("--config")
        .arg(&config)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(json["projectName"].is_string());
}
