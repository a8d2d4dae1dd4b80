use std::fs;
use std::process::{Command, Output};

use tempfile::TempDir;

fn juliaview(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_juliaview"))
        .env_remove("JULIAVIEW_CONFIG")
        .env("RUST_LOG", "warn")
        .args(args)
        .output()
        .expect("failed to run juliaview")
}

fn parse_printed(output: &Output) -> toml::Table {
    let stdout = String::from_utf8(output.stdout.clone()).expect("stdout is utf-8");
    stdout.parse::<toml::Table>().expect("printed config is valid TOML")
}

#[test]
fn print_config_reports_defaults() {
    let output = juliaview(&["--print-config"]);
    assert!(output.status.success(), "{output:?}");

    let printed = parse_printed(&output);
    assert_eq!(printed["window"]["width"].as_integer(), Some(800));
    assert_eq!(printed["window"]["height"].as_integer(), Some(600));
    assert_eq!(
        printed["window"]["title"].as_str(),
        Some("Julia Set Renderer")
    );
    assert_eq!(printed["view"]["time_offset"].as_float(), Some(50.0));
    assert_eq!(printed["view"]["zoom"].as_float(), Some(1.0));
    assert_eq!(printed["view"]["paused"].as_bool(), Some(false));
    assert_eq!(printed["gpu_power"].as_str(), Some("high"));
    assert!(printed.get("still_time").is_none());
    assert!(printed["shaders"]["fragment"]
        .as_str()
        .is_some_and(|path| path.ends_with("julia.frag")));
}

#[test]
fn print_config_layers_file_and_flags() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("julia.toml");
    fs::write(
        &path,
        "still_time = 4.0\n\n[window]\nwidth = 1280\nheight = 720\n\n[view]\nzoom = 0.25\n",
    )
    .unwrap();

    let output = juliaview(&[
        "--config",
        path.to_str().unwrap(),
        "--size",
        "320x200",
        "--paused",
        "--print-config",
    ]);
    assert!(output.status.success(), "{output:?}");

    let printed = parse_printed(&output);
    assert_eq!(printed["window"]["width"].as_integer(), Some(320));
    assert_eq!(printed["window"]["height"].as_integer(), Some(200));
    assert_eq!(printed["view"]["zoom"].as_float(), Some(0.25));
    assert_eq!(printed["view"]["paused"].as_bool(), Some(true));
    assert_eq!(printed["still_time"].as_float(), Some(4.0));
}

#[test]
fn invalid_settings_file_fails_with_its_name() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad-settings.toml");
    fs::write(&path, "[view]\nspin = true\n").unwrap();

    let output = juliaview(&["--config", path.to_str().unwrap(), "--print-config"]);
    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("bad-settings.toml"), "{stderr}");
}

#[test]
fn degenerate_view_values_are_rejected() {
    assert!(!juliaview(&["--zoom", "inf", "--print-config"]).status.success());
    assert!(!juliaview(&["--time-offset", "NaN", "--print-config"]).status.success());

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("zero-width.toml");
    fs::write(&path, "[window]\nwidth = 0\n").unwrap();
    let output = juliaview(&["--config", path.to_str().unwrap(), "--print-config"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("zero-width.toml"), "{stderr}");
}

#[test]
fn malformed_flags_are_rejected() {
    assert!(!juliaview(&["--size", "0x600", "--print-config"]).status.success());
    assert!(!juliaview(&["--gpu-power", "turbo", "--print-config"]).status.success());
    assert!(!juliaview(&["--offset", "1;2", "--print-config"]).status.success());
}

#[test]
fn help_lists_key_bindings() {
    let output = juliaview(&["--help"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--print-config"));
    assert!(stdout.contains("space pauses"));
}
