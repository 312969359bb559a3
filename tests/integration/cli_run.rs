//! Full invocations through the CLI route table.

use crate::integration::files_under;
use clap::Parser;
use std::fs;
use tempfile::TempDir;
use weave::cli::{Cli, RunContext};
use weave::context::MANIFEST_FILE;

/// Project with an explicit config file so no global configuration leaks in.
fn project(config: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let config_path = temp.path().join("weave.toml");
    fs::write(&config_path, config).unwrap();
    (temp, config_path)
}

fn parse(temp: &TempDir, config: &std::path::Path, rest: &[&str]) -> Cli {
    let mut argv = vec![
        "weave".to_string(),
        "--project".to_string(),
        temp.path().display().to_string(),
        "--config".to_string(),
        config.display().to_string(),
    ];
    argv.extend(rest.iter().map(|s| s.to_string()));
    Cli::try_parse_from(argv).unwrap()
}

#[tokio::test]
async fn persisted_template_run_writes_run_directory() {
    let (temp, config) = project("[output]\nroot = \"runs\"\n");
    fs::write(temp.path().join("name.txt"), "Ada").unwrap();

    let ctx = RunContext::new(temp.path().to_path_buf(), Some(config.clone())).unwrap();

    let read = parse(&temp, &config, &["--task", "hello", "run", "read", "name.txt", "who"]);
    let output = ctx.execute(&read).await;
    assert_eq!(output.exit_code(), 0, "{:?}", output.error);
    assert!(output.text.contains("who = Ada"));

    let files = files_under(&temp.path().join("runs"));
    assert_eq!(files.len(), 2);
    assert!(files.iter().any(|p| p.ends_with(MANIFEST_FILE)));
    let manifest = files.iter().find(|p| p.ends_with(MANIFEST_FILE)).unwrap();
    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(manifest).unwrap()).unwrap();
    assert_eq!(json["task"], "hello");
    assert_eq!(json["references"][0]["token"], "who");
}

#[tokio::test]
async fn each_invocation_gets_its_own_context() {
    let (temp, config) = project("[output]\npersist = false\n");
    let ctx = RunContext::new(temp.path().to_path_buf(), Some(config.clone())).unwrap();

    let set = parse(&temp, &config, &["--quiet", "run", "set", "v", "tok"]);
    assert_eq!(ctx.execute(&set).await.text, "v");

    let template = parse(&temp, &config, &["--quiet", "run", "template", "{{tok}}!"]);
    let output = ctx.execute(&template).await;
    assert_eq!(output.exit_code(), 3);
    assert!(output.text.starts_with("error: Not found"));
    assert!(!temp.path().join("output").exists());
}

#[tokio::test]
async fn load_failures_surface_as_notices() {
    let (temp, config) = project("[commands]\ndir = \"cmds\"\n");
    let cmds = temp.path().join("cmds");
    fs::create_dir_all(&cmds).unwrap();
    fs::write(cmds.join("bad.toml"), "kind = \"alias\"\n").unwrap();

    let ctx = RunContext::new(temp.path().to_path_buf(), Some(config.clone())).unwrap();
    let output = ctx.execute(&parse(&temp, &config, &["list"])).await;
    assert_eq!(output.exit_code(), 0);
    assert_eq!(output.notices.len(), 1);
    assert!(output.notices[0].contains("bad.toml"));
    assert!(output.text.contains("template"));
}

#[tokio::test]
async fn verbose_run_shows_progress_and_metadata() {
    let (temp, config) = project("[output]\npersist = false\n");
    let ctx = RunContext::new(temp.path().to_path_buf(), Some(config.clone())).unwrap();

    let cli = parse(&temp, &config, &["--verbose", "run", "join", "a", "b"]);
    let output = ctx.execute(&cli).await;
    assert!(output.text.contains("» Running 'join' with 2 argument(s)"));
    assert!(output.text.contains("Status:   ok"));
    assert!(output.text.contains(".txt"));
}
