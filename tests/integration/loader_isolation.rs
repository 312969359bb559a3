//! Loader behaviour against a real project directory.

use crate::integration::args;
use std::collections::HashMap;
use std::fs;
use tempfile::TempDir;
use weave::command::{CommandLoader, CommandRouter};
use weave::config::AgentConfig;
use weave::context::{Context, EphemeralContext};
use weave::error::ApiError;

fn write(dir: &std::path::Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

#[tokio::test]
async fn one_bad_manifest_does_not_block_the_rest() {
    let temp = TempDir::new().unwrap();
    let commands = temp.path().join("commands");
    fs::create_dir_all(commands.join("nested")).unwrap();

    write(
        &commands,
        "01_name.toml",
        r#"
name = "name"
kind = "alias"
description = "Split a full name"
target = "match"
args = ['(\w+) (\w+)']
"#,
    );
    write(&commands, "02_syntax.toml", "name = \"oops\"\nkind = [");
    write(&commands, "03_kind.toml", "name = \"mystery\"\nkind = \"python\"\n");
    write(
        &commands,
        "04_agent.toml",
        "name = \"ask\"\nkind = \"process\"\nagent = \"missing\"\n",
    );
    write(
        &commands.join("nested"),
        "05_wrap.toml",
        "name = \"wrap\"\nkind = \"alias\"\ntarget = \"join\"\nargs = [\"[\"]\n",
    );

    let mut router = CommandRouter::with_builtins();
    let report = CommandLoader::new(&commands).load_into(&mut router, &HashMap::new());

    assert_eq!(report.loaded, vec!["name", "wrap"]);
    assert_eq!(report.failures.len(), 3);
    for failure in &report.failures {
        assert!(matches!(failure.error, ApiError::CommandLoad { .. }));
    }
    assert!(!router.contains("oops"));
    assert!(!router.contains("mystery"));
    assert!(!router.contains("ask"));

    let ctx = EphemeralContext::default();
    let refs = router
        .execute("name", &args(&["Ada Lovelace", "first", "last"]), &ctx)
        .await
        .unwrap();
    assert_eq!(refs.len(), 2);
    assert_eq!(ctx.get("last").await.as_deref(), Some("Lovelace"));
}

#[cfg(unix)]
#[tokio::test]
async fn process_manifest_runs_configured_agent() {
    let temp = TempDir::new().unwrap();
    write(
        temp.path(),
        "summarize.toml",
        r#"
name = "summarize"
kind = "process"
agent = "echo"
prompt = "Summarize: {{doc}}"
token = "summary"
"#,
    );
    let mut agents = HashMap::new();
    agents.insert(
        "echo".to_string(),
        AgentConfig {
            program: "sh".to_string(),
            args: vec!["-c".to_string(), "tr a-z A-Z".to_string()],
            timeout_secs: 10,
            env: HashMap::new(),
        },
    );

    let mut router = CommandRouter::with_builtins();
    let report = CommandLoader::new(temp.path()).load_into(&mut router, &agents);
    assert!(report.is_clean(), "{:?}", report.failures);

    let ctx = EphemeralContext::default();
    router
        .execute("set", &args(&["weave notes", "doc"]), &ctx)
        .await
        .unwrap();
    router.execute("summarize", &[], &ctx).await.unwrap();
    assert_eq!(
        ctx.get("summary").await.as_deref(),
        Some("SUMMARIZE: WEAVE NOTES")
    );
}
