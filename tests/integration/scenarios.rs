//! End-to-end flows through the Context and built-in commands.

use crate::integration::{args, failing_decorator, files_under};
use tempfile::TempDir;
use weave::command::builtin::{JoinCommand, MatchCommand, SetCommand};
use weave::context::{Context, EphemeralContext, PersistedContext};
use weave::reference::Decorator;

#[tokio::test]
async fn store_then_get_by_token() {
    let temp = TempDir::new().unwrap();
    let persisted = PersistedContext::new(temp.path(), "output", "greet").unwrap();
    let ephemeral = EphemeralContext::new(temp.path());

    for ctx in [&persisted as &dyn Context, &ephemeral as &dyn Context] {
        ctx.store("hello".to_string(), vec![Decorator::token("greeting")])
            .await
            .unwrap();
        assert_eq!(ctx.get("greeting").await.as_deref(), Some("hello"));
    }
}

#[tokio::test]
async fn set_then_join_through_reference_id() {
    let temp = TempDir::new().unwrap();
    let ctx = PersistedContext::new(temp.path(), "output", "compose").unwrap();

    let set = ctx.run(&SetCommand, &args(&["X", "tok1"])).await.unwrap();
    let ref1 = set[0].id().to_string();

    let joined = ctx
        .run(&JoinCommand, &[String::from("a"), ref1, String::from("b")])
        .await
        .unwrap();
    assert_eq!(joined[0].content(), "aXb");

    let run_dir = ctx.run_directory().unwrap();
    let written: Vec<String> = files_under(run_dir)
        .iter()
        .map(|p| std::fs::read_to_string(p).unwrap())
        .collect();
    assert!(written.contains(&"X".to_string()));
    assert!(written.contains(&"aXb".to_string()));
}

#[tokio::test]
async fn pattern_capture_yields_one_reference_per_group() {
    let ctx = EphemeralContext::default();
    let refs = ctx
        .run(
            &MatchCommand,
            &args(&[
                r"(\w+) (\w+), age (\d+)",
                "John Doe, age 30",
                "firstName",
                "lastName",
                "age",
            ]),
        )
        .await
        .unwrap();

    let contents: Vec<&str> = refs.iter().map(|r| r.content()).collect();
    assert_eq!(contents, vec!["John", "Doe", "30"]);
    assert_eq!(ctx.get("lastName").await.as_deref(), Some("Doe"));
}

#[tokio::test]
async fn failing_decorator_writes_nothing_and_keeps_index() {
    let temp = TempDir::new().unwrap();
    let ctx = PersistedContext::new(temp.path(), "output", "atomic").unwrap();

    let result = ctx
        .store(
            "x".to_string(),
            vec![Decorator::token("t"), failing_decorator()],
        )
        .await;
    assert!(result.is_err());
    assert!(files_under(&temp.path().join("output")).is_empty());
    assert!(ctx.get("t").await.is_none());

    ctx.store("kept".to_string(), vec![Decorator::token("t")])
        .await
        .unwrap();
    let before = files_under(&temp.path().join("output"));

    let result = ctx
        .store(
            "lost".to_string(),
            vec![Decorator::token("t"), failing_decorator()],
        )
        .await;
    assert!(result.is_err());
    assert_eq!(files_under(&temp.path().join("output")), before);
    assert_eq!(ctx.get("t").await.as_deref(), Some("kept"));
    assert!(ctx.warnings().is_empty());
}
