//! Behavioral properties of the Reference/Decorator/Context core.

use crate::integration::FixedCommand;
use chrono::{TimeZone, Utc};
use proptest::prelude::*;
use regex::Regex;
use tempfile::TempDir;
use weave::context::{Context, EphemeralContext, PersistedContext};
use weave::reference::Decorator;

#[tokio::test]
async fn token_collision_is_last_write_wins() {
    let temp = TempDir::new().unwrap();
    let ctx = PersistedContext::new(temp.path(), "output", "collide").unwrap();

    let first = ctx
        .store("first".to_string(), vec![Decorator::token("dup")])
        .await
        .unwrap();
    ctx.store("second".to_string(), vec![Decorator::token("dup")])
        .await
        .unwrap();

    assert_eq!(ctx.get("dup").await.as_deref(), Some("second"));
    assert_eq!(ctx.get(first.id()).await.as_deref(), Some("first"));
    assert_eq!(ctx.warnings().len(), 1);
}

#[tokio::test]
async fn decorators_compose_and_later_file_name_wins() {
    let ctx = EphemeralContext::default();
    let r = ctx
        .store(
            "v".to_string(),
            vec![Decorator::token("a"), Decorator::file_name("f.txt")],
        )
        .await
        .unwrap();
    assert_eq!(r.token(), Some("a"));
    assert_eq!(r.file_name(), Some("f.txt"));

    let r = ctx
        .store(
            "v".to_string(),
            vec![Decorator::file_name("first.txt"), Decorator::file_name("second.txt")],
        )
        .await
        .unwrap();
    assert_eq!(r.file_name(), Some("second.txt"));
}

#[tokio::test]
async fn default_file_name_uses_token_or_id() {
    let temp = TempDir::new().unwrap();
    let ctx = PersistedContext::new(temp.path(), "output", "naming").unwrap();

    let tokened = ctx
        .store("v".to_string(), vec![Decorator::token("label")])
        .await
        .unwrap();
    let pattern = Regex::new(r"^\d{8}T\d{6}-\d{3}-label\.\w+$").unwrap();
    assert!(pattern.is_match(tokened.file_name().unwrap()));

    let anonymous = ctx.store("v".to_string(), vec![]).await.unwrap();
    let pattern = Regex::new(&format!(
        r"^\d{{8}}T\d{{6}}-\d{{3}}-{}\.\w+$",
        regex::escape(anonymous.id())
    ))
    .unwrap();
    assert!(pattern.is_match(anonymous.file_name().unwrap()));

    let run_dir = ctx.run_directory().unwrap();
    assert!(run_dir.join(tokened.file_name().unwrap()).is_file());
    assert!(run_dir.join(anonymous.file_name().unwrap()).is_file());
}

#[tokio::test]
async fn run_preserves_length_and_order() {
    let temp = TempDir::new().unwrap();
    let command = FixedCommand::new(&[
        ("one", Some("a")),
        ("two", None),
        ("three", Some("c")),
        ("four", None),
    ]);
    let persisted = PersistedContext::new(temp.path(), "output", "order").unwrap();
    let ephemeral = EphemeralContext::default();

    for ctx in [&persisted as &dyn Context, &ephemeral as &dyn Context] {
        let refs = ctx.run(&command, &[]).await.unwrap();
        let contents: Vec<&str> = refs.iter().map(|r| r.content()).collect();
        assert_eq!(contents, vec!["one", "two", "three", "four"]);
        assert_eq!(refs[0].token(), Some("a"));
        assert_eq!(refs[1].token(), None);
        assert_eq!(refs[2].token(), Some("c"));
    }
    assert_eq!(persisted.references().len(), 4);
}

#[tokio::test]
async fn persisted_run_directories_are_isolated() {
    let temp = TempDir::new().unwrap();
    let morning = Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap();
    let evening = Utc.with_ymd_and_hms(2024, 5, 1, 18, 30, 0).unwrap();
    let first = PersistedContext::started_at(temp.path(), "output", "draft", morning).unwrap();
    let second = PersistedContext::started_at(temp.path(), "output", "review", evening).unwrap();

    let a = first
        .store("from first".to_string(), vec![Decorator::token("shared")])
        .await
        .unwrap();
    let b = second
        .store("from second".to_string(), vec![Decorator::token("shared")])
        .await
        .unwrap();

    let dir_a = first.run_directory().unwrap();
    let dir_b = second.run_directory().unwrap();
    assert_ne!(dir_a, dir_b);
    assert!(!dir_a.starts_with(dir_b) && !dir_b.starts_with(dir_a));
    assert!(dir_a.ends_with("20240501T090000-draft"));
    assert!(dir_b.ends_with("20240501T183000-review"));

    assert!(first.get(b.id()).await.is_none());
    assert!(second.get(a.id()).await.is_none());
    assert_eq!(first.get("shared").await.as_deref(), Some("from first"));
    assert_eq!(second.get("shared").await.as_deref(), Some("from second"));
    assert!(first.warnings().is_empty());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn persisted_round_trip(value in any::<String>()) {
        let temp = TempDir::new().unwrap();
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        let ctx = PersistedContext::new(temp.path(), "output", "prop").unwrap();
        let (fetched, on_disk) = rt.block_on(async {
            let r = ctx.store(value.clone(), vec![]).await.unwrap();
            let path = ctx.run_directory().unwrap().join(r.file_name().unwrap());
            (ctx.get(r.id()).await, std::fs::read_to_string(path).unwrap())
        });
        prop_assert_eq!(fetched, Some(value.clone()));
        prop_assert_eq!(on_disk, value);
    }
}
