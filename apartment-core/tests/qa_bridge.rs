//! QA tests for the engine to console event bridge.
//!
//! These tests verify:
//! - Loading progress is monotonic and ends in exactly one completion
//! - Envelopes arrive in emission order
//! - The envelope wire shape used by `--events`
//!
//! Run with: `cargo test -p apartment-core --test qa_bridge`

use std::time::Duration;

use apartment_core::engine::loader::{AssetKind, AssetSpec};
use apartment_core::testing::{drain, fast_config, manual_engine, sample_roster};
use apartment_core::{
    ConsoleConfig, EventEnvelope, EventKind, HeadlessConfig, HeadlessConsole, TestHarness,
};

fn setup() {
    let _ = dotenvy::dotenv();
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
async fn test_loading_events_on_live_engine() {
    setup();
    let config = HeadlessConfig::new()
        .with_console(ConsoleConfig::default().with_engine(fast_config()))
        .with_roster(sample_roster().unwrap());
    let mut game = HeadlessConsole::new(config).await.unwrap();
    assert!(game.wait_until_active().await);

    let events = game.take_events();
    let progress: Vec<u8> = events
        .iter()
        .filter_map(|e| match e {
            EventEnvelope::LoadingProgress(p) => Some(*p),
            _ => None,
        })
        .collect();
    assert!(!progress.is_empty());
    assert!(progress.windows(2).all(|w| w[0] <= w[1]), "{progress:?}");
    assert_eq!(progress.last(), Some(&100));

    let completions: Vec<usize> = events
        .iter()
        .enumerate()
        .filter(|(_, e)| e.kind() == EventKind::LoadingComplete)
        .map(|(i, _)| i)
        .collect();
    assert_eq!(completions.len(), 1);
    // Completion comes after every progress report.
    assert!(events[completions[0]..]
        .iter()
        .all(|e| e.kind() != EventKind::LoadingProgress));

    assert!(game.transcript().iter().any(|l| l == "游戏资源加载完成!"));
    game.shutdown();
}

#[test]
fn test_documented_progress_sequence() {
    let config = fast_config().with_load_rate(1000).with_assets(vec![
        AssetSpec::new("logo", AssetKind::Image, "logo.png", 100),
        AssetSpec::new("extra", AssetKind::Image, "extra.png", 350),
        AssetSpec::new("startup", AssetKind::Audio, "startup.wav", 550),
    ]);
    let (mut engine, mut stream, _live) = manual_engine(config);
    engine.boot();
    for ms in [100, 350, 550, 10, 10] {
        engine.advance(Duration::from_millis(ms));
    }

    assert_eq!(
        drain(&mut stream),
        vec![
            EventEnvelope::LoadingProgress(10),
            EventEnvelope::LoadingProgress(45),
            EventEnvelope::LoadingProgress(100),
            EventEnvelope::LoadingComplete,
        ]
    );
}

#[tokio::test]
async fn test_replies_keep_submission_order() {
    setup();
    let mut harness = TestHarness::active().await.unwrap();

    for word in ["one", "two", "three"] {
        harness.game.console().host().dispatch_command(word);
    }
    harness.game.settle(Duration::from_millis(100)).await;

    let replies: Vec<String> = harness
        .game
        .take_events()
        .iter()
        .filter_map(|e| e.text().map(str::to_string))
        .collect();
    assert_eq!(
        replies,
        vec![
            "游戏引擎收到命令: one",
            "游戏引擎收到命令: two",
            "游戏引擎收到命令: three",
        ]
    );
}

#[test]
fn test_envelope_wire_shape() {
    let progress = serde_json::to_value(EventEnvelope::LoadingProgress(45)).unwrap();
    assert_eq!(
        progress,
        serde_json::json!({"kind": "loading-progress", "payload": 45})
    );

    let complete = serde_json::to_value(EventEnvelope::LoadingComplete).unwrap();
    assert_eq!(complete, serde_json::json!({"kind": "loading-complete"}));

    let response = serde_json::to_value(EventEnvelope::CommandResponse("hi".into())).unwrap();
    assert_eq!(
        response,
        serde_json::json!({"kind": "command-response", "payload": "hi"})
    );
}
