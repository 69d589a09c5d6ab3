use std::sync::{Arc, Mutex};
use std::time::Duration;

use agent_core::{
    AgentAction, CombatConfigPatch, CombatState, Detection, PerceptionFrame, Point, Size, Skill,
};
use async_trait::async_trait;
use runtime::{
    ActuationConfig, ActuationConfigPatch, ActuationEvent, AgentRuntime, CommandSink,
    DecisionEvent, Event, RuntimeConfig, RuntimeError, SinkCommand, SinkError, Topic,
};

/// Records every delivered command.
#[derive(Clone, Default)]
struct RecordingSink {
    sent: Arc<Mutex<Vec<(String, SinkCommand)>>>,
}

impl RecordingSink {
    fn sent(&self) -> Vec<(String, SinkCommand)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl CommandSink for RecordingSink {
    async fn send(&self, endpoint: &str, command: &SinkCommand) -> Result<(), SinkError> {
        self.sent
            .lock()
            .unwrap()
            .push((endpoint.to_owned(), command.clone()));
        Ok(())
    }
}

/// Rejects everything until `online` is set.
#[derive(Clone, Default)]
struct FlakySink {
    online: Arc<Mutex<bool>>,
}

#[async_trait]
impl CommandSink for FlakySink {
    async fn send(&self, _endpoint: &str, _command: &SinkCommand) -> Result<(), SinkError> {
        if *self.online.lock().unwrap() {
            Ok(())
        } else {
            Err(SinkError::Rejected("offline".to_owned()))
        }
    }
}

struct SlowSink;

#[async_trait]
impl CommandSink for SlowSink {
    async fn send(&self, _endpoint: &str, _command: &SinkCommand) -> Result<(), SinkError> {
        tokio::time::sleep(Duration::from_secs(10)).await;
        Ok(())
    }
}

fn enabled() -> ActuationConfig {
    ActuationConfig {
        enabled: true,
        ..ActuationConfig::default()
    }
}

fn strike() -> Vec<Skill> {
    vec![Skill::new("strike", "1", 0).named("Strike")]
}

/// One enemy `dx` pixels right of the frame center.
fn frame_with_enemy(timestamp_ms: u64, dx: f64) -> PerceptionFrame {
    PerceptionFrame {
        source: Some(Size::new(1920.0, 1080.0)),
        ..PerceptionFrame::new(vec![Detection::at_pixel(
            1,
            "enemy",
            Point::new(960.0 + dx, 540.0),
            30.0,
        )])
    }
    .at(timestamp_ms)
}

#[tokio::test]
async fn test_frame_is_evaluated_and_key_is_delivered() {
    let sink = RecordingSink::default();
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .actuation(enabled())
        .sink(sink.clone())
        .build()
        .await
        .expect("runtime builds");
    let handle = runtime.handle();

    let outcome = handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .expect("frame accepted");
    let report = outcome.report().expect("first frame is evaluated");
    assert_eq!(report.state(), CombatState::Combat);

    let status = handle.flush_actuation().await.expect("flush");
    assert_eq!(status.sent, 1);
    assert!(status.connected);
    assert_eq!(
        sink.sent(),
        vec![(
            ActuationConfig::DEFAULT_ENDPOINT.to_owned(),
            SinkCommand::key("1")
        )]
    );

    drop(handle);
    runtime.shutdown().await.expect("clean shutdown");
}

#[tokio::test]
async fn test_move_is_sent_in_normalized_coordinates() {
    let sink = RecordingSink::default();
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .actuation(enabled())
        .sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    // 480px away: outside attack range, so the agent approaches.
    let outcome = handle
        .submit_frame(frame_with_enemy(0, 480.0))
        .await
        .unwrap();
    assert_eq!(
        outcome.report().and_then(|r| r.action().cloned()),
        Some(AgentAction::MoveToward {
            target: Point::new(1440.0, 540.0)
        })
    );

    handle.flush_actuation().await.unwrap();
    match sink.sent().as_slice() {
        [(_, SinkCommand::Move { x, y })] => {
            assert!((x - 0.75).abs() < 1e-9);
            assert!((y - 0.5).abs() < 1e-9);
        }
        other => panic!("expected one move, got {other:?}"),
    }
}

#[tokio::test]
async fn test_frames_inside_min_interval_are_throttled() {
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .sink(RecordingSink::default())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let first = handle.submit_frame(frame_with_enemy(0, 100.0)).await.unwrap();
    let second = handle
        .submit_frame(frame_with_enemy(100, 100.0))
        .await
        .unwrap();
    let third = handle
        .submit_frame(frame_with_enemy(250, 100.0))
        .await
        .unwrap();

    assert!(!first.is_throttled());
    assert!(second.is_throttled());
    assert!(!third.is_throttled());

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.stats.ticks, 2);
}

#[tokio::test]
async fn test_state_change_and_action_are_published() {
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .sink(RecordingSink::default())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut decisions = handle.subscribe(Topic::Decision);

    handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();

    match decisions.recv().await.unwrap() {
        Event::Decision(DecisionEvent::StateChanged { from, to, .. }) => {
            assert_eq!(from, CombatState::Idle);
            assert_eq!(to, CombatState::Combat);
        }
        other => panic!("unexpected event {other:?}"),
    }
    match decisions.recv().await.unwrap() {
        Event::Decision(DecisionEvent::ActionIssued { action, target, .. }) => {
            assert_eq!(
                action,
                AgentAction::UseSkill {
                    skill_id: "strike".to_owned(),
                    key: "1".to_owned()
                }
            );
            assert_eq!(target.map(|id| id.0), Some(1));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test]
async fn test_disabled_actuation_skips_commands() {
    let sink = RecordingSink::default();
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();
    let status = handle.flush_actuation().await.unwrap();

    assert_eq!(status.skipped, 1);
    assert_eq!(status.sent, 0);
    assert!(sink.sent().is_empty());
}

#[tokio::test]
async fn test_sink_failure_is_recorded_then_recovers() {
    let sink = FlakySink::default();
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .actuation(enabled())
        .sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();
    let mut actuation = handle.subscribe(Topic::Actuation);

    let outcome = handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();
    // Decisions are unaffected by delivery failures.
    assert_eq!(outcome.report().map(|r| r.state()), Some(CombatState::Combat));

    let status = handle.flush_actuation().await.unwrap();
    assert!(!status.connected);
    assert_eq!(status.failed, 1);
    assert_eq!(status.last_error.as_deref(), Some("command rejected: offline"));
    assert!(matches!(
        actuation.recv().await.unwrap(),
        Event::Actuation(ActuationEvent::CommandFailed { .. })
    ));

    *sink.online.lock().unwrap() = true;
    handle
        .submit_frame(frame_with_enemy(1_000, 100.0))
        .await
        .unwrap();
    let status = handle.flush_actuation().await.unwrap();
    assert!(status.connected);
    assert_eq!(status.sent, 1);
    assert_eq!(handle.actuation_status(), status);
    assert!(matches!(
        actuation.recv().await.unwrap(),
        Event::Actuation(ActuationEvent::ConnectivityRestored { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn test_slow_sink_times_out() {
    let runtime = AgentRuntime::builder()
        .config(RuntimeConfig {
            actuation_timeout: Duration::from_millis(500),
            ..RuntimeConfig::default()
        })
        .roster(strike())
        .actuation(enabled())
        .sink(SlowSink)
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();
    let status = handle.flush_actuation().await.unwrap();

    assert_eq!(status.failed, 1);
    assert_eq!(
        status.last_error.as_deref(),
        Some("command timed out after 500ms")
    );
}

#[tokio::test]
async fn test_config_roster_and_reset_round_trip() {
    let runtime = AgentRuntime::builder()
        .sink(RecordingSink::default())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.roster.len(), 5);
    assert_eq!(snapshot.state, CombatState::Idle);

    let config = handle
        .update_config(CombatConfigPatch {
            heal_threshold: Some(45.0),
            ..CombatConfigPatch::default()
        })
        .await
        .unwrap();
    assert_eq!(config.heal_threshold, 45.0);
    assert_eq!(config.max_attack_range, 250.0);

    handle.replace_roster(strike()).await.unwrap();
    handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.roster.len(), 1);
    assert_eq!(snapshot.roster[0].last_used_ms, Some(0));
    assert_eq!(snapshot.stats.skills_used, 1);

    handle.reset().await.unwrap();
    let snapshot = handle.snapshot().await.unwrap();
    assert_eq!(snapshot.roster[0].last_used_ms, None);
    assert_eq!(snapshot.stats.skills_used, 0);
    assert_eq!(snapshot.config.heal_threshold, 45.0);

    // Throttle state is cleared too.
    let outcome = handle
        .submit_frame(frame_with_enemy(50, 100.0))
        .await
        .unwrap();
    assert!(!outcome.is_throttled());
}

#[tokio::test]
async fn test_update_actuation_validates_endpoint() {
    let sink = RecordingSink::default();
    let runtime = AgentRuntime::builder()
        .roster(strike())
        .sink(sink.clone())
        .build()
        .await
        .unwrap();
    let handle = runtime.handle();

    let rejected = handle
        .update_actuation(ActuationConfigPatch {
            endpoint: Some("not a url".to_owned()),
            ..ActuationConfigPatch::default()
        })
        .await;
    assert!(matches!(rejected, Err(RuntimeError::InvalidConfig(_))));

    let config = handle
        .update_actuation(ActuationConfigPatch {
            endpoint: Some("http://127.0.0.1:9000/input".to_owned()),
            enabled: Some(true),
            log_commands: None,
        })
        .await
        .unwrap();
    assert!(config.enabled);
    assert!(config.log_commands);

    handle
        .submit_frame(frame_with_enemy(0, 100.0))
        .await
        .unwrap();
    handle.flush_actuation().await.unwrap();
    assert_eq!(sink.sent()[0].0, "http://127.0.0.1:9000/input");
}

#[tokio::test]
async fn test_build_rejects_invalid_endpoint() {
    let result = AgentRuntime::builder()
        .actuation(ActuationConfig {
            endpoint: "ftp://example.com/in".to_owned(),
            ..ActuationConfig::default()
        })
        .sink(RecordingSink::default())
        .build()
        .await;

    assert!(matches!(result, Err(RuntimeError::InvalidConfig(_))));
}
