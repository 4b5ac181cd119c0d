//! End-to-end hunts through the public API

use std::io::Write;
use std::time::Duration;

use ghost_trail::config::{ConfigError, GameConfig};
use ghost_trail::devices::{
    PositionError, RetryPolicy, RetryingPositionSource, ScriptedHeadingSource,
    ScriptedPositionSource,
};
use ghost_trail::sensors::{HeadingSample, PositionFix};
use ghost_trail::session::{HeadingStatus, SessionStatus};
use ghost_trail::trail::{TrailState, WaypointStatus};
use ghost_trail::{GameSession, SessionRunner};

const PARK_TRAIL: &str = r#"{
    "trail": [
        { "name": "Gate", "latitude": 52.08000, "longitude": 5.12000 },
        { "name": "Pond", "latitude": 52.08100, "longitude": 5.12000 },
        { "name": "Oak",  "latitude": 52.08100, "longitude": 5.12150 }
    ],
    "acceptance_radius_m": 20.0,
    "notice_duration_ms": 1500,
    "position_retry": { "max_retries": 2, "retry_delay_ms": 500 }
}"#;

fn write_config(json: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(json.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_config_from_file() {
    let file = write_config(PARK_TRAIL);
    let config = GameConfig::load(file.path()).unwrap();

    assert_eq!(config.trail.len(), 3);
    assert_eq!(config.acceptance_radius_m, 20.0);
    assert_eq!(config.position_retry.max_retries, 2);
    // Unspecified sections keep their defaults
    assert_eq!(config.guidance.max_footsteps, 8);
}

#[test]
fn test_load_invalid_config_from_file() {
    let file = write_config(r#"{ "acceptance_radius_m": -3 }"#);
    let err = GameConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidValue { .. }), "{}", err);
}

#[test]
fn test_walk_session_synchronously() {
    let config = GameConfig::from_json_str(PARK_TRAIL).unwrap();
    let mut session = GameSession::from_config(&config).unwrap();

    session
        .handle_fix(PositionFix::new(52.07950, 5.12000, 4.0, 0))
        .unwrap();
    assert!(session.start());
    assert!(!session.start());

    // Within 20m of the gate
    let result = session
        .handle_fix(PositionFix::new(52.08010, 5.12000, 4.0, 1000))
        .unwrap();
    assert!(result.is_advanced());

    let view = session.view();
    assert_eq!(view.found_notice.as_deref(), Some("Gate"));
    assert_eq!(view.waypoints[0].status, WaypointStatus::Visited);
    assert_eq!(view.waypoints[1].status, WaypointStatus::Current);
    assert_eq!(view.waypoints[2].status, WaypointStatus::Pending);

    // Pond is ~100m due north
    let guidance = view.guidance.unwrap();
    assert!((guidance.distance_m - 100.0).abs() < 5.0);
    assert_eq!(guidance.footsteps, 8);
    assert!(guidance.show_footsteps);
}

#[tokio::test(start_paused = true)]
async fn test_replayed_walk_with_flaky_gps() {
    let config = GameConfig::from_json_str(PARK_TRAIL).unwrap();
    let session = GameSession::from_config(&config).unwrap();

    let walk = vec![
        Ok(PositionFix::new(52.07950, 5.12000, 6.0, 0)),
        Err(PositionError::Timeout),
        Ok(PositionFix::new(52.08000, 5.12000, 6.0, 2000)),
        Err(PositionError::Unavailable),
        Err(PositionError::Timeout),
        Ok(PositionFix::new(52.08050, 5.12000, 6.0, 4000)),
        Ok(PositionFix::new(52.08100, 5.12000, 6.0, 6000)),
        Ok(PositionFix::new(52.08100, 5.12080, 6.0, 8000)),
        Ok(PositionFix::new(52.08100, 5.12150, 6.0, 10_000)),
    ];
    let position = RetryingPositionSource::new(
        ScriptedPositionSource::new(walk).with_interval(Duration::from_millis(1000)),
        config.position_retry,
    );
    let heading = ScriptedHeadingSource::new(vec![
        Ok(HeadingSample::new(0.0, 5.0)),
        Ok(HeadingSample::new(90.0, 5.0)),
    ])
    .with_interval(Duration::from_millis(3000));

    let handle = SessionRunner::new(session, position, heading).spawn();
    handle.start().await.unwrap();

    let mut views = handle.views();
    let view = views
        .wait_for(|v| v.status == SessionStatus::Completed)
        .await
        .unwrap()
        .clone();
    assert_eq!(view.visited_count, 3);
    assert_eq!(view.state, TrailState::Completed);
    assert_eq!(view.found_notice.as_deref(), Some("Oak"));

    let session = handle.stop().await.unwrap();
    assert!(session.progress().visited().iter().all(|v| *v));
    // Both compass readings were delivered alongside the walk, then the
    // script ran dry
    assert_eq!(session.heading_status(), HeadingStatus::Lost);
}

#[tokio::test(start_paused = true)]
async fn test_gps_failing_past_retries_blocks() {
    let config = GameConfig::default();
    let session = GameSession::from_config(&config).unwrap();

    let position = RetryingPositionSource::new(
        ScriptedPositionSource::new(vec![
            Err(PositionError::Timeout),
            Err(PositionError::Timeout),
            Err(PositionError::Timeout),
            Err(PositionError::Timeout),
        ]),
        RetryPolicy::default(),
    );
    let handle = SessionRunner::new(
        session,
        position,
        ghost_trail::devices::NoHeadingSource,
    )
    .spawn();

    let mut views = handle.views();
    let view = views
        .wait_for(|v| v.status == SessionStatus::PositionUnavailable)
        .await
        .unwrap()
        .clone();
    assert!(view.error.unwrap().contains("timed out"));

    handle.stop().await.unwrap();
}
