//! Integration tests for the simulated engine
//!
//! Exercises the timer-driven behavior through the `PlaybackEngine` contract
//! only, the way the session controller sees it.

use pocket_audio_mobile::{EngineCall, SimulatedEngine, SimulatedEngineConfig};
use pocket_core::{EngineError, EngineHandle, PlaybackEngine, PlaybackStatus};
use std::sync::{Arc, Mutex};
use std::time::Duration;

// ===== Test Helpers =====

fn ticking_engine() -> SimulatedEngine {
    let engine = SimulatedEngine::new(SimulatedEngineConfig {
        tick_interval: Some(Duration::from_millis(500)),
        latency: Duration::ZERO,
    });
    engine.add_track("file:///music/song.mp3", 180_000);
    engine.add_track("file:///music/jingle.mp3", 1_000);
    engine
}

fn record(engine: &SimulatedEngine, handle: EngineHandle) -> Arc<Mutex<Vec<PlaybackStatus>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    engine
        .on_status(handle, Arc::new(move |status| log.lock().unwrap().push(status)))
        .unwrap();
    seen
}

// ===== Ticker =====

#[tokio::test(start_paused = true)]
async fn paused_handle_keeps_its_position() {
    let engine = ticking_engine();
    let handle = engine.load("file:///music/song.mp3").await.unwrap();
    let seen = record(&engine, handle);

    engine.play(handle).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_100)).await;
    engine.pause(handle).await.unwrap();
    tokio::time::sleep(Duration::from_millis(1_000)).await;

    let status = engine.status(handle).await.unwrap();
    assert_eq!(status.position_ms, 1_000);
    assert!(!status.is_playing);

    // Ticks keep arriving while paused, all at the same position
    let seen = seen.lock().unwrap();
    assert!(seen.len() >= 3);
    assert!(seen[2..].iter().all(|s| s.position_ms == 1_000));
}

#[tokio::test(start_paused = true)]
async fn released_handle_stops_ticking() {
    let engine = ticking_engine();
    let handle = engine.load("file:///music/song.mp3").await.unwrap();
    let seen = record(&engine, handle);
    engine.play(handle).await.unwrap();

    tokio::time::sleep(Duration::from_millis(600)).await;
    engine.release(handle).await.unwrap();
    let before = seen.lock().unwrap().len();

    tokio::time::sleep(Duration::from_millis(2_000)).await;
    assert_eq!(seen.lock().unwrap().len(), before);
    assert_eq!(engine.live_handles(), 0);
}

#[tokio::test(start_paused = true)]
async fn play_after_end_restarts_from_zero() {
    let engine = ticking_engine();
    let handle = engine.load("file:///music/jingle.mp3").await.unwrap();
    engine.play(handle).await.unwrap();

    tokio::time::sleep(Duration::from_millis(1_100)).await;
    let ended = engine.status(handle).await.unwrap();
    assert!(ended.is_finished());

    engine.play(handle).await.unwrap();
    let restarted = engine.status(handle).await.unwrap();
    assert_eq!(restarted.position_ms, 0);
    assert!(restarted.is_playing);
}

// ===== Contract =====

#[tokio::test]
async fn stop_rewinds_without_releasing() {
    let engine = ticking_engine();
    let handle = engine.load("file:///music/song.mp3").await.unwrap();
    engine.play(handle).await.unwrap();
    engine.seek(handle, 60_000).await.unwrap();

    engine.stop(handle).await.unwrap();

    let status = engine.status(handle).await.unwrap();
    assert_eq!(status.position_ms, 0);
    assert!(!status.is_playing);
    assert_eq!(engine.live_handles(), 1);
}

#[tokio::test]
async fn commands_on_released_handle_fail() {
    let engine = ticking_engine();
    let handle = engine.load("file:///music/song.mp3").await.unwrap();
    engine.release(handle).await.unwrap();

    let err = engine.play(handle).await.unwrap_err();
    assert!(matches!(err, EngineError::Command { op: "play", .. }));
    assert!(engine.on_status(handle, Arc::new(|_| {})).is_err());
}

#[tokio::test]
async fn injected_load_failure_reports_unavailable() {
    let engine = ticking_engine();
    engine.fail_next(EngineCall::Load);

    let err = engine.load("file:///music/song.mp3").await.unwrap_err();
    assert!(matches!(err, EngineError::ResourceUnavailable { .. }));
    assert_eq!(engine.live_handles(), 0);

    // Only the next call fails
    assert!(engine.load("file:///music/song.mp3").await.is_ok());
}
