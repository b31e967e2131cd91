//! Property-based tests for the session controller
//!
//! Uses proptest to drive random command sequences and tick streams through
//! the controller and check the ownership and seek invariants after each step.

use pocket_audio_mobile::{SimulatedEngine, SimulatedEngineConfig};
use pocket_core::{PlaybackStatus, SessionState, TrackRef};
use pocket_playback::{SessionConfig, SessionController};
use proptest::prelude::*;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Command {
    Select(usize),
    SelectMissing,
    Toggle,
    Stop,
    BeginSeek(f64),
    CommitSeek(f64),
}

fn arbitrary_command() -> impl Strategy<Value = Command> {
    prop_oneof![
        (0usize..3).prop_map(Command::Select),
        Just(Command::SelectMissing),
        Just(Command::Toggle),
        Just(Command::Stop),
        (-0.5f64..1.5).prop_map(Command::BeginSeek),
        (-0.5f64..1.5).prop_map(Command::CommitSeek),
    ]
}

const TRACKS: [(&str, u64); 3] = [
    ("file:///music/a.mp3", 180_000),
    ("file:///music/b.mp3", 200_000),
    ("file:///music/c.mp3", 1_000),
];

fn setup() -> (SimulatedEngine, SessionController<SimulatedEngine>) {
    let engine = SimulatedEngine::new(SimulatedEngineConfig::manual());
    for (locator, duration_ms) in TRACKS {
        engine.add_track(locator, duration_ms);
    }
    let controller = SessionController::new(engine.clone(), SessionConfig::default());
    (engine, controller)
}

fn runtime() -> tokio::runtime::Runtime {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
}

async fn apply(controller: &SessionController<SimulatedEngine>, command: &Command) {
    // Engine errors are part of the exercised behavior; only state matters here
    match command {
        Command::Select(i) => {
            let (locator, _) = TRACKS[*i];
            let _ = controller
                .select_and_play(TrackRef::new(locator, locator))
                .await;
        }
        Command::SelectMissing => {
            let _ = controller
                .select_and_play(TrackRef::new("file:///music/missing.mp3", "missing"))
                .await;
        }
        Command::Toggle => {
            let _ = controller.toggle_play_pause().await;
        }
        Command::Stop => {
            let _ = controller.stop().await;
        }
        Command::BeginSeek(fraction) => {
            controller.begin_seek(*fraction);
        }
        Command::CommitSeek(fraction) => {
            let _ = controller.commit_seek(*fraction).await;
        }
    }
}

// ===== Property Tests =====

proptest! {
    /// Property: At most one engine handle is ever live, and it is live
    /// exactly when the session is active
    #[test]
    fn one_handle_at_most(commands in prop::collection::vec(arbitrary_command(), 1..40)) {
        let rt = runtime();
        rt.block_on(async {
            let (engine, controller) = setup();

            for command in &commands {
                apply(&controller, command).await;

                let state = controller.status();
                prop_assert!(engine.peak_live_handles() <= 1);
                prop_assert_eq!(engine.live_handles(), usize::from(state.is_active()));
                prop_assert!(!matches!(state, SessionState::Loading { .. }), "state must not be Loading: {:?}", state);
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: Displayed position never exceeds the track duration
    #[test]
    fn position_within_duration(commands in prop::collection::vec(arbitrary_command(), 1..40)) {
        let rt = runtime();
        rt.block_on(async {
            let (_engine, controller) = setup();

            for command in &commands {
                apply(&controller, command).await;

                let playback = controller.status().playback();
                prop_assert!(playback.position_ms <= playback.duration_ms);
                prop_assert!((0.0..=1.0).contains(&controller.status().progress()));
            }
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: While a drag is in progress no status tick moves the
    /// displayed position, and the commit seeks unless the track ended
    #[test]
    fn drag_position_survives_ticks(
        fraction in 0.0f64..=1.0,
        ticks in prop::collection::vec((0u64..250_000, any::<bool>()), 0..20)
    ) {
        let rt = runtime();
        rt.block_on(async {
            let (engine, controller) = setup();
            let (locator, duration_ms) = TRACKS[0];
            controller
                .select_and_play(TrackRef::new(locator, locator))
                .await
                .unwrap();
            let handle = engine.handles()[0];

            controller.begin_seek(fraction);
            let dragged = controller.status().playback().position_ms;

            for (position_ms, is_playing) in &ticks {
                engine.emit_status(handle, PlaybackStatus::new(*position_ms, duration_ms, *is_playing));

                let state = controller.status();
                prop_assert!(state.is_seeking());
                prop_assert_eq!(state.playback().position_ms, dragged);
                prop_assert_eq!(state.is_playing(), *is_playing);
            }

            // A stopped tick at the end means the track finished under the drag
            let ended = ticks
                .last()
                .is_some_and(|(position_ms, is_playing)| *position_ms >= duration_ms && !is_playing);

            controller.commit_seek(fraction).await.unwrap();
            let expected = if ended { None } else { Some(dragged) };
            prop_assert_eq!(engine.last_seek(), expected);
            prop_assert!(!controller.status().is_seeking());
            Ok::<(), TestCaseError>(())
        })?;
    }

    /// Property: Commit targets are floor(fraction * duration), clamped
    #[test]
    fn commit_target_is_clamped(fraction in -2.0f64..3.0) {
        let rt = runtime();
        rt.block_on(async {
            let (engine, controller) = setup();
            let (locator, duration_ms) = TRACKS[1];
            controller
                .select_and_play(TrackRef::new(locator, locator))
                .await
                .unwrap();

            controller.commit_seek(fraction).await.unwrap();

            let expected = (fraction.clamp(0.0, 1.0) * duration_ms as f64).floor() as u64;
            prop_assert_eq!(engine.last_seek(), Some(expected.min(duration_ms)));
            Ok::<(), TestCaseError>(())
        })?;
    }
}
