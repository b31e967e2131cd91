//! Scripted playback session
//!
//! Plays one virtual track through the full stack: controller, simulated
//! engine, notification synchronizer and log surface. Each step mirrors
//! something a user does on the phone.

use crate::config::DemoConfig;
use crate::error::Result;
use pocket_audio_mobile::{LogSurface, SimulatedEngine};
use pocket_core::{
    format_millis, NotificationSurface, NotificationTap, PlaybackEngine, SessionState, TrackRef,
};
use pocket_playback::{NotificationSynchronizer, SessionController};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// What the scripted session left behind
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub final_state: SessionState,
    pub notifications_published: usize,
    /// A notification was still on screen after shutdown
    pub notification_visible: bool,
    pub engine_releases: usize,
    pub live_handles: usize,
}

/// Display name for a locator: its last path segment
pub fn display_name(locator: &str) -> &str {
    locator
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|name| !name.is_empty())
        .unwrap_or(locator)
}

/// Run the scripted session
pub async fn run(config: &DemoConfig) -> Result<Summary> {
    let engine = SimulatedEngine::new(config.engine.engine_config());
    engine.add_track(config.script.track.clone(), config.script.duration_ms);

    let controller = SessionController::new(engine.clone(), config.session.clone());
    let surface = LogSurface::new();
    let sync = Arc::new(NotificationSynchronizer::new(
        controller.clone(),
        surface.clone(),
    ));
    let sync_task = Arc::clone(&sync).spawn();

    let result = play_through(&controller, &sync, config).await;

    controller.shutdown().await;
    sync_task.abort();
    // Aborted is the expected outcome
    let _ = sync_task.await;
    // Events the task never got to are settled from the final state
    sync.resync().await;

    result?;

    Ok(Summary {
        final_state: controller.status(),
        notifications_published: surface.history().len(),
        notification_visible: surface.current().is_some(),
        engine_releases: engine.release_count(),
        live_handles: engine.live_handles(),
    })
}

async fn play_through<E, N>(
    controller: &SessionController<E>,
    sync: &Arc<NotificationSynchronizer<E, N>>,
    config: &DemoConfig,
) -> Result<()>
where
    E: PlaybackEngine,
    N: NotificationSurface,
{
    let step = Duration::from_millis(config.script.step_ms);
    let locator = config.script.track.as_str();

    controller
        .select_and_play(TrackRef::new(locator, display_name(locator)))
        .await?;
    tokio::time::sleep(step).await;
    log_position(controller);

    // Pause from the notification
    let tap = NotificationTap::new(controller.token());
    sync.handle_tap(tap).await?;
    log_position(controller);

    // Drag the slider to the middle, then release it
    if controller.begin_seek(0.25) {
        controller.begin_seek(0.5);
        controller.commit_seek(0.5).await?;
    }
    log_position(controller);

    // Resume from the in-app button
    controller.toggle_play_pause().await?;
    tokio::time::sleep(step).await;
    log_position(controller);

    controller.stop().await?;
    Ok(())
}

fn log_position<E: PlaybackEngine>(controller: &SessionController<E>) {
    let state = controller.status();
    let playback = state.playback();
    info!(
        playing = state.is_playing(),
        "Position {} / {}",
        format_millis(playback.position_ms),
        format_millis(playback.duration_ms)
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_name_is_last_segment() {
        assert_eq!(display_name("file:///music/song.mp3"), "song.mp3");
        assert_eq!(display_name("song.mp3"), "song.mp3");
        assert_eq!(display_name("file:///music/album/"), "album");
    }
}
