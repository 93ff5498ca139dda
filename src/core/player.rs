//! Playback controller - transient player state for one media resource
//!
//! The controller issues commands to a [`MediaResource`] and mirrors its
//! state from the events the resource reports. It must live inside a tokio
//! runtime: the controls-hide timer is a spawned task.

use crate::core::media::{MediaEvent, MediaEventSink, MediaResource, Signal};
use crate::types::{PlaybackSnapshot, PlaybackState, PlayerConfig};
use crate::utils::format::format_video_time;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, warn};

/// Options fixed for the lifetime of a mounted player
#[derive(Debug, Clone)]
pub struct PlayerOptions {
    pub autoplay: bool,
    pub hide_controls_after: Duration,
    pub seek_step: f64,
}

impl Default for PlayerOptions {
    fn default() -> Self {
        Self::from(&PlayerConfig::default())
    }
}

impl From<&PlayerConfig> for PlayerOptions {
    fn from(config: &PlayerConfig) -> Self {
        Self {
            autoplay: config.autoplay,
            hide_controls_after: Duration::from_millis(config.hide_controls_after_ms),
            seek_step: config.seek_step_secs,
        }
    }
}

pub struct PlaybackController<R: MediaResource> {
    resource: R,
    source: String,
    options: PlayerOptions,

    state: PlaybackState,
    muted: bool,
    volume: f64,
    /// Restored when unmuting at volume 0
    last_audible_volume: f64,
    current_time: f64,
    duration: f64,
    show_controls: bool,
    fullscreen: bool,

    tx: UnboundedSender<Signal>,
    rx: UnboundedReceiver<Signal>,
    hide_timer: Option<JoinHandle<()>>,
    /// Only a hide signal carrying the current generation is honored
    hide_generation: u64,
}

impl<R: MediaResource> PlaybackController<R> {
    /// Attach to `resource`, load `src` and autoplay if configured
    pub fn mount(resource: R, src: &str, options: PlayerOptions) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut controller = Self {
            resource,
            source: String::new(),
            options,
            state: PlaybackState::Paused,
            muted: false,
            volume: 1.0,
            last_audible_volume: 1.0,
            current_time: 0.0,
            duration: 0.0,
            show_controls: true,
            fullscreen: false,
            tx,
            rx,
            hide_timer: None,
            hide_generation: 0,
        };
        controller.attach(src);
        controller
    }

    /// Switch to another media URL
    ///
    /// Equivalent to unmounting and mounting again: events still queued
    /// from the old source are discarded and the transient state resets.
    pub fn change_source(&mut self, src: &str) {
        self.cancel_hide_timer();
        self.resource.detach();

        let (tx, rx) = mpsc::unbounded_channel();
        self.tx = tx;
        self.rx = rx;
        self.state = PlaybackState::Paused;
        self.muted = false;
        self.volume = 1.0;
        self.last_audible_volume = 1.0;
        self.current_time = 0.0;
        self.duration = 0.0;
        self.show_controls = true;
        self.fullscreen = false;

        self.attach(src);
    }

    fn attach(&mut self, src: &str) {
        debug!(src, "mounting player");
        self.source = src.to_string();
        self.resource.load(src);
        self.resource.attach(MediaEventSink::new(self.tx.clone()));

        if self.options.autoplay {
            self.start_playback("autoplay");
        }
    }

    // ============================================
    // Commands
    // ============================================

    /// Play when paused, pause when playing or buffering
    pub fn toggle_play(&mut self) -> PlaybackState {
        match self.state {
            PlaybackState::Paused => self.start_playback("play"),
            PlaybackState::Playing | PlaybackState::Buffering => {
                self.resource.pause();
                self.set_state(PlaybackState::Paused);
            }
        }
        self.state
    }

    fn start_playback(&mut self, reason: &str) {
        match self.resource.play() {
            Ok(()) => self.set_state(PlaybackState::Playing),
            // Commonly a platform autoplay policy; stay paused
            Err(e) => warn!(error = %e, reason, src = %self.source, "playback was prevented"),
        }
    }

    /// Move the position by `delta` seconds, clamped to the media bounds
    pub fn seek(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.seek_to((self.current_time + delta).clamp(0.0, self.duration));
    }

    pub fn seek_forward(&mut self) {
        self.seek(self.options.seek_step);
    }

    pub fn seek_backward(&mut self) {
        self.seek(-self.options.seek_step);
    }

    /// Jump to a fraction of the duration, as from a progress-bar click
    pub fn seek_to_fraction(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction.clamp(0.0, 1.0) };
        self.seek_to(fraction * self.duration);
    }

    fn seek_to(&mut self, seconds: f64) {
        self.resource.set_current_time(seconds);
        self.current_time = seconds;
    }

    /// Set the volume; 0 mutes, anything louder unmutes
    pub fn set_volume(&mut self, volume: f64) {
        let volume = if volume.is_nan() { 0.0 } else { volume.clamp(0.0, 1.0) };
        self.resource.set_volume(volume);
        self.volume = volume;

        if volume == 0.0 {
            self.set_muted(true);
        } else {
            self.last_audible_volume = volume;
            if self.muted {
                self.set_muted(false);
            }
        }
    }

    /// Flip mute; unmuting at volume 0 restores the last audible volume
    pub fn toggle_mute(&mut self) {
        let muted = !self.muted;
        self.set_muted(muted);

        if !muted && self.volume == 0.0 {
            self.volume = self.last_audible_volume;
            self.resource.set_volume(self.volume);
        }
    }

    fn set_muted(&mut self, muted: bool) {
        self.resource.set_muted(muted);
        self.muted = muted;
    }

    /// Enter or leave fullscreen
    ///
    /// Fullscreen can also end outside the controller (e.g. the user hits
    /// Escape); [`MediaEvent::FullscreenChange`] keeps the facet in sync.
    pub fn toggle_fullscreen(&mut self) -> bool {
        let (target, result) = if self.fullscreen {
            (false, self.resource.exit_fullscreen())
        } else {
            (true, self.resource.request_fullscreen())
        };

        match result {
            Ok(()) => self.fullscreen = target,
            Err(e) => warn!(error = %e, "fullscreen toggle failed"),
        }
        self.fullscreen
    }

    /// Pointer moved over the player: show controls and restart the hide timer
    pub fn pointer_activity(&mut self) {
        self.reset_controls_timer();
    }

    // ============================================
    // Event handling
    // ============================================

    /// Apply every queued signal without waiting; returns how many were applied
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(signal) = self.rx.try_recv() {
            self.apply(signal);
            applied += 1;
        }
        applied
    }

    /// Wait for the next signal, apply it and return it
    pub async fn next_event(&mut self) -> Option<Signal> {
        let signal = self.rx.recv().await?;
        self.apply(signal);
        Some(signal)
    }

    fn apply(&mut self, signal: Signal) {
        match signal {
            Signal::Media(event) => self.handle_media_event(event),
            Signal::HideControls(generation) => {
                if generation == self.hide_generation && self.state == PlaybackState::Playing {
                    self.show_controls = false;
                    self.hide_timer = None;
                }
            }
        }
    }

    fn handle_media_event(&mut self, event: MediaEvent) {
        match event {
            MediaEvent::Play => {
                if self.state == PlaybackState::Paused {
                    self.set_state(PlaybackState::Playing);
                }
            }
            MediaEvent::Pause => self.set_state(PlaybackState::Paused),
            MediaEvent::DurationChange(duration) => {
                self.duration = if duration.is_finite() { duration.max(0.0) } else { 0.0 };
                self.current_time = self.current_time.min(self.duration);
            }
            MediaEvent::TimeUpdate(time) => {
                if time.is_finite() {
                    self.current_time = time.clamp(0.0, self.duration);
                }
            }
            MediaEvent::VolumeChange(volume) => {
                if volume.is_finite() {
                    self.volume = volume.clamp(0.0, 1.0);
                    if self.volume > 0.0 {
                        self.last_audible_volume = self.volume;
                    }
                }
            }
            MediaEvent::Waiting => {
                if self.state == PlaybackState::Playing {
                    self.set_state(PlaybackState::Buffering);
                }
            }
            MediaEvent::Playing => {
                if self.state != PlaybackState::Playing {
                    self.set_state(PlaybackState::Playing);
                }
            }
            MediaEvent::FullscreenChange(fullscreen) => self.fullscreen = fullscreen,
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        let previous = self.state;
        self.state = state;
        if previous == state {
            return;
        }
        debug!(?previous, ?state, "playback state changed");

        match state {
            PlaybackState::Playing => self.reset_controls_timer(),
            PlaybackState::Paused => {
                self.cancel_hide_timer();
                self.show_controls = true;
            }
            PlaybackState::Buffering => {}
        }
    }

    // ============================================
    // Controls timer
    // ============================================

    fn reset_controls_timer(&mut self) {
        self.cancel_hide_timer();
        self.show_controls = true;

        if self.state == PlaybackState::Playing {
            let generation = self.hide_generation;
            let delay = self.options.hide_controls_after;
            let tx = self.tx.clone();

            self.hide_timer = Some(tokio::spawn(async move {
                sleep(delay).await;
                let _ = tx.send(Signal::HideControls(generation));
            }));
        }
    }

    fn cancel_hide_timer(&mut self) {
        // Invalidates a hide signal that was already sent but not yet applied
        self.hide_generation += 1;
        if let Some(handle) = self.hide_timer.take() {
            handle.abort();
        }
    }

    // ============================================
    // Read access
    // ============================================

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            is_playing: self.state != PlaybackState::Paused,
            is_muted: self.muted,
            volume: self.volume,
            current_time: self.current_time,
            duration: self.duration,
            show_controls: self.show_controls,
            is_fullscreen: self.fullscreen,
            is_buffering: self.state == PlaybackState::Buffering,
        }
    }

    pub fn show_controls(&self) -> bool {
        self.show_controls
    }

    /// Played share of the media in `[0, 1]`; 0 until the duration is known
    pub fn progress_fraction(&self) -> f64 {
        if self.duration > 0.0 {
            self.current_time / self.duration
        } else {
            0.0
        }
    }

    /// "1:05 / 10:00"
    pub fn time_label(&self) -> String {
        format!(
            "{} / {}",
            format_video_time(self.current_time),
            format_video_time(self.duration)
        )
    }
}

impl<R: MediaResource> Drop for PlaybackController<R> {
    fn drop(&mut self) {
        self.cancel_hide_timer();
        self.resource.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, StreamVistaError};
    use parking_lot::Mutex;
    use std::sync::Arc;
    use tokio::time::{Instant, advance, timeout};

    #[derive(Default)]
    struct FakeState {
        sink: Option<MediaEventSink>,
        loaded: Vec<String>,
        reject_play: bool,
        deny_fullscreen: bool,
        position: f64,
        volume: Option<f64>,
        muted: bool,
        detached: usize,
    }

    /// Behaves like a browser video element: commands echo back as events
    #[derive(Clone, Default)]
    struct FakeMedia(Arc<Mutex<FakeState>>);

    impl FakeMedia {
        fn rejecting_play() -> Self {
            let media = Self::default();
            media.0.lock().reject_play = true;
            media
        }

        fn emit(&self, event: MediaEvent) {
            let sink = self.0.lock().sink.clone();
            if let Some(sink) = sink {
                sink.emit(event);
            }
        }
    }

    impl MediaResource for FakeMedia {
        fn attach(&mut self, sink: MediaEventSink) {
            self.0.lock().sink = Some(sink);
        }

        fn detach(&mut self) {
            let mut state = self.0.lock();
            state.sink = None;
            state.detached += 1;
        }

        fn load(&mut self, url: &str) {
            self.0.lock().loaded.push(url.to_string());
        }

        fn play(&mut self) -> Result<()> {
            if self.0.lock().reject_play {
                return Err(StreamVistaError::Playback("NotAllowedError".into()));
            }
            self.emit(MediaEvent::Play);
            Ok(())
        }

        fn pause(&mut self) {
            self.emit(MediaEvent::Pause);
        }

        fn set_current_time(&mut self, seconds: f64) {
            self.0.lock().position = seconds;
            self.emit(MediaEvent::TimeUpdate(seconds));
        }

        fn set_volume(&mut self, volume: f64) {
            self.0.lock().volume = Some(volume);
            self.emit(MediaEvent::VolumeChange(volume));
        }

        fn set_muted(&mut self, muted: bool) {
            self.0.lock().muted = muted;
        }

        fn request_fullscreen(&mut self) -> Result<()> {
            if self.0.lock().deny_fullscreen {
                return Err(StreamVistaError::Fullscreen("not allowed".into()));
            }
            self.emit(MediaEvent::FullscreenChange(true));
            Ok(())
        }

        fn exit_fullscreen(&mut self) -> Result<()> {
            self.emit(MediaEvent::FullscreenChange(false));
            Ok(())
        }
    }

    fn mount(media: &FakeMedia) -> PlaybackController<FakeMedia> {
        PlaybackController::mount(media.clone(), "https://media/v1.mp4", PlayerOptions::default())
    }

    fn with_duration(media: &FakeMedia, duration: f64, position: f64) -> PlaybackController<FakeMedia> {
        let mut player = mount(media);
        media.emit(MediaEvent::DurationChange(duration));
        media.emit(MediaEvent::TimeUpdate(position));
        player.process_pending();
        player
    }

    #[tokio::test]
    async fn test_mount_starts_paused_with_controls() {
        let media = FakeMedia::default();
        let player = mount(&media);

        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.snapshot(), PlaybackSnapshot::default());
        assert_eq!(media.0.lock().loaded, ["https://media/v1.mp4"]);
    }

    #[tokio::test]
    async fn test_toggle_play() {
        let media = FakeMedia::default();
        let mut player = mount(&media);

        assert_eq!(player.toggle_play(), PlaybackState::Playing);
        player.process_pending();
        assert!(player.snapshot().is_playing);

        assert_eq!(player.toggle_play(), PlaybackState::Paused);
        player.process_pending();
        assert!(!player.snapshot().is_playing);
    }

    #[tokio::test]
    async fn test_autoplay() {
        let media = FakeMedia::default();
        let options = PlayerOptions {
            autoplay: true,
            ..PlayerOptions::default()
        };
        let player = PlaybackController::mount(media.clone(), "https://media/v1.mp4", options);
        assert_eq!(player.state(), PlaybackState::Playing);
    }

    #[tokio::test]
    async fn test_rejected_autoplay_stays_paused() {
        let media = FakeMedia::rejecting_play();
        let options = PlayerOptions {
            autoplay: true,
            ..PlayerOptions::default()
        };
        let mut player = PlaybackController::mount(media.clone(), "https://media/v1.mp4", options);

        assert_eq!(player.state(), PlaybackState::Paused);
        assert_eq!(player.process_pending(), 0);
        assert!(player.show_controls());

        // A later user gesture may still be refused without breaking anything
        assert_eq!(player.toggle_play(), PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_volume_and_mute() {
        let media = FakeMedia::default();
        let mut player = mount(&media);

        player.set_volume(0.0);
        assert!(player.snapshot().is_muted);
        assert!(media.0.lock().muted);

        player.set_volume(0.5);
        let snapshot = player.snapshot();
        assert!(!snapshot.is_muted);
        assert_eq!(snapshot.volume, 0.5);

        player.set_volume(3.0);
        assert_eq!(player.snapshot().volume, 1.0);
    }

    #[tokio::test]
    async fn test_unmute_restores_last_audible_volume() {
        let media = FakeMedia::default();
        let mut player = mount(&media);

        player.set_volume(0.4);
        player.set_volume(0.0);
        assert!(player.snapshot().is_muted);

        player.toggle_mute();
        let snapshot = player.snapshot();
        assert!(!snapshot.is_muted);
        assert_eq!(snapshot.volume, 0.4);
        assert_eq!(media.0.lock().volume, Some(0.4));

        // Muting leaves the volume alone
        player.toggle_mute();
        assert!(player.snapshot().is_muted);
        assert_eq!(player.snapshot().volume, 0.4);
    }

    #[tokio::test]
    async fn test_seek_is_clamped() {
        let media = FakeMedia::default();
        let mut player = with_duration(&media, 100.0, 95.0);

        player.seek(10.0);
        assert_eq!(player.snapshot().current_time, 100.0);
        assert_eq!(media.0.lock().position, 100.0);

        player.seek(-250.0);
        assert_eq!(player.snapshot().current_time, 0.0);
        assert_eq!(player.state(), PlaybackState::Paused);

        player.seek_forward();
        assert_eq!(player.snapshot().current_time, 10.0);
        player.seek_backward();
        assert_eq!(player.snapshot().current_time, 0.0);
    }

    #[tokio::test]
    async fn test_seek_keeps_playing() {
        let media = FakeMedia::default();
        let mut player = with_duration(&media, 100.0, 20.0);
        player.toggle_play();
        player.seek(5.0);
        player.process_pending();
        assert_eq!(player.state(), PlaybackState::Playing);
        assert_eq!(player.snapshot().current_time, 25.0);
    }

    #[tokio::test]
    async fn test_seek_to_fraction() {
        let media = FakeMedia::default();
        let mut player = with_duration(&media, 200.0, 0.0);

        player.seek_to_fraction(0.25);
        assert_eq!(player.snapshot().current_time, 50.0);
        assert_eq!(player.progress_fraction(), 0.25);
        assert_eq!(player.time_label(), "0:50 / 3:20");

        player.seek_to_fraction(1.5);
        assert_eq!(player.snapshot().current_time, 200.0);
        player.seek_to_fraction(-0.5);
        assert_eq!(player.snapshot().current_time, 0.0);
        player.seek_to_fraction(f64::NAN);
        assert_eq!(player.snapshot().current_time, 0.0);
    }

    #[tokio::test]
    async fn test_progress_without_duration() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        player.seek(30.0);
        assert_eq!(player.progress_fraction(), 0.0);
        assert_eq!(player.time_label(), "0:00 / 0:00");
    }

    #[tokio::test]
    async fn test_buffering_follows_resource() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        player.toggle_play();
        player.process_pending();

        media.emit(MediaEvent::Waiting);
        player.process_pending();
        assert_eq!(player.state(), PlaybackState::Buffering);
        assert!(player.snapshot().is_buffering);
        assert!(player.snapshot().is_playing);

        media.emit(MediaEvent::Playing);
        player.process_pending();
        assert_eq!(player.state(), PlaybackState::Playing);
        assert!(!player.snapshot().is_buffering);

        media.emit(MediaEvent::Waiting);
        player.process_pending();
        assert_eq!(player.toggle_play(), PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_waiting_while_paused_is_ignored() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        media.emit(MediaEvent::Waiting);
        player.process_pending();
        assert_eq!(player.state(), PlaybackState::Paused);
    }

    #[tokio::test]
    async fn test_external_fullscreen_exit() {
        let media = FakeMedia::default();
        let mut player = mount(&media);

        assert!(player.toggle_fullscreen());
        player.process_pending();
        assert!(player.snapshot().is_fullscreen);

        // User pressed Escape
        media.emit(MediaEvent::FullscreenChange(false));
        player.process_pending();
        assert!(!player.snapshot().is_fullscreen);

        assert!(player.toggle_fullscreen());
    }

    #[tokio::test]
    async fn test_denied_fullscreen() {
        let media = FakeMedia::default();
        media.0.lock().deny_fullscreen = true;
        let mut player = mount(&media);
        assert!(!player.toggle_fullscreen());
        assert!(!player.snapshot().is_fullscreen);
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_hide_while_playing() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        let start = Instant::now();

        player.toggle_play();
        player.process_pending();
        assert!(player.show_controls());

        let signal = player.next_event().await.unwrap();
        assert!(matches!(signal, Signal::HideControls(_)));
        assert!(!player.show_controls());
        assert!(start.elapsed() >= Duration::from_secs(3));

        player.pointer_activity();
        assert!(player.show_controls());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pointer_activity_restarts_timer() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        let start = Instant::now();
        player.toggle_play();
        player.process_pending();

        advance(Duration::from_secs(2)).await;
        player.pointer_activity();

        // The first timer would have fired at 3s; it was cancelled
        assert!(timeout(Duration::from_millis(2500), player.next_event()).await.is_err());
        assert!(player.show_controls());

        player.next_event().await.unwrap();
        assert!(!player.show_controls());
        assert!(start.elapsed() >= Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_stay_while_paused() {
        let media = FakeMedia::default();
        let mut player = mount(&media);

        player.pointer_activity();
        assert!(timeout(Duration::from_secs(30), player.next_event()).await.is_err());
        assert!(player.show_controls());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_cancels_pending_hide() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        player.toggle_play();
        player.toggle_play();
        player.process_pending();

        assert!(timeout(Duration::from_secs(10), player.next_event()).await.is_err());
        assert!(player.show_controls());
    }

    #[tokio::test(start_paused = true)]
    async fn test_controls_stay_while_buffering() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        player.toggle_play();
        media.emit(MediaEvent::Waiting);
        player.process_pending();

        let signal = player.next_event().await.unwrap();
        assert!(matches!(signal, Signal::HideControls(_)));
        assert!(player.show_controls());
    }

    #[tokio::test]
    async fn test_change_source_resets_and_drops_stale_events() {
        let media = FakeMedia::default();
        let mut player = with_duration(&media, 100.0, 40.0);
        let old_sink = media.0.lock().sink.clone().unwrap();

        player.change_source("https://media/v2.mp4");
        assert!(!old_sink.emit(MediaEvent::DurationChange(999.0)));
        player.process_pending();

        assert_eq!(player.source(), "https://media/v2.mp4");
        assert_eq!(player.snapshot(), PlaybackSnapshot::default());
        let state = media.0.lock();
        assert_eq!(state.loaded, ["https://media/v1.mp4", "https://media/v2.mp4"]);
        assert_eq!(state.detached, 1);
        assert!(state.sink.is_some());
    }

    #[tokio::test]
    async fn test_drop_detaches() {
        let media = FakeMedia::default();
        let mut player = mount(&media);
        player.toggle_play();
        drop(player);

        let state = media.0.lock();
        assert!(state.sink.is_none());
        assert_eq!(state.detached, 1);
    }

    /// Routes timer signals of `player` to a channel owned by the test
    fn observe_timer(player: &mut PlaybackController<FakeMedia>) -> mpsc::UnboundedReceiver<Signal> {
        let (tx, rx) = mpsc::unbounded_channel();
        player.tx = tx;
        rx
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_pending_hide_timer() {
        // While the player lives, the timer fires after the delay
        let media = FakeMedia::default();
        let mut kept = mount(&media);
        let mut kept_signals = observe_timer(&mut kept);
        kept.toggle_play();
        let fired = timeout(Duration::from_secs(4), kept_signals.recv()).await;
        assert!(matches!(fired, Ok(Some(Signal::HideControls(_)))));

        let media = FakeMedia::default();
        let mut player = mount(&media);
        let mut signals = observe_timer(&mut player);
        player.toggle_play();
        assert_eq!(player.state(), PlaybackState::Playing);
        drop(player);

        // Every sender is gone once the aborted timer task is released
        advance(Duration::from_secs(4)).await;
        let after = timeout(Duration::from_secs(1), signals.recv()).await;
        assert!(matches!(after, Ok(None)));
    }
}
