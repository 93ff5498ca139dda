//! Playback resource boundary
//!
//! A media element (browser `<video>`, mpv, a test double) is driven through
//! [`MediaResource`] commands and reports back through a [`MediaEventSink`].

use crate::error::Result;
use tokio::sync::mpsc::UnboundedSender;

/// Events a media resource reports about itself
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEvent {
    /// Playback started or resumed
    Play,
    /// Playback paused
    Pause,
    /// Duration became known or changed, in seconds
    DurationChange(f64),
    /// Playback position moved, in seconds
    TimeUpdate(f64),
    /// Volume changed, in `[0, 1]`
    VolumeChange(f64),
    /// Playback stalled waiting for data
    Waiting,
    /// Data is flowing again and playback continues
    Playing,
    /// The presentation surface entered or left fullscreen, by any path
    FullscreenChange(bool),
}

/// Everything the playback controller reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Signal {
    Media(MediaEvent),
    /// The controls-hide timer with this generation fired
    HideControls(u64),
}

/// Write end handed to a resource on attach
///
/// It can only carry [`MediaEvent`]s, so a resource cannot forge timer
/// signals.
#[derive(Debug, Clone)]
pub struct MediaEventSink {
    tx: UnboundedSender<Signal>,
}

impl MediaEventSink {
    pub(crate) fn new(tx: UnboundedSender<Signal>) -> Self {
        Self { tx }
    }

    /// Report an event; returns false once the controller is gone
    pub fn emit(&self, event: MediaEvent) -> bool {
        self.tx.send(Signal::Media(event)).is_ok()
    }
}

/// A playable media element
pub trait MediaResource {
    /// Start reporting events to `sink`
    fn attach(&mut self, sink: MediaEventSink);
    /// Stop reporting events
    fn detach(&mut self);
    /// Point the resource at a new media URL
    fn load(&mut self, url: &str);

    /// Start playback; the platform may refuse (e.g. autoplay policy)
    fn play(&mut self) -> Result<()>;
    fn pause(&mut self);
    fn set_current_time(&mut self, seconds: f64);
    fn set_volume(&mut self, volume: f64);
    fn set_muted(&mut self, muted: bool);

    fn request_fullscreen(&mut self) -> Result<()>;
    fn exit_fullscreen(&mut self) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[test]
    fn test_sink_reports_closed_controller() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let sink = MediaEventSink::new(tx);

        assert!(sink.emit(MediaEvent::Waiting));
        assert_eq!(rx.try_recv().unwrap(), Signal::Media(MediaEvent::Waiting));

        drop(rx);
        assert!(!sink.emit(MediaEvent::Playing));
    }
}
