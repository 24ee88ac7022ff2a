//! Interface to the media element playing the video.
use crate::content::Size;

/// The video being played, as seen by the overlay.
///
/// Decoding and buffering are handled by the implementor. Play and pause
/// requests are asynchronous: the state change is confirmed later with a
/// [`MediaEvent::Play`] or [`MediaEvent::Pause`] notification.
pub trait MediaSource {
    /// Current playback position, in seconds.
    fn current_time(&self) -> f64;

    /// Move the playback position, in seconds.
    fn set_current_time(&mut self, time: f64);

    /// Length of the media in seconds, `None` while it is unknown.
    fn duration(&self) -> Option<f64>;

    /// Natural size of the video frames.
    fn natural_size(&self) -> Size;

    /// Ask the media to start playing.
    fn request_play(&mut self);

    /// Ask the media to pause.
    fn request_pause(&mut self);
}

/// Notifications sent by a media source, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaEvent {
    /// Enough data is loaded to start playing.
    CanPlay,
    /// Playback started.
    Play,
    /// Playback paused.
    Pause,
    /// Playback reached the end of the media.
    Ended,
    /// The playback position changed.
    TimeUpdate,
}

/// Duration as a usable number of seconds.
///
/// Media elements report `NaN` before metadata is loaded and infinity for
/// live streams, neither can be used to seek or to compute a progress.
#[must_use]
pub fn known_duration(duration: Option<f64>) -> Option<f64> {
    duration.filter(|duration| duration.is_finite() && *duration >= 0.)
}
