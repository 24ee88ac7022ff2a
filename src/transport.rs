//! Play/pause and seek-bar handling.
use log::{debug, trace};

use crate::media::{known_duration, MediaSource};

/// Playback state as last reported by the media source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackState {
    /// Playback position, in seconds.
    pub current_time: f64,
    /// Length of the media in seconds, if known.
    pub duration: Option<f64>,
    /// Is the media playing ? Only changed by play/pause notifications.
    pub is_playing: bool,
}

impl PlaybackState {
    /// State of a paused media at its start, with unknown duration.
    pub const PAUSED: Self = Self {
        current_time: 0.,
        duration: None,
        is_playing: false,
    };
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::PAUSED
    }
}

/// Progress of `current_time` in `duration`, in percent.
///
/// Return `0` if the duration is unknown or zero.
#[must_use]
pub fn progress_percent(current_time: f64, duration: Option<f64>) -> f64 {
    match known_duration(duration) {
        Some(duration) if duration > 0. => {
            let percent = current_time / duration * 100.;
            if percent.is_finite() {
                percent
            } else {
                0.
            }
        }
        _ => 0.,
    }
}

/// Fraction of a seek bar at a click `offset` from its left edge.
///
/// Return `None` if the bar has no width.
#[must_use]
pub fn fraction_at(offset: f64, bar_width: f64) -> Option<f64> {
    (bar_width > 0. && bar_width.is_finite() && offset.is_finite())
        .then(|| (offset / bar_width).clamp(0., 1.))
}

/// Translate user intents into media requests, and media notifications into
/// the playback state and the seek-bar indicator.
#[derive(Debug, Clone, Default)]
pub struct Transport {
    state: PlaybackState,
    ready: bool,
    progress: f64,
}

impl Transport {
    /// Create a transport for a media not ready yet.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: PlaybackState::PAUSED,
            ready: false,
            progress: 0.,
        }
    }

    /// Playback state.
    #[must_use]
    pub const fn state(&self) -> PlaybackState {
        self.state
    }

    /// Seek-bar indicator value, in percent.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.progress
    }

    /// Has the media reported it can play ?
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Seek to `fraction` of the media duration.
    ///
    /// The fraction is clamped in `[0, 1]`. Nothing happens if the duration
    /// is unknown or the fraction is `NaN`. Return the new position.
    pub fn seek<M>(&mut self, media: &mut M, fraction: f64) -> Option<f64>
    where
        M: MediaSource + ?Sized,
    {
        let Some(duration) = known_duration(media.duration()) else {
            debug!("seek ignored: unknown duration");
            return None;
        };
        if fraction.is_nan() {
            return None;
        }

        let time = fraction.clamp(0., 1.) * duration;
        media.set_current_time(time);
        self.state.current_time = time;
        self.state.duration = Some(duration);
        self.progress = progress_percent(time, Some(duration));
        debug!("seek to {time:.3}s");
        Some(time)
    }

    /// Ask the media to pause if it plays, or to play if it is paused.
    ///
    /// The playback state only changes once the media confirms. Ignored
    /// until the media can play. Return `true` if a request was sent.
    pub fn toggle_playback<M>(&self, media: &mut M) -> bool
    where
        M: MediaSource + ?Sized,
    {
        if !self.ready {
            debug!("toggle ignored: media not ready");
            return false;
        }
        if self.state.is_playing {
            media.request_pause();
        } else {
            media.request_play();
        }
        true
    }

    /// The media can play.
    pub fn on_can_play<M>(&mut self, media: &M)
    where
        M: MediaSource + ?Sized,
    {
        self.ready = true;
        self.state.duration = known_duration(media.duration());
    }

    /// The media confirmed it plays (`true`) or is paused (`false`).
    pub fn on_playing(&mut self, is_playing: bool) {
        self.state.is_playing = is_playing;
    }

    /// The playback position changed: refresh the state and publish the progress.
    pub fn on_time_update<M>(&mut self, media: &M) -> f64
    where
        M: MediaSource + ?Sized,
    {
        self.state.current_time = media.current_time();
        self.state.duration = known_duration(media.duration());
        self.progress = progress_percent(self.state.current_time, self.state.duration);
        trace!("time update {:.3}s ({:.1}%)", self.state.current_time, self.progress);
        self.progress
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::content::Size;

    /// Media source recording requests, confirmed by hand in tests.
    #[derive(Debug)]
    pub struct FakeMedia {
        pub time: f64,
        pub duration: Option<f64>,
        pub size: Size,
        pub play_requests: usize,
        pub pause_requests: usize,
    }

    impl FakeMedia {
        pub fn new(duration: Option<f64>) -> Self {
            Self {
                time: 0.,
                duration,
                size: Size::new(1920., 1080.),
                play_requests: 0,
                pause_requests: 0,
            }
        }
    }

    impl MediaSource for FakeMedia {
        fn current_time(&self) -> f64 {
            self.time
        }
        fn set_current_time(&mut self, time: f64) {
            self.time = time;
        }
        fn duration(&self) -> Option<f64> {
            self.duration
        }
        fn natural_size(&self) -> Size {
            self.size
        }
        fn request_play(&mut self) {
            self.play_requests += 1;
        }
        fn request_pause(&mut self) {
            self.pause_requests += 1;
        }
    }

    #[test]
    fn seek_to_fraction() {
        let mut transport = Transport::default();
        let mut media = FakeMedia::new(Some(200.));

        assert_eq!(transport.seek(&mut media, 0.25), Some(50.));
        assert_eq!(media.time, 50.);
        assert_eq!(transport.state().current_time, 50.);
        assert_eq!(transport.progress(), 25.);

        assert_eq!(transport.seek(&mut media, 1.5), Some(200.));
        assert_eq!(transport.seek(&mut media, -1.), Some(0.));
    }

    #[test]
    fn seek_without_duration_is_a_no_op() {
        let mut transport = Transport::default();
        for duration in [None, Some(f64::NAN), Some(f64::INFINITY)] {
            let mut media = FakeMedia::new(duration);
            media.time = 3.;
            assert_eq!(transport.seek(&mut media, 0.5), None);
            assert_eq!(media.time, 3.);
        }

        let mut media = FakeMedia::new(Some(10.));
        assert_eq!(transport.seek(&mut media, f64::NAN), None);
        assert_eq!(media.time, 0.);
    }

    #[test]
    fn toggle_waits_for_confirmation() {
        let mut transport = Transport::default();
        let mut media = FakeMedia::new(Some(10.));

        assert!(!transport.toggle_playback(&mut media));
        assert_eq!(media.play_requests, 0);

        transport.on_can_play(&media);
        assert!(transport.toggle_playback(&mut media));
        assert_eq!(media.play_requests, 1);
        assert!(!transport.state().is_playing);

        // still paused until confirmed: a second toggle asks to play again
        assert!(transport.toggle_playback(&mut media));
        assert_eq!(media.play_requests, 2);

        transport.on_playing(true);
        assert!(transport.toggle_playback(&mut media));
        assert_eq!(media.pause_requests, 1);
        assert!(transport.state().is_playing);

        transport.on_playing(false);
        assert!(!transport.state().is_playing);
    }

    #[test]
    fn time_update_publishes_progress() {
        let mut transport = Transport::default();
        let mut media = FakeMedia::new(Some(40.));
        media.time = 10.;
        assert_eq!(transport.on_time_update(&media), 25.);
        assert_eq!(transport.progress(), 25.);

        media.duration = None;
        assert_eq!(transport.on_time_update(&media), 0.);
        media.duration = Some(0.);
        assert_eq!(transport.on_time_update(&media), 0.);
        media.duration = Some(f64::NAN);
        assert_eq!(transport.on_time_update(&media), 0.);
    }

    #[test]
    fn click_fraction() {
        assert_eq!(fraction_at(50., 200.), Some(0.25));
        assert_eq!(fraction_at(250., 200.), Some(1.));
        assert_eq!(fraction_at(-5., 200.), Some(0.));
        assert_eq!(fraction_at(5., 0.), None);
    }
}
