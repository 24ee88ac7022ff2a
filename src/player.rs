//! The player: media, surface, subtitles and render loop threaded together.
//!
//! The host forwards its media notifications to [`Player::handle_event`]
//! and its display refresh callbacks to [`Player::on_frame`].
use log::{debug, error, info};
use std::{mem, path::Path, rc::Rc};

use crate::{
    cue::CueIndex,
    media::{MediaEvent, MediaSource},
    render::{
        FrameInput, FrameOutcome, FrameScheduler, LoopState, OverlayStyle, RenderLoop,
        SessionHandle, Surface,
    },
    srt,
    transport::{PlaybackState, Transport},
    OverlayError,
};

/// A video with subtitles composited on a surface.
#[derive(Debug)]
pub struct Player<M, S, F> {
    media: M,
    surface: S,
    scheduler: F,
    cues: Option<Rc<CueIndex>>,
    render: RenderLoop,
    transport: Transport,
}

impl<M, S, F> Player<M, S, F>
where
    M: MediaSource,
    S: Surface<M>,
    F: FrameScheduler,
{
    /// Create a paused player, without subtitles.
    #[must_use]
    pub const fn new(media: M, surface: S, scheduler: F, style: OverlayStyle) -> Self {
        Self {
            media,
            surface,
            scheduler,
            cues: None,
            render: RenderLoop::new(style),
            transport: Transport::new(),
        }
    }

    /// Parse `SubRip` content and use it as subtitles.
    ///
    /// Return the number of cues loaded. On error, the previous subtitles stay
    /// in use.
    ///
    /// # Errors
    ///
    /// Will return [`OverlayError::Srt`] if the content is not valid `SubRip`.
    #[profiling::function]
    pub fn load_subtitles(&mut self, content: &str) -> Result<usize, OverlayError> {
        let cues = srt::parse(content)
            .inspect_err(|err| error!("subtitles not loaded: {err}"))?;
        Ok(self.publish(CueIndex::build(cues)))
    }

    /// Open a `*.srt` file and use it as subtitles.
    ///
    /// # Errors
    ///
    /// Will return [`OverlayError::Srt`] if the file can't be read or is not valid `SubRip`.
    pub fn load_subtitle_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, OverlayError> {
        let path = path.as_ref();
        let cues = srt::open(path)
            .inspect_err(|err| error!("subtitles '{}' not loaded: {err}", path.display()))?;
        Ok(self.publish(CueIndex::build(cues)))
    }

    fn publish(&mut self, index: CueIndex) -> usize {
        let count = index.len();
        self.cues = Some(Rc::new(index));
        info!("{count} subtitle cues loaded");
        count
    }

    /// Replace the media source, and return the previous one.
    ///
    /// The render session is stopped and the playback state reset: the new
    /// media has to report it can play, then start playing.
    pub fn load_media(&mut self, media: M) -> M {
        self.render.stop();
        self.transport = Transport::new();
        debug!("media replaced");
        mem::replace(&mut self.media, media)
    }

    /// Apply a media notification.
    ///
    /// # Errors
    ///
    /// Will return [`OverlayError::Content`] on [`MediaEvent::Play`] if the
    /// video or the surface has no area. Playback is then considered started,
    /// but nothing is rendered.
    pub fn handle_event(&mut self, event: MediaEvent) -> Result<(), OverlayError> {
        debug!("media event {event:?}");
        match event {
            MediaEvent::CanPlay => self.transport.on_can_play(&self.media),
            MediaEvent::Play => {
                self.transport.on_playing(true);
                let canvas = self.surface.size();
                let source = self.media.natural_size();
                self.render
                    .start(source, canvas, &mut self.scheduler)
                    .inspect_err(|err| {
                        error!("playback not rendered, video {}x{}: {err}", source.w, source.h);
                    })?;
            }
            MediaEvent::Pause | MediaEvent::Ended => {
                self.transport.on_playing(false);
                self.render.stop();
            }
            MediaEvent::TimeUpdate => {
                self.transport.on_time_update(&self.media);
            }
        }
        Ok(())
    }

    /// Run the frame callback requested for `handle`.
    pub fn on_frame(&mut self, handle: SessionHandle) -> FrameOutcome {
        let cues = self.cues.clone();
        let input = FrameInput {
            source: &self.media,
            cues: cues.as_deref(),
            time: self.transport.state().current_time,
        };
        self.render
            .frame(handle, &input, &mut self.surface, &mut self.scheduler)
    }

    /// Ask the media to play or pause.
    ///
    /// Return `false` if the media can't play yet.
    pub fn toggle_playback(&mut self) -> bool {
        self.transport.toggle_playback(&mut self.media)
    }

    /// Seek to `fraction` of the media duration, return the new position.
    pub fn seek(&mut self, fraction: f64) -> Option<f64> {
        self.transport.seek(&mut self.media, fraction)
    }

    /// Seek to the position of a click on a seek bar.
    pub fn seek_at(&mut self, offset: f64, bar_width: f64) -> Option<f64> {
        crate::transport::fraction_at(offset, bar_width).and_then(|fraction| self.seek(fraction))
    }
}

impl<M, S, F> Player<M, S, F> {
    /// Playback state.
    #[must_use]
    pub const fn playback(&self) -> PlaybackState {
        self.transport.state()
    }

    /// Seek-bar indicator value, in percent.
    #[must_use]
    pub const fn progress(&self) -> f64 {
        self.transport.progress()
    }

    /// Loaded subtitles, if any.
    #[must_use]
    pub fn cues(&self) -> Option<&CueIndex> {
        self.cues.as_deref()
    }

    /// State of the render loop.
    #[must_use]
    pub const fn render_state(&self) -> LoopState {
        self.render.state()
    }

    /// Handle of the active render session.
    #[must_use]
    pub fn session(&self) -> Option<SessionHandle> {
        self.render.session()
    }

    /// The media source.
    #[must_use]
    pub const fn media(&self) -> &M {
        &self.media
    }

    /// The surface drawn on.
    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    /// The frame scheduler.
    #[must_use]
    pub const fn scheduler(&self) -> &F {
        &self.scheduler
    }

    /// Mutable access to the frame scheduler, to drain its requests.
    pub fn scheduler_mut(&mut self) -> &mut F {
        &mut self.scheduler
    }
}
