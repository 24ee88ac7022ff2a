//! Frame-synchronized compositing of the video and its subtitles.
//!
//! The render loop is a repeating task driven by the host display refresh.
//! Each run of the task is bound to a [`SessionHandle`]; stopping the loop
//! only makes the handle stale, and a callback holding a stale handle draws
//! nothing and does not ask for another frame. This way a callback that was
//! already queued when playback paused can't composite over a newer session.
//!
//! ```text
//!  Idle --start--> Scheduled --frame--> Scheduled
//!                     |  ^
//!                   stop start
//!                     v  |
//!                    Stopped
//! ```
mod image_surface;
mod style;
mod surface;

pub use image_surface::{FrameSource, ImageSurface, ImageSurfaceError, TextRun};
pub use style::{single_line, Font, OverlayStyle, DEFAULT_ANCHOR, DEFAULT_FONT_SIZE, DEFAULT_PADDING};
pub use surface::{FrameScheduler, Surface};

use log::{debug, trace, warn};
use std::fmt;

use crate::{
    content::{fit, ContentError, Size, ViewportRect},
    cue::CueIndex,
};

/// Handle of one render session.
///
/// Handles are generation numbers: each new session gets a greater one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionHandle(u64);

impl SessionHandle {
    /// Generation number of the session.
    #[must_use]
    pub const fn generation(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session #{}", self.0)
    }
}

/// State of the render loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    /// No session was ever started.
    Idle,
    /// A session is active, a frame callback is pending.
    Scheduled,
    /// The last session was invalidated.
    Stopped,
}

/// What a frame callback did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The frame was composited and the next one requested.
    Drawn {
        /// Was a subtitle drawn over the frame ?
        subtitle: bool,
    },
    /// Drawing failed, the frame was skipped and the next one requested.
    Skipped,
    /// The handle is stale: nothing was drawn, and nothing requested.
    Stale,
}

/// The active session and what it computed at start.
#[derive(Debug, Clone, Copy)]
struct ActiveSession {
    handle: SessionHandle,
    viewport: ViewportRect,
    canvas: Size,
}

/// What one frame composites, read from the shared state at callback time.
pub struct FrameInput<'a, Source: ?Sized> {
    /// Where the frame is read from.
    pub source: &'a Source,
    /// Cues to look the text up in, if subtitles are loaded.
    pub cues: Option<&'a CueIndex>,
    /// Playback time of the frame, in seconds.
    pub time: f64,
}

/// The repeating frame task.
#[derive(Debug)]
pub struct RenderLoop {
    state: LoopState,
    generation: u64,
    active: Option<ActiveSession>,
    style: OverlayStyle,
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new(OverlayStyle::default())
    }
}

impl RenderLoop {
    /// Create an idle render loop drawing subtitles with `style`.
    #[must_use]
    pub const fn new(style: OverlayStyle) -> Self {
        Self {
            state: LoopState::Idle,
            generation: 0,
            active: None,
            style,
        }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> LoopState {
        self.state
    }

    /// Handle of the active session, if any.
    #[must_use]
    pub fn session(&self) -> Option<SessionHandle> {
        self.active.map(|active| active.handle)
    }

    /// Viewport of the active session, if any.
    #[must_use]
    pub fn viewport(&self) -> Option<ViewportRect> {
        self.active.map(|active| active.viewport)
    }

    /// Style used to draw subtitles.
    #[must_use]
    pub const fn style(&self) -> &OverlayStyle {
        &self.style
    }

    /// Is `handle` the active session ?
    #[must_use]
    pub fn is_current(&self, handle: SessionHandle) -> bool {
        self.session() == Some(handle)
    }

    /// Start a new session and request its first frame.
    ///
    /// Any active session is invalidated first, even if the new one can't start.
    ///
    /// # Errors
    ///
    /// Will return [`ContentError::InvalidDimensions`] if the source or the
    /// canvas has no area. The loop is then left without active session.
    pub fn start<F>(
        &mut self,
        source: Size,
        canvas: Size,
        scheduler: &mut F,
    ) -> Result<SessionHandle, ContentError>
    where
        F: FrameScheduler + ?Sized,
    {
        self.stop();
        let viewport = fit(source, canvas)?;

        self.generation += 1;
        let handle = SessionHandle(self.generation);
        self.active = Some(ActiveSession {
            handle,
            viewport,
            canvas,
        });
        self.state = LoopState::Scheduled;
        debug!("{handle} started, drawing in {viewport:?}");

        scheduler.request_frame(handle);
        Ok(handle)
    }

    /// Invalidate the active session. Pending callbacks become no-ops.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            debug!("{} stopped", active.handle);
            self.state = LoopState::Stopped;
        }
    }

    /// Run the frame callback of `handle`.
    ///
    /// Draw the source frame in the viewport, then the cue text displayed at
    /// `input.time` on its backdrop, and request the next frame. Drawing
    /// errors are logged and skip the frame without stopping the session.
    pub fn frame<Source, S, F>(
        &self,
        handle: SessionHandle,
        input: &FrameInput<'_, Source>,
        surface: &mut S,
        scheduler: &mut F,
    ) -> FrameOutcome
    where
        Source: ?Sized,
        S: Surface<Source> + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        profiling::scope!("RenderLoop frame");

        let Some(active) = self.active.filter(|active| active.handle == handle) else {
            trace!("{handle} is stale, dropping frame");
            return FrameOutcome::Stale;
        };

        let text = input.cues.and_then(|cues| cues.query(input.time));
        let outcome = match self.composite(&active, input.source, text, surface) {
            Ok(()) => FrameOutcome::Drawn {
                subtitle: text.is_some(),
            },
            Err(err) => {
                warn!("{handle}: skipping frame at {:.3}s: {err}", input.time);
                FrameOutcome::Skipped
            }
        };

        scheduler.request_frame(handle);
        outcome
    }

    fn composite<Source, S>(
        &self,
        active: &ActiveSession,
        source: &Source,
        text: Option<&str>,
        surface: &mut S,
    ) -> Result<(), S::Error>
    where
        Source: ?Sized,
        S: Surface<Source> + ?Sized,
    {
        surface.draw_image(source, &active.viewport)?;

        if let Some(text) = text {
            let style = &self.style;
            let line = single_line(text);
            let width = surface.measure_text(&line, &style.font)?;
            surface.fill_rect(&style.backdrop(width, active.canvas), style.backdrop_color)?;
            surface.fill_text(
                &line,
                style.text_origin(active.canvas),
                &style.font,
                style.text_color,
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{content::Rect, cue::SubtitleCue};
    use image::Rgba;
    use std::collections::VecDeque;
    use thiserror::Error;

    /// Scheduler keeping requests in a queue, like a display refresh would.
    #[derive(Debug, Default)]
    pub struct QueueScheduler {
        pub pending: VecDeque<SessionHandle>,
    }

    impl FrameScheduler for QueueScheduler {
        fn request_frame(&mut self, session: SessionHandle) {
            self.pending.push_back(session);
        }
    }

    /// A drawing call received by [`RecordingSurface`].
    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        Image(Rect),
        Rect(Rect, Rgba<u8>),
        Text(String, (f64, f64)),
    }

    #[derive(Debug, Error)]
    #[error("surface lost")]
    pub struct SurfaceLost;

    /// Surface recording calls, measuring 10 pixels per char.
    #[derive(Debug)]
    pub struct RecordingSurface {
        pub size: Size,
        pub calls: Vec<Call>,
        pub fail_images: bool,
    }

    impl RecordingSurface {
        pub fn new(w: f64, h: f64) -> Self {
            Self {
                size: Size::new(w, h),
                calls: Vec::new(),
                fail_images: false,
            }
        }

        pub fn texts(&self) -> Vec<&str> {
            self.calls
                .iter()
                .filter_map(|call| match call {
                    Call::Text(text, _) => Some(text.as_str()),
                    _ => None,
                })
                .collect()
        }
    }

    impl<Source: ?Sized> Surface<Source> for RecordingSurface {
        type Error = SurfaceLost;

        fn size(&self) -> Size {
            self.size
        }

        fn draw_image(&mut self, _: &Source, rect: &Rect) -> Result<(), SurfaceLost> {
            if self.fail_images {
                return Err(SurfaceLost);
            }
            self.calls.push(Call::Image(*rect));
            Ok(())
        }

        fn fill_rect(&mut self, rect: &Rect, color: Rgba<u8>) -> Result<(), SurfaceLost> {
            self.calls.push(Call::Rect(*rect, color));
            Ok(())
        }

        fn measure_text(&mut self, text: &str, _: &Font) -> Result<f64, SurfaceLost> {
            Ok(text.chars().count() as f64 * 10.)
        }

        fn fill_text(
            &mut self,
            text: &str,
            origin: (f64, f64),
            _: &Font,
            _: Rgba<u8>,
        ) -> Result<(), SurfaceLost> {
            self.calls.push(Call::Text(text.to_owned(), origin));
            Ok(())
        }
    }

    fn input<'a>(cues: &'a CueIndex, time: f64) -> FrameInput<'a, ()> {
        FrameInput {
            source: &(),
            cues: Some(cues),
            time,
        }
    }

    fn cues() -> CueIndex {
        CueIndex::build([
            SubtitleCue::new(0., 10., "A").unwrap(),
            SubtitleCue::new(5., 15., "B").unwrap(),
        ])
    }

    #[test]
    fn start_computes_viewport_and_schedules() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        assert_eq!(render.state(), LoopState::Idle);

        let handle = render
            .start(Size::new(1920., 1080.), Size::new(800., 600.), &mut scheduler)
            .unwrap();

        assert_eq!(render.state(), LoopState::Scheduled);
        assert_eq!(scheduler.pending, [handle]);
        assert_eq!(render.viewport(), Some(Rect::new(0., 75., 800., 450.)));
    }

    #[test]
    fn frame_composites_video_backdrop_and_text() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        let mut surface = RecordingSurface::new(800., 600.);
        let cues = cues();
        let handle = render
            .start(Size::new(1920., 1080.), surface.size, &mut scheduler)
            .unwrap();
        scheduler.pending.clear();

        let outcome = render.frame(handle, &input(&cues, 7.), &mut surface, &mut scheduler);

        assert_eq!(outcome, FrameOutcome::Drawn { subtitle: true });
        assert_eq!(scheduler.pending, [handle]);
        let style = render.style();
        assert_eq!(
            surface.calls,
            [
                Call::Image(Rect::new(0., 75., 800., 450.)),
                Call::Rect(Rect::new(390., 486., 20., 34.), style.backdrop_color),
                Call::Text("A".into(), (400., 510.)),
            ]
        );
    }

    #[test]
    fn frame_without_cue_draws_only_video() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        let mut surface = RecordingSurface::new(800., 600.);
        let cues = cues();
        let handle = render
            .start(Size::new(640., 480.), surface.size, &mut scheduler)
            .unwrap();

        let outcome = render.frame(handle, &input(&cues, 20.), &mut surface, &mut scheduler);
        assert_eq!(outcome, FrameOutcome::Drawn { subtitle: false });
        assert_eq!(surface.calls.len(), 1);

        let no_cues = FrameInput {
            source: &(),
            cues: None,
            time: 7.,
        };
        let outcome = render.frame(handle, &no_cues, &mut surface, &mut scheduler);
        assert_eq!(outcome, FrameOutcome::Drawn { subtitle: false });
    }

    #[test]
    fn stale_frame_is_a_no_op() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        let mut surface = RecordingSurface::new(800., 600.);
        let cues = cues();
        let handle = render
            .start(Size::new(640., 480.), surface.size, &mut scheduler)
            .unwrap();
        render.stop();
        assert_eq!(render.state(), LoopState::Stopped);
        scheduler.pending.clear();

        let outcome = render.frame(handle, &input(&cues, 7.), &mut surface, &mut scheduler);
        assert_eq!(outcome, FrameOutcome::Stale);
        assert!(surface.calls.is_empty());
        assert!(scheduler.pending.is_empty());
    }

    #[test]
    fn restart_before_first_frame_keeps_one_session() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        let mut surface = RecordingSurface::new(800., 600.);
        let cues = cues();
        let source = Size::new(640., 480.);

        let first = render.start(source, surface.size, &mut scheduler).unwrap();
        render.stop();
        let second = render.start(source, surface.size, &mut scheduler).unwrap();
        assert_ne!(first, second);
        assert_eq!(scheduler.pending, [first, second]);

        // run a few display refreshes
        let mut drawing = Vec::new();
        for _ in 0..5 {
            let Some(handle) = scheduler.pending.pop_front() else {
                break;
            };
            let outcome = render.frame(handle, &input(&cues, 7.), &mut surface, &mut scheduler);
            if outcome != FrameOutcome::Stale {
                drawing.push(handle);
            }
            assert!(scheduler.pending.len() <= 1);
        }
        assert_eq!(drawing, [second; 4]);
    }

    #[test]
    fn start_with_degenerate_source_stops_previous_session() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        render
            .start(Size::new(640., 480.), Size::new(800., 600.), &mut scheduler)
            .unwrap();

        let err = render
            .start(Size::new(0., 0.), Size::new(800., 600.), &mut scheduler)
            .unwrap_err();
        assert!(matches!(err, ContentError::InvalidDimensions { .. }));
        assert_eq!(render.state(), LoopState::Stopped);
        assert_eq!(render.session(), None);
        assert_eq!(scheduler.pending.len(), 1);
    }

    #[test]
    fn failing_frame_keeps_scheduling() {
        let mut render = RenderLoop::default();
        let mut scheduler = QueueScheduler::default();
        let mut surface = RecordingSurface::new(800., 600.);
        surface.fail_images = true;
        let cues = cues();
        let handle = render
            .start(Size::new(640., 480.), surface.size, &mut scheduler)
            .unwrap();
        scheduler.pending.clear();

        let outcome = render.frame(handle, &input(&cues, 7.), &mut surface, &mut scheduler);
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(scheduler.pending, [handle]);
        assert_eq!(render.state(), LoopState::Scheduled);

        surface.fail_images = false;
        let outcome = render.frame(handle, &input(&cues, 7.), &mut surface, &mut scheduler);
        assert_eq!(outcome, FrameOutcome::Drawn { subtitle: true });
    }
}
