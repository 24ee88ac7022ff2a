//! This crate draws time-synchronized subtitles over a video rendered on a canvas.
//!
//! `SubRip` subtitles are parsed into cues on a timeline in seconds, indexed
//! for point lookups, and composited every display refresh over the
//! letterboxed video frame, on a translucent backdrop.
//!
//! The host provides the media element ([`MediaSource`]), the canvas
//! ([`Surface`]) and the display refresh hook ([`FrameScheduler`]), and
//! forwards media notifications to a [`Player`].
//!
//! ```no_run
//! # fn host<M, S, F>(mut player: subcanvas::Player<M, S, F>) -> Result<(), subcanvas::OverlayError>
//! # where M: subcanvas::MediaSource, S: subcanvas::Surface<M>, F: subcanvas::FrameScheduler {
//! use subcanvas::MediaEvent;
//!
//! player.load_subtitle_file("movie.srt")?;
//! player.handle_event(MediaEvent::CanPlay)?;
//! player.toggle_playback();
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

pub mod content;
pub mod cue;
mod errors;
pub mod media;
mod parse;
mod player;
pub mod render;
pub mod srt;
pub mod time;
pub mod transport;

pub use content::{fit, Rect, Size, ViewportRect};
pub use cue::{CueIndex, SubtitleCue};
pub use errors::OverlayError;
pub use media::{MediaEvent, MediaSource};
pub use parse::NomError;
pub use player::Player;
pub use render::{FrameOutcome, FrameScheduler, OverlayStyle, SessionHandle, Surface};
pub use time::normalize;
pub use transport::PlaybackState;
