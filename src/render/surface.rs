use image::Rgba;
use std::error::Error;

use super::{style::Font, SessionHandle};
use crate::content::{Rect, Size};

/// A canvas the render loop composites on.
///
/// `Source` is the type frames are drawn from, usually the media source.
/// The render loop is the only writer of a surface.
pub trait Surface<Source: ?Sized> {
    /// Error returned by drawing operations.
    type Error: Error;

    /// Size of the canvas in pixels. Considered fixed for a render session.
    fn size(&self) -> Size;

    /// Draw the current frame of `source` scaled into `rect`.
    ///
    /// # Errors
    /// Return an error if the frame can't be drawn.
    fn draw_image(&mut self, source: &Source, rect: &Rect) -> Result<(), Self::Error>;

    /// Fill `rect` with `color`, blending it over what is already drawn.
    ///
    /// # Errors
    /// Return an error if the rectangle can't be drawn.
    fn fill_rect(&mut self, rect: &Rect, color: Rgba<u8>) -> Result<(), Self::Error>;

    /// Width in pixels of `text` drawn with `font`.
    ///
    /// # Errors
    /// Return an error if the text can't be measured.
    fn measure_text(&mut self, text: &str, font: &Font) -> Result<f64, Self::Error>;

    /// Draw `text` horizontally centered on `origin.0`, with its baseline at `origin.1`.
    ///
    /// # Errors
    /// Return an error if the text can't be drawn.
    fn fill_text(
        &mut self,
        text: &str,
        origin: (f64, f64),
        font: &Font,
        color: Rgba<u8>,
    ) -> Result<(), Self::Error>;
}

/// Host hook to run a frame callback at the next display refresh.
///
/// The host must call [`crate::Player::on_frame`] with the handle once the
/// display refreshed. Several requests may be pending at the same time, the
/// stale ones are dropped by the render loop.
pub trait FrameScheduler {
    /// Request one callback for `session`.
    fn request_frame(&mut self, session: SessionHandle);
}
