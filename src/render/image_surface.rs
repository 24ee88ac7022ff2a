use compact_str::CompactString;
use image::{
    imageops::{self, FilterType},
    ImageFormat, Pixel as _, Rgba, RgbaImage,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

use super::{Font, Surface};
use crate::content::{Rect, Size};

/// Default width of a char, as a ratio of the font size.
const DEFAULT_ADVANCE: f64 = 0.5;

/// Color of the letterbox bars.
const LETTERBOX: Rgba<u8> = Rgba([0x00, 0x00, 0x00, 0xff]);

/// Something that can provide the decoded frame to display.
pub trait FrameSource {
    /// The frame to display now, if one is decoded.
    fn current_frame(&self) -> Option<&RgbaImage>;
}

impl FrameSource for RgbaImage {
    fn current_frame(&self) -> Option<&RgbaImage> {
        Some(self)
    }
}

/// Handle Error for [`ImageSurface`].
#[derive(Debug, Error)]
pub enum ImageSurfaceError {
    /// The source had no frame to draw.
    #[error("No decoded frame to draw")]
    MissingFrame,

    /// Error during file dump
    #[error("Could not write composited frame '{}'", path.display())]
    Save {
        /// Path of the file write failed
        path: PathBuf,
        /// Error source
        source: image::ImageError,
    },
}

/// A text drawn on an [`ImageSurface`], left for a glyph rasterizer.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    /// The text line.
    pub text: CompactString,
    /// Horizontal center and baseline of the text.
    pub origin: (f64, f64),
    /// Font of the text.
    pub font: Font,
    /// Color of the text.
    pub color: Rgba<u8>,
}

/// A [`Surface`] compositing in memory on an `RGBA` image.
///
/// Frames and backdrops are composited in the image. This surface has no
/// font rasterizer: text is measured with a fixed advance per char and
/// recorded as [`TextRun`]s. Every [`Surface::draw_image`] call starts a new
/// frame, clearing the canvas and the recorded text.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    canvas: RgbaImage,
    advance: f64,
    filter: FilterType,
    text_runs: Vec<TextRun>,
}

impl ImageSurface {
    /// Create a black surface of `width` x `height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, LETTERBOX),
            advance: DEFAULT_ADVANCE,
            filter: FilterType::Triangle,
            text_runs: Vec::new(),
        }
    }

    /// Set the width of a char used to measure text, as a ratio of the font size.
    #[must_use]
    pub const fn with_advance(mut self, advance: f64) -> Self {
        self.advance = advance;
        self
    }

    /// Set the filter used to scale frames.
    #[must_use]
    pub const fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }

    /// The composited image.
    #[must_use]
    pub const fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    /// Texts drawn since the last frame started.
    #[must_use]
    pub fn text_runs(&self) -> &[TextRun] {
        &self.text_runs
    }

    /// Save the composited image in `png` format.
    ///
    /// # Errors
    ///
    /// Will return [`ImageSurfaceError::Save`] if the image could not be written.
    #[profiling::function]
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), ImageSurfaceError> {
        let path = path.as_ref();
        self.canvas
            .save_with_format(path, ImageFormat::Png)
            .map_err(|source| ImageSurfaceError::Save {
                path: path.into(),
                source,
            })
    }

    /// Pixel range covered by `rect`, clipped to the canvas.
    fn pixel_range(&self, rect: &Rect) -> (std::ops::Range<u32>, std::ops::Range<u32>) {
        let clip = |value: f64, max: u32| value.round().clamp(0., f64::from(max)) as u32;
        let (w, h) = self.canvas.dimensions();
        (
            clip(rect.x, w)..clip(rect.right(), w),
            clip(rect.y, h)..clip(rect.bottom(), h),
        )
    }
}

impl<Source> Surface<Source> for ImageSurface
where
    Source: FrameSource + ?Sized,
{
    type Error = ImageSurfaceError;

    fn size(&self) -> Size {
        Size::from(self.canvas.dimensions())
    }

    fn draw_image(&mut self, source: &Source, rect: &Rect) -> Result<(), Self::Error> {
        profiling::scope!("ImageSurface draw_image");
        let frame = source
            .current_frame()
            .ok_or(ImageSurfaceError::MissingFrame)?;

        self.text_runs.clear();
        self.canvas.pixels_mut().for_each(|pixel| *pixel = LETTERBOX);

        let (xs, ys) = self.pixel_range(rect);
        if xs.is_empty() || ys.is_empty() {
            return Ok(());
        }
        let scaled = imageops::resize(frame, xs.end - xs.start, ys.end - ys.start, self.filter);
        imageops::replace(&mut self.canvas, &scaled, i64::from(xs.start), i64::from(ys.start));
        Ok(())
    }

    fn fill_rect(&mut self, rect: &Rect, color: Rgba<u8>) -> Result<(), Self::Error> {
        let (xs, ys) = self.pixel_range(rect);
        for y in ys {
            for x in xs.clone() {
                self.canvas.get_pixel_mut(x, y).blend(&color);
            }
        }
        Ok(())
    }

    fn measure_text(&mut self, text: &str, font: &Font) -> Result<f64, Self::Error> {
        Ok(text.chars().count() as f64 * font.size * self.advance)
    }

    fn fill_text(
        &mut self,
        text: &str,
        origin: (f64, f64),
        font: &Font,
        color: Rgba<u8>,
    ) -> Result<(), Self::Error> {
        self.text_runs.push(TextRun {
            text: text.into(),
            origin,
            font: font.clone(),
            color,
        });
        Ok(())
    }
}
