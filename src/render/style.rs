use compact_str::CompactString;
use image::Rgba;
use std::fmt;

use crate::content::{Rect, Size};

/// Default font size of subtitles, in pixels.
pub const DEFAULT_FONT_SIZE: f64 = 24.;

/// Default horizontal padding around the subtitle text, in pixels.
pub const DEFAULT_PADDING: f64 = 10.;

/// Default vertical position of the text baseline, as a ratio of the canvas height.
pub const DEFAULT_ANCHOR: f64 = 0.85;

/// Font used to draw subtitles.
#[derive(Debug, Clone, PartialEq)]
pub struct Font {
    /// Font weight keyword, like `normal` or `bold`.
    pub weight: CompactString,
    /// Font size in pixels, also used as line height.
    pub size: f64,
    /// Font family name.
    pub family: CompactString,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            weight: "normal".into(),
            size: DEFAULT_FONT_SIZE,
            family: "Arial".into(),
        }
    }
}

/// Css shorthand form, like `normal 24px Arial`.
impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}px {}", self.weight, self.size, self.family)
    }
}

/// How subtitles are drawn over the video.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    /// Font of the text.
    pub font: Font,
    /// Color of the text.
    pub text_color: Rgba<u8>,
    /// Color of the rectangle drawn behind the text.
    pub backdrop_color: Rgba<u8>,
    /// Extra width and height of the backdrop around the text.
    pub padding: f64,
    /// Vertical position of the text baseline, as a ratio of the canvas height.
    pub anchor: f64,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            font: Font::default(),
            text_color: Rgba([0xff, 0xff, 0xff, 0xff]),
            // black at 70% opacity
            backdrop_color: Rgba([0x00, 0x00, 0x00, 0xb3]),
            padding: DEFAULT_PADDING,
            anchor: DEFAULT_ANCHOR,
        }
    }
}

impl OverlayStyle {
    /// Position of the text anchor: horizontally centered, at `anchor` of the height.
    #[must_use]
    pub fn text_origin(&self, canvas: Size) -> (f64, f64) {
        (canvas.w / 2., canvas.h * self.anchor)
    }

    /// Rectangle drawn behind a text of `text_width` pixels.
    ///
    /// It is centered on the text, starts one line height above the
    /// baseline and is `padding` wider and taller than the text line.
    #[must_use]
    pub fn backdrop(&self, text_width: f64, canvas: Size) -> Rect {
        let (center, baseline) = self.text_origin(canvas);
        Rect::new(
            center - text_width / 2. - self.padding / 2.,
            baseline - self.font.size,
            text_width + self.padding,
            self.font.size + self.padding,
        )
    }
}

/// Join the lines of a cue text in a single line.
///
/// Only one centered line is drawn, so line breaks become spaces.
#[must_use]
pub fn single_line(text: &str) -> CompactString {
    let mut line = CompactString::default();
    for part in text.lines().map(str::trim).filter(|part| !part.is_empty()) {
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(part);
    }
    line
}
