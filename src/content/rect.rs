use super::{ContentError, Size};

/// A rectangle on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width of the rectangle.
    pub width: f64,
    /// Height of the rectangle.
    pub height: f64,
}

/// Where a video frame is drawn on the canvas.
pub type ViewportRect = Rect;

impl Rect {
    /// Create a `Rect` from its top-left corner and its size.
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rightmost edge.
    #[must_use]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// The bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// The center point, as `(x, y)`.
    #[must_use]
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2., self.y + self.height / 2.)
    }

    /// Is this rectangle inside a canvas of size `size`, allowing `epsilon` of rounding error ?
    #[must_use]
    pub fn is_inside(&self, size: Size, epsilon: f64) -> bool {
        self.x >= -epsilon
            && self.y >= -epsilon
            && self.right() <= size.w + epsilon
            && self.bottom() <= size.h + epsilon
    }
}

impl TryFrom<Size> for Rect {
    type Error = ContentError;

    /// A rectangle covering a whole canvas of the given size.
    fn try_from(size: Size) -> Result<Self, Self::Error> {
        check(size)?;
        Ok(Self::new(0., 0., size.w, size.h))
    }
}

fn check(size: Size) -> Result<(), ContentError> {
    if size.is_drawable() {
        Ok(())
    } else {
        Err(ContentError::InvalidDimensions {
            width: size.w,
            height: size.h,
        })
    }
}

/// Letterbox a `source` frame into a `dest` canvas.
///
/// The frame is scaled by the ratio of the limiting dimension, so it keeps
/// its aspect ratio and fits entirely in the canvas, then centered.
///
/// # Errors
///
/// Will return [`ContentError::InvalidDimensions`] if either size is zero,
/// negative or not finite.
#[profiling::function]
pub fn fit(source: Size, dest: Size) -> Result<ViewportRect, ContentError> {
    check(source)?;
    check(dest)?;

    let scale = f64::min(dest.w / source.w, dest.h / source.h);
    let width = source.w * scale;
    let height = source.h * scale;
    Ok(Rect::new(
        dest.w / 2. - width / 2.,
        dest.h / 2. - height / 2.,
        width,
        height,
    ))
}
