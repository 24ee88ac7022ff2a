/// The dimensions of a frame or of a canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    /// Width in pixels.
    pub w: f64,
    /// Height in pixels.
    pub h: f64,
}

impl Size {
    /// Create a `Size` from a width and a height.
    #[must_use]
    pub const fn new(w: f64, h: f64) -> Self {
        Self { w, h }
    }

    /// Does this size cover a non-empty, finite area ?
    #[must_use]
    pub fn is_drawable(self) -> bool {
        self.w.is_finite() && self.h.is_finite() && self.w > 0. && self.h > 0.
    }

    /// Size of the pixel buffer backing a canvas laid out at this size
    /// on a screen with the given device pixel ratio.
    ///
    /// A ratio that is not a strictly positive number is read as `1`.
    #[must_use]
    pub fn scaled(self, device_pixel_ratio: f64) -> Self {
        let ratio = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0. {
            device_pixel_ratio
        } else {
            1.
        };
        Self {
            w: self.w * ratio,
            h: self.h * ratio,
        }
    }
}

impl From<(u32, u32)> for Size {
    fn from((w, h): (u32, u32)) -> Self {
        Self {
            w: f64::from(w),
            h: f64::from(h),
        }
    }
}
