//! Decoded image data shared between the image loader and the compositor.

/// Decoded RGBA pixels for a card image element.
///
/// Rows are stored top to bottom, four bytes per pixel, non-premultiplied.
#[derive(Clone)]
pub struct LoadedImage {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data.
    ///
    /// `rgba_data` must hold `width * height * 4` bytes.
    #[must_use]
    pub const fn new(width: u32, height: u32, rgba_data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Intrinsic width of the image in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height of the image in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Whether the image has no pixels at all.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// The RGBA value at `(x, y)`, or `None` when out of range or when the
    /// buffer is shorter than the declared dimensions.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.rgba_data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba_data(&self) -> &[u8] {
        &self.rgba_data
    }
}
