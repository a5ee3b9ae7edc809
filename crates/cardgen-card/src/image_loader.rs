//! Image loading: read, detect format, and decode.
//!
//! Card images are local files. Loading is split into two steps:
//!
//! 1. **Detect** - [`detect_format()`] decides between SVG and raster from
//!    the file extension, then by sniffing the first bytes.
//! 2. **Decode** - the [`ImageDecoder`] trait with [`SvgDecoder`] and
//!    [`RasterDecoder`] implementations.
//!
//! [`ImageLoaderPipeline`] ties them together; [`load_image()`] adds the
//! file read.

use std::fs;
use std::path::Path;

use cardgen_common::image::LoadedImage;

use crate::CardError;

/// Detected image format.
///
/// The `image` crate tells raster sub-formats (PNG, JPEG, GIF, ...) apart
/// on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    /// SVG vector image, rasterized at its intrinsic size.
    Svg,
    /// Raster image decoded by the `image` crate.
    Raster,
}

/// Detect whether `bytes` loaded from `path` are SVG or raster.
///
/// A `.svg` extension wins. Otherwise the first 256 bytes after leading
/// whitespace are checked for an `<?xml` or `<svg` prefix. Anything else is
/// raster.
#[must_use]
pub fn detect_format(path: &Path, bytes: &[u8]) -> ImageFormat {
    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
    {
        return ImageFormat::Svg;
    }

    let trimmed = bytes
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take(256)
        .copied()
        .collect::<Vec<u8>>();

    if trimmed.starts_with(b"<?xml") || trimmed.starts_with(b"<svg") {
        ImageFormat::Svg
    } else {
        ImageFormat::Raster
    }
}

/// A decoder that turns raw bytes into a [`LoadedImage`].
pub trait ImageDecoder {
    /// Whether this decoder handles `format`.
    fn supports(&self, format: ImageFormat) -> bool;

    /// Decode `bytes`.
    ///
    /// # Errors
    ///
    /// Returns a description of why the bytes could not be decoded.
    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, String>;
}

/// Decodes SVG via usvg and rasterizes with resvg.
pub struct SvgDecoder;

impl ImageDecoder for SvgDecoder {
    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Svg
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, String> {
        let tree = usvg::Tree::from_data(bytes, &usvg::Options::default())
            .map_err(|e| format!("failed to parse SVG: {e}"))?;

        let size = tree.size();
        let (w, h) = (size.width().ceil() as u32, size.height().ceil() as u32);
        if w == 0 || h == 0 {
            return Err("SVG has zero-size dimensions".to_string());
        }

        let mut pixmap = tiny_skia::Pixmap::new(w, h)
            .ok_or_else(|| "failed to allocate pixmap for SVG".to_string())?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        // tiny-skia stores premultiplied alpha.
        let rgba = pixmap
            .pixels()
            .iter()
            .flat_map(|px| {
                let c = px.demultiply();
                [c.red(), c.green(), c.blue(), c.alpha()]
            })
            .collect();
        Ok(LoadedImage::new(w, h, rgba))
    }
}

/// Decodes raster images (PNG, JPEG, GIF, BMP, ...) via the `image` crate.
pub struct RasterDecoder;

impl ImageDecoder for RasterDecoder {
    fn supports(&self, format: ImageFormat) -> bool {
        format == ImageFormat::Raster
    }

    fn decode(&self, bytes: &[u8]) -> Result<LoadedImage, String> {
        let decoded =
            image::load_from_memory(bytes).map_err(|e| format!("could not decode image ({e})"))?;
        let rgba = decoded.to_rgba8();
        let (w, h) = rgba.dimensions();
        Ok(LoadedImage::new(w, h, rgba.into_raw()))
    }
}

/// Detects the format of image bytes and dispatches to a decoder.
pub struct ImageLoaderPipeline {
    decoders: Vec<Box<dyn ImageDecoder>>,
}

impl ImageLoaderPipeline {
    /// A pipeline with the SVG and raster decoders.
    #[must_use]
    pub fn new() -> Self {
        Self {
            decoders: vec![Box::new(SvgDecoder), Box::new(RasterDecoder)],
        }
    }

    /// Decode `bytes` read from `path`.
    ///
    /// # Errors
    ///
    /// Returns a description of the failure if no decoder supports the
    /// detected format or decoding fails.
    pub fn decode(&self, bytes: &[u8], path: &Path) -> Result<LoadedImage, String> {
        let format = detect_format(path, bytes);
        self.decoders
            .iter()
            .find(|decoder| decoder.supports(format))
            .ok_or_else(|| format!("no decoder available for format {format:?}"))?
            .decode(bytes)
    }
}

impl Default for ImageLoaderPipeline {
    fn default() -> Self {
        Self::new()
    }
}

/// Read and decode the image file at `path`.
///
/// # Errors
///
/// Returns [`CardError::Io`] if the file cannot be read and
/// [`CardError::Image`] if it cannot be decoded.
pub fn load_image(path: &Path) -> Result<LoadedImage, CardError> {
    let bytes = fs::read(path).map_err(|source| CardError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ImageLoaderPipeline::new()
        .decode(&bytes, path)
        .map_err(|reason| CardError::Image {
            path: path.display().to_string(),
            reason,
        })
}
