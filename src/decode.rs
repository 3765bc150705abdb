use std::fmt;

use crate::error::DecodeError;

/// A decoded page, ready to be uploaded as a texture
#[derive(Clone, PartialEq, Eq)]
pub struct PageImage {
    pub rgba8_pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl PageImage {
    pub fn size(&self) -> PageSize {
        PageSize {
            width: self.width,
            height: self.height,
        }
    }
}

impl fmt::Debug for PageImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

/// Pixel dimensions of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSize {
    pub width: u32,
    pub height: u32,
}

impl PageSize {
    /// Used whenever the real size of a page cannot be determined
    pub const FALLBACK: Self = Self {
        width: 800,
        height: 600,
    };

    /// Scale down (never up) to fit inside the provided bounds, keeping the aspect ratio
    pub fn fit_within(self, max_width: f32, max_height: f32) -> (f32, f32) {
        let (width, height) = (self.width.max(1) as f32, self.height.max(1) as f32);
        let scale = (max_width / width).min(max_height / height).min(1.0);

        (width * scale, height * scale)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

/// Decode an image, guessing its format from its content
///
/// With `max_edge`, the result is downscaled so that neither side exceeds it.
pub fn decode_page(bytes: &[u8], max_edge: Option<u32>) -> Result<PageImage, DecodeError> {
    let mut image = image::load_from_memory(bytes)?;

    if let Some(max_edge) = max_edge {
        if image.width() > max_edge || image.height() > max_edge {
            image = image.thumbnail(max_edge, max_edge);
        }
    }

    let rgba = image.into_rgba8();

    Ok(PageImage {
        width: rgba.width(),
        height: rgba.height(),
        rgba8_pixels: rgba.into_raw(),
    })
}
