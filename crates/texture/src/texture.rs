use image::imageops::{self, FilterType};
use image::{Rgba, RgbaImage};

/// Largest accepted width or height, in pixels.
pub const MAX_DIMENSION: u32 = 16_384;

/// Fully transparent black.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Errors from texture construction and resizing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TextureError {
    #[error("texture size {width}x{height} exceeds the 16384 pixel limit")]
    TooLarge { width: u32, height: u32 },
    #[error("texture dimension must be a non-negative integer, got {0}")]
    NotAnInteger(f64),
}

/// Convert a loosely typed size (e.g. read from a manifest) into a pixel
/// dimension.
///
/// A whole number over [`MAX_DIMENSION`] is `TooLarge`, reported in `width`
/// with a zero `height`.
pub fn dimension(value: f64) -> Result<u32, TextureError> {
    let value = whole(value)?;
    if value > MAX_DIMENSION as f64 {
        // Saturating cast; anything past u32::MAX reads as u32::MAX.
        return Err(TextureError::TooLarge {
            width: value as u32,
            height: 0,
        });
    }
    Ok(value as u32)
}

fn whole(value: f64) -> Result<f64, TextureError> {
    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 {
        return Err(TextureError::NotAnInteger(value));
    }
    Ok(value)
}

/// Reject dimensions no texture can have.
pub fn check_dimensions(width: u32, height: u32) -> Result<(), TextureError> {
    if width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(TextureError::TooLarge { width, height });
    }
    Ok(())
}

/// Owned RGBA8 pixel buffer with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, PartialEq)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// Allocate a cleared texture.
    pub fn new(width: u32, height: u32) -> Result<Self, TextureError> {
        check_dimensions(width, height)?;
        Ok(Self {
            image: RgbaImage::new(width, height),
        })
    }

    /// Allocate a cleared texture from untyped dimensions.
    pub fn from_f64(width: f64, height: f64) -> Result<Self, TextureError> {
        Self::new(whole(width)? as u32, whole(height)? as u32)
    }

    /// Wrap decoded image data.
    pub fn from_image(image: RgbaImage) -> Result<Self, TextureError> {
        check_dimensions(image.width(), image.height())?;
        Ok(Self { image })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// True if the texture holds no pixels at all.
    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba<u8>> {
        self.image.get_pixel_checked(x, y).copied()
    }

    /// Overwrite one pixel. Out-of-bounds writes are ignored.
    pub fn put_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            *p = color;
        }
    }

    /// Composite `color` over the pixel at `(x, y)`. Out-of-bounds writes are
    /// ignored.
    pub fn blend_pixel(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if let Some(p) = self.image.get_pixel_mut_checked(x, y) {
            *p = alpha_over(*p, color);
        }
    }

    pub fn fill(&mut self, color: Rgba<u8>) {
        for p in self.image.pixels_mut() {
            *p = color;
        }
    }

    /// Overwrite every pixel with transparent black.
    pub fn clear(&mut self) {
        self.image.fill(0);
    }

    /// Reallocate to the new dimensions, discarding all content.
    ///
    /// No-op when the dimensions are unchanged.
    pub fn resize_fast(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if self.dimensions() == (width, height) {
            return Ok(());
        }
        check_dimensions(width, height)?;
        tracing::debug!(
            from = ?self.dimensions(),
            to = ?(width, height),
            "texture reallocated"
        );
        self.image = RgbaImage::new(width, height);
        Ok(())
    }

    /// Resize to the new dimensions, stretching or shrinking the current
    /// content to fit (bilinear).
    ///
    /// No-op when the dimensions are unchanged.
    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), TextureError> {
        if self.dimensions() == (width, height) {
            return Ok(());
        }
        check_dimensions(width, height)?;
        if self.is_empty() || width == 0 || height == 0 {
            self.image = RgbaImage::new(width, height);
        } else {
            self.image = imageops::resize(&self.image, width, height, FilterType::Triangle);
        }
        Ok(())
    }

    pub fn as_image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Straight-alpha source-over compositing of `src` onto `dst`.
pub fn alpha_over(dst: Rgba<u8>, src: Rgba<u8>) -> Rgba<u8> {
    match src[3] {
        0 => dst,
        255 => src,
        a => {
            let sa = a as f32 / 255.0;
            let da = dst[3] as f32 / 255.0 * (1.0 - sa);
            let out_a = sa + da;
            let channel = |s: u8, d: u8| {
                let c = (s as f32 * sa + d as f32 * da) / out_a;
                c.round().clamp(0.0, 255.0) as u8
            };
            Rgba([
                channel(src[0], dst[0]),
                channel(src[1], dst[1]),
                channel(src[2], dst[2]),
                (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
            ])
        }
    }
}
