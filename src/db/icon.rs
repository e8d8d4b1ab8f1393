//! Icon references and custom icon bitmaps.

/// Width and height of a custom icon in pixels.
pub const ICON_SIZE: usize = 16;

/// Number of pixels in a custom icon.
pub const ICON_PIXELS: usize = ICON_SIZE * ICON_SIZE;

/// Identifier of a custom icon in the database metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomIconId(pub u32);

/// Icon of a group or entry: a built-in icon number or a custom icon.
///
/// Custom icons are referenced by id and resolved through
/// `Database::custom_icon`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Icon {
    Number(u32),
    Custom(CustomIconId),
}

impl Default for Icon {
    fn default() -> Self {
        Icon::Number(0)
    }
}

/// A 16×16 RGB bitmap.
#[derive(Clone, PartialEq, Eq)]
pub struct CustomIcon {
    pixels: Box<[[u8; 3]; ICON_PIXELS]>,
}

impl CustomIcon {
    /// Build an icon from 256 raw RGB triples in row-major order.
    ///
    /// Returns `None` unless `rgb` is exactly 768 bytes.
    pub fn from_rgb(rgb: &[u8]) -> Option<Self> {
        if rgb.len() != ICON_PIXELS * 3 {
            return None;
        }

        let mut pixels = Box::new([[0u8; 3]; ICON_PIXELS]);
        for (pixel, chunk) in pixels.iter_mut().zip(rgb.chunks_exact(3)) {
            pixel.copy_from_slice(chunk);
        }
        Some(Self { pixels })
    }

    pub fn width(&self) -> usize {
        ICON_SIZE
    }

    pub fn height(&self) -> usize {
        ICON_SIZE
    }

    /// RGB value at column `x`, row `y`.
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 3]> {
        if x >= ICON_SIZE || y >= ICON_SIZE {
            return None;
        }
        Some(self.pixels[y * ICON_SIZE + x])
    }

    /// All pixels in row-major order.
    pub fn pixels(&self) -> &[[u8; 3]] {
        self.pixels.as_slice()
    }
}

impl std::fmt::Debug for CustomIcon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CustomIcon")
            .field("width", &ICON_SIZE)
            .field("height", &ICON_SIZE)
            .finish()
    }
}
