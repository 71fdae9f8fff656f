//! Font loading with fallback.
//!
//! A [`FontSet`] is always usable: when a requested font file can't be read
//! the set falls back to a system font, and failing that to a built-in face
//! that draws solid glyph blocks with fixed metrics. Every substitution is
//! recorded so the caller can see the frame was degraded.

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::error::FontError;
use crate::layout::TextMeasure;

const SYSTEM_BOLD_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Bold.ttf",
    "/usr/share/fonts/noto/NotoSansDevanagari-Bold.ttf",
    "/usr/share/fonts/truetype/lohit-devanagari/Lohit-Devanagari.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "C:\\Windows\\Fonts\\NirmalaB.ttf",
];

const SYSTEM_REGULAR_FONTS: &[&str] = &[
    "/usr/share/fonts/truetype/noto/NotoSansDevanagari-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansDevanagari-Regular.ttf",
    "/usr/share/fonts/truetype/lohit-devanagari/Lohit-Devanagari.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "C:\\Windows\\Fonts\\Nirmala.ttf",
];

/// Advance of every character in the built-in face, as a fraction of the font size
const BUILTIN_ADVANCE: f32 = 0.55;

/// Where a face actually came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    File(PathBuf),
    Builtin,
}

impl fmt::Display for FontSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FontSource::File(path) => write!(f, "{}", path.display()),
            FontSource::Builtin => f.write_str("built-in block font"),
        }
    }
}

/// A requested font that could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FontSubstitution {
    pub requested: Option<PathBuf>,
    pub substitute: FontSource,
}

pub enum FontFace {
    Truetype { font: FontVec, source: PathBuf },
    Builtin,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FontFace").field(&self.source()).finish()
    }
}

impl FontFace {
    pub fn from_file(path: &Path) -> Result<Self, FontError> {
        let data = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(data).map_err(|_| FontError::Parse {
            path: path.to_path_buf(),
        })?;

        Ok(FontFace::Truetype {
            font,
            source: path.to_path_buf(),
        })
    }

    pub fn source(&self) -> FontSource {
        match self {
            FontFace::Truetype { source, .. } => FontSource::File(source.clone()),
            FontFace::Builtin => FontSource::Builtin,
        }
    }

    /// Width of `text` in pixels at `size`
    pub fn measure(&self, text: &str, size: f32) -> f32 {
        match self {
            FontFace::Truetype { font, .. } => {
                let scaled = font.as_scaled(PxScale::from(size));
                kerned_width(
                    text.chars().map(|ch| scaled.glyph_id(ch)),
                    |id| scaled.h_advance(id),
                    |first, second| scaled.kern(first, second),
                )
            }
            FontFace::Builtin => text.chars().count() as f32 * size * BUILTIN_ADVANCE,
        }
    }

    /// This face at a fixed size, for use with [`crate::layout::wrap_lines`]
    pub fn at(&self, size: f32) -> SizedFace<'_> {
        SizedFace { face: self, size }
    }

    /// Draw `text` with its top-left corner at (`x`, `y`).
    pub fn draw(&self, img: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: f32, text: &str) {
        match self {
            FontFace::Truetype { font, .. } => {
                draw_text_mut(img, color, x, y, PxScale::from(size), font, text);
            }
            FontFace::Builtin => draw_blocks(img, color, x, y, size, text),
        }
    }
}

/// Sum of glyph advances with pair kerning applied between neighbours
fn kerned_width<A, K>(glyphs: impl IntoIterator<Item = GlyphId>, advance: A, kern: K) -> f32
where
    A: Fn(GlyphId) -> f32,
    K: Fn(GlyphId, GlyphId) -> f32,
{
    let mut width = 0.0;
    let mut previous: Option<GlyphId> = None;

    for id in glyphs {
        if let Some(prev) = previous {
            width += kern(prev, id);
        }
        width += advance(id);
        previous = Some(id);
    }

    width
}

/// Built-in glyphs: one solid block per visible character
fn draw_blocks(img: &mut RgbImage, color: Rgb<u8>, x: i32, y: i32, size: f32, text: &str) {
    let advance = size * BUILTIN_ADVANCE;
    let block_width = (advance * 0.7).max(1.0) as u32;
    let block_height = (size * 0.6).max(1.0) as u32;
    let top = y + (size * 0.25) as i32;

    for (i, ch) in text.chars().enumerate() {
        if ch.is_whitespace() {
            continue;
        }
        let left = x + (i as f32 * advance + advance * 0.15) as i32;
        draw_filled_rect_mut(img, Rect::at(left, top).of_size(block_width, block_height), color);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SizedFace<'a> {
    face: &'a FontFace,
    size: f32,
}

impl TextMeasure for SizedFace<'_> {
    fn measure(&self, text: &str) -> f32 {
        self.face.measure(text, self.size)
    }
}

/// Faces for the headline and for body text
#[derive(Debug)]
pub struct FontSet {
    pub headline: FontFace,
    pub body: FontFace,
    pub substitutions: Vec<FontSubstitution>,
}

impl FontSet {
    /// Load the requested fonts, falling back to system fonts and then to the
    /// built-in face.
    pub fn load(headline: Option<&Path>, body: Option<&Path>) -> Self {
        let mut substitutions = Vec::new();

        let (headline, sub) = resolve(headline, SYSTEM_BOLD_FONTS);
        substitutions.extend(sub);
        let (body, sub) = resolve(body, SYSTEM_REGULAR_FONTS);
        substitutions.extend(sub);

        Self {
            headline,
            body,
            substitutions,
        }
    }

    /// A set using only the built-in face
    pub fn builtin() -> Self {
        Self {
            headline: FontFace::Builtin,
            body: FontFace::Builtin,
            substitutions: Vec::new(),
        }
    }

    pub fn is_degraded(&self) -> bool {
        !self.substitutions.is_empty()
    }
}

fn resolve(requested: Option<&Path>, system: &[&str]) -> (FontFace, Option<FontSubstitution>) {
    if let Some(path) = requested {
        match FontFace::from_file(path) {
            Ok(face) => {
                info!("Loaded font: {}", path.display());
                return (face, None);
            }
            Err(e) => warn!("{}, falling back", e),
        }
    }

    let face = system
        .iter()
        .find_map(|candidate| FontFace::from_file(Path::new(candidate)).ok())
        .unwrap_or(FontFace::Builtin);

    match &face {
        FontFace::Truetype { source, .. } => debug!("Using system font: {}", source.display()),
        FontFace::Builtin => warn!("No usable font found, using built-in block font"),
    }

    // Picking a system font when nothing was requested is not a degradation
    let substitution = match (requested, &face) {
        (Some(path), _) => Some(FontSubstitution {
            requested: Some(path.to_path_buf()),
            substitute: face.source(),
        }),
        (None, FontFace::Builtin) => Some(FontSubstitution {
            requested: None,
            substitute: FontSource::Builtin,
        }),
        (None, FontFace::Truetype { .. }) => None,
    };

    (face, substitution)
}
