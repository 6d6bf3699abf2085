use crate::error::{ArcTextError, Result};
use ab_glyph::{Font, FontVec, PxScale, ScaleFont};
use font_kit::{family_name::FamilyName, properties::Properties, source::SystemSource};

/// Measured pixel box of a string or a single character
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
}

/// Text-shaping collaborator: measures descriptor strings (to compute a
/// segment's required curve length) and single characters (to build glyph
/// boxes). The engine itself never rasterizes anything.
pub trait TextShaper {
    fn measure_text(&self, text: &str) -> TextMetrics;
    fn measure_char(&self, ch: char) -> TextMetrics;
}

/// Real font metrics via ab_glyph.
pub struct FontShaper {
    font: FontVec,
    scale: PxScale,
}

impl FontShaper {
    pub fn from_bytes(bytes: Vec<u8>, px_size: f32) -> Result<Self> {
        let font = FontVec::try_from_vec(bytes)
            .map_err(|e| ArcTextError::Font(format!("invalid font data: {e}")))?;
        Ok(Self {
            font,
            scale: PxScale::from(px_size),
        })
    }

    /// Load a sans-serif system font through font-kit.
    pub fn system(px_size: f32) -> Result<Self> {
        Ok(Self {
            font: load_system_font()?,
            scale: PxScale::from(px_size),
        })
    }
}

/// Find a usable sans-serif font on the host system.
pub fn load_system_font() -> Result<FontVec> {
    let source = SystemSource::new();
    let families = [
        FamilyName::SansSerif,
        FamilyName::Title("Arial".to_string()),
        FamilyName::Title("Helvetica".to_string()),
        FamilyName::Title("DejaVu Sans".to_string()),
    ];

    for family in families {
        if let Ok(handle) = source.select_best_match(&[family], &Properties::new())
            && let Ok(font) = handle.load()
            && let Some(bytes) = font.copy_font_data()
            && let Ok(font) = FontVec::try_from_vec(bytes.to_vec())
        {
            return Ok(font);
        }
    }
    Err(ArcTextError::Font("no usable system font found".to_string()))
}

impl TextShaper for FontShaper {
    fn measure_text(&self, text: &str) -> TextMetrics {
        let scaled = self.font.as_scaled(self.scale);
        let mut width = 0.0f32;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev_id) = prev {
                width += scaled.kern(prev_id, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        TextMetrics {
            width: width as f64,
            height: scaled.height() as f64,
        }
    }

    fn measure_char(&self, ch: char) -> TextMetrics {
        let scaled = self.font.as_scaled(self.scale);
        TextMetrics {
            width: scaled.h_advance(scaled.glyph_id(ch)) as f64,
            height: scaled.height() as f64,
        }
    }
}

/// Fixed-advance shaper: every character measures the same.
///
/// Used by tests, where placement outcomes must be easy to predict, and as a
/// stand-in when no font is available.
#[derive(Debug, Clone, Copy)]
pub struct FixedShaper {
    pub advance: f64,
    pub height: f64,
}

impl FixedShaper {
    pub fn new(advance: f64, height: f64) -> Self {
        Self { advance, height }
    }
}

impl TextShaper for FixedShaper {
    fn measure_text(&self, text: &str) -> TextMetrics {
        TextMetrics {
            width: self.advance * text.chars().count() as f64,
            height: self.height,
        }
    }

    fn measure_char(&self, _ch: char) -> TextMetrics {
        TextMetrics {
            width: self.advance,
            height: self.height,
        }
    }
}
