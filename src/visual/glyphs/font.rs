//! Stroke font asset.
//!
//! Glyphs are described as straight centre-line strokes in em units
//! (baseline at y = 0, cap height near 1). The mesh builder sweeps every
//! stroke into a box, so the font file carries no outlines or curves.

use std::collections::HashMap;

use bevy::asset::{AssetLoader, LoadContext, io::Reader};
use bevy::prelude::*;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Deserialize)]
struct FontJson {
    name: String,
    stroke: f32,
    glyphs: HashMap<String, GlyphJson>,
}

#[derive(Debug, Deserialize)]
struct GlyphJson {
    advance: f32,
    /// Each stroke is `[x0, y0, x1, y1]`
    strokes: Vec<[f32; 4]>,
}

/// One glyph: its advance width and the strokes that draw it
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphOutline {
    pub advance: f32,
    pub strokes: Vec<[Vec2; 2]>,
}

#[derive(Debug, Error)]
pub enum GlyphFontError {
    #[error("could not read glyph font: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not parse glyph font: {0}")]
    Json(#[from] serde_json::Error),
    #[error("glyph key {0:?} must be exactly one character")]
    GlyphKey(String),
    #[error("stroke width must be positive, got {0}")]
    StrokeWidth(f32),
    #[error("glyph {0:?} has a non-finite coordinate")]
    NonFinite(char),
}

/// Parsed stroke font, loaded through the asset server
#[derive(Asset, TypePath, Debug, Clone)]
pub struct GlyphFont {
    pub name: String,
    /// Stroke width in em units
    pub stroke: f32,
    glyphs: HashMap<char, GlyphOutline>,
}

impl GlyphFont {
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, GlyphFontError> {
        let raw: FontJson = serde_json::from_slice(bytes)?;
        Self::from_raw(raw)
    }

    pub fn from_json_str(text: &str) -> Result<Self, GlyphFontError> {
        let raw: FontJson = serde_json::from_str(text)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: FontJson) -> Result<Self, GlyphFontError> {
        if !(raw.stroke.is_finite() && raw.stroke > 0.0) {
            return Err(GlyphFontError::StrokeWidth(raw.stroke));
        }

        let mut glyphs = HashMap::with_capacity(raw.glyphs.len());
        for (key, glyph) in raw.glyphs {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(GlyphFontError::GlyphKey(key));
            };

            let finite = glyph.advance.is_finite()
                && glyph.strokes.iter().flatten().all(|v| v.is_finite());
            if !finite {
                return Err(GlyphFontError::NonFinite(ch));
            }

            let strokes = glyph
                .strokes
                .iter()
                .map(|[x0, y0, x1, y1]| [Vec2::new(*x0, *y0), Vec2::new(*x1, *y1)])
                .collect();

            glyphs.insert(
                ch,
                GlyphOutline {
                    advance: glyph.advance,
                    strokes,
                },
            );
        }

        Ok(Self {
            name: raw.name,
            stroke: raw.stroke,
            glyphs,
        })
    }

    pub fn glyph(&self, ch: char) -> Option<&GlyphOutline> {
        self.glyphs.get(&ch)
    }

    pub fn covers(&self, text: &str) -> bool {
        text.chars().all(|ch| self.glyphs.contains_key(&ch))
    }
}

/// Loads `*.glyphs` files (JSON stroke fonts)
#[derive(Default, TypePath)]
pub struct GlyphFontLoader;

impl AssetLoader for GlyphFontLoader {
    type Asset = GlyphFont;
    type Settings = ();
    type Error = GlyphFontError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        _load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        GlyphFont::from_json_slice(&bytes)
    }

    fn extensions(&self) -> &[&str] {
        &["glyphs"]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHIPPED_FONT: &str = include_str!("../../../assets/fonts/countdown_bold.glyphs");

    #[test]
    fn test_shipped_font_covers_display() {
        let font = GlyphFont::from_json_str(SHIPPED_FONT).unwrap();
        assert!(font.covers("0123456789:"));
        for label in crate::countdown::track::UNIT_LABELS {
            assert!(font.covers(label), "font is missing a glyph of {label:?}");
        }
        assert!(font.stroke > 0.0);
    }

    #[test]
    fn test_parse_minimal_font() {
        let font = GlyphFont::from_json_str(
            r#"{ "name": "tiny", "stroke": 0.1,
                 "glyphs": { "1": { "advance": 0.5, "strokes": [[0.2, 0.0, 0.2, 1.0]] } } }"#,
        )
        .unwrap();

        let one = font.glyph('1').unwrap();
        assert_eq!(one.advance, 0.5);
        assert_eq!(one.strokes, vec![[Vec2::new(0.2, 0.0), Vec2::new(0.2, 1.0)]]);
        assert!(font.glyph('2').is_none());
        assert!(!font.covers("12"));
    }

    #[test]
    fn test_rejects_multi_char_key() {
        let err = GlyphFont::from_json_str(
            r#"{ "name": "bad", "stroke": 0.1,
                 "glyphs": { "ab": { "advance": 0.5, "strokes": [] } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, GlyphFontError::GlyphKey(key) if key == "ab"));
    }

    #[test]
    fn test_rejects_bad_stroke_width() {
        let err = GlyphFont::from_json_str(r#"{ "name": "bad", "stroke": 0.0, "glyphs": {} }"#)
            .unwrap_err();
        assert!(matches!(err, GlyphFontError::StrokeWidth(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = GlyphFont::from_json_str(r#"{ "name": "bad", "stroke": "#).unwrap_err();
        assert!(matches!(err, GlyphFontError::Json(_)));
    }
}
