//! Fixed presentation and timing constants for the countdown display.
//!
//! Nothing here is read from disk: `CountdownConfig::default()` is the
//! configuration. It lives in a resource so systems read it the same way
//! they read every other piece of shared state.

use bevy::prelude::*;
use chrono::{DateTime, FixedOffset};

use crate::countdown::{Deadline, TrackId};
use crate::visual::glyphs::GlyphStyle;

const BACHELOR_DEADLINE: &str = "2026-02-09T17:00:00+09:00";
const MASTER_DEADLINE: &str = "2026-02-13T15:00:00+09:00";

/// Horizontal distance between neighbouring character slots
pub const DIGIT_SPACING: f32 = 1.8;

/// How far above the baseline a replacement digit starts its drop
pub const DROP_HEIGHT: f32 = 15.0;

/// Unit labels sit this far below the digit row
pub const UNIT_ROW_OFFSET: f32 = 1.8;

/// Per-frame pacing of the digit animations.
///
/// Every value is applied once per rendered frame, so animation speed
/// follows the display refresh rate rather than wall time. Progress is
/// accumulated in `f64`: thirty steps of 0.05 land just above 1.5, so a
/// falling glyph retires on its thirtieth frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationTuning {
    pub progress_step: f64,
    /// Downward distance per frame, multiplied by current progress
    pub fall_speed: f32,
    pub fall_spin_x: f32,
    pub fall_spin_z: f32,
    /// Falling glyphs are retired once progress is strictly above this
    pub falling_threshold: f64,
    /// Dropping glyphs settle once progress reaches this
    pub dropping_threshold: f64,
}

impl Default for AnimationTuning {
    fn default() -> Self {
        Self {
            progress_step: 0.05,
            fall_speed: 0.3,
            fall_spin_x: 0.1,
            fall_spin_z: 0.05,
            falling_threshold: 1.5,
            dropping_threshold: 1.0,
        }
    }
}

/// Surface parameters for one class of glyph
#[derive(Debug, Clone, Copy)]
pub struct GlyphLook {
    pub style: GlyphStyle,
    pub color: Color,
    pub metallic: f32,
    pub roughness: f32,
}

impl GlyphLook {
    pub fn material(&self) -> StandardMaterial {
        StandardMaterial {
            base_color: self.color,
            metallic: self.metallic,
            perceptual_roughness: self.roughness,
            ..default()
        }
    }
}

/// A title model and where it floats
#[derive(Debug, Clone)]
pub struct TitleModelConfig {
    pub path: &'static str,
    pub position: Vec3,
    pub scale: f32,
    pub color: Color,
}

/// Configuration of one countdown row
#[derive(Debug, Clone)]
pub struct TrackConfig {
    pub id: TrackId,
    pub deadline: Deadline,
    /// Baseline y of the digit row
    pub offset_y: f32,
    pub title: TitleModelConfig,
}

#[derive(Resource, Debug, Clone)]
pub struct CountdownConfig {
    pub tracks: [TrackConfig; 2],
    pub spacing: f32,
    pub drop_height: f32,
    pub unit_row_offset: f32,
    pub animation: AnimationTuning,
    pub digit: GlyphLook,
    pub unit: GlyphLook,
    /// Tint applied to a digit the moment it starts falling
    pub falling_color: Color,
    pub background: Color,
    pub font_path: &'static str,
}

impl Default for CountdownConfig {
    fn default() -> Self {
        Self {
            tracks: [
                TrackConfig {
                    id: TrackId::Bachelor,
                    deadline: Deadline::new("bachelor", fixed_deadline(BACHELOR_DEADLINE)),
                    offset_y: 5.0,
                    title: TitleModelConfig {
                        path: "models/sotsuron.gltf",
                        position: Vec3::new(-7.5, 7.5, 0.0),
                        scale: 2.0,
                        color: Color::srgb_u8(0xff, 0x6b, 0x6b),
                    },
                },
                TrackConfig {
                    id: TrackId::Master,
                    deadline: Deadline::new("master", fixed_deadline(MASTER_DEADLINE)),
                    offset_y: -5.0,
                    title: TitleModelConfig {
                        path: "models/shuuron.gltf",
                        position: Vec3::new(-7.0, 1.5, 0.0),
                        scale: 2.0,
                        color: Color::srgb_u8(0x4e, 0xcd, 0xc4),
                    },
                },
            ],
            spacing: DIGIT_SPACING,
            drop_height: DROP_HEIGHT,
            unit_row_offset: UNIT_ROW_OFFSET,
            animation: AnimationTuning::default(),
            digit: GlyphLook {
                style: GlyphStyle {
                    size: 2.0,
                    depth: 0.5,
                    bevel_thickness: 0.03,
                    bevel_size: 0.02,
                },
                color: Color::WHITE,
                metallic: 0.3,
                roughness: 0.4,
            },
            unit: GlyphLook {
                style: GlyphStyle {
                    size: 0.5,
                    depth: 0.1,
                    bevel_thickness: 0.01,
                    bevel_size: 0.01,
                },
                color: Color::srgb_u8(0xaa, 0xaa, 0xaa),
                metallic: 0.2,
                roughness: 0.5,
            },
            falling_color: Color::srgb_u8(0xff, 0x00, 0x00),
            background: Color::srgb_u8(0x1a, 0x1a, 0x2e),
            font_path: "fonts/countdown_bold.glyphs",
        }
    }
}

impl CountdownConfig {
    pub fn track(&self, id: TrackId) -> &TrackConfig {
        match id {
            TrackId::Bachelor => &self.tracks[0],
            TrackId::Master => &self.tracks[1],
        }
    }
}

/// The deadline literals are compile-time constants; a malformed one is a
/// programming error caught by the tests below.
fn fixed_deadline(rfc3339: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(rfc3339).unwrap_or_default()
}
