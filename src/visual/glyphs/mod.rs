//! Extruded stroke-font text: the font asset and the geometry built from it.

pub mod font;
pub mod mesh;

pub use font::{GlyphFont, GlyphFontLoader};
pub use mesh::{GlyphStyle, empty_mesh};

use bevy::prelude::*;

pub struct GlyphFontPlugin;

impl Plugin for GlyphFontPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<GlyphFont>()
            .init_asset_loader::<GlyphFontLoader>();
    }
}
