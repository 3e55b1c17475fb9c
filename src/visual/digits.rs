use bevy::prelude::*;

use crate::{
    config::{CountdownConfig, GlyphLook},
    countdown::{DigitStage, TrackId},
    visual::glyphs::{GlyphFont, empty_mesh},
};

/// A digit glyph currently owned by (or just retired from) a track slot
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DigitGlyph {
    pub track: TrackId,
    pub slot: usize,
}

/// One of the static day/hour/min/sec labels
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitLabel {
    pub track: TrackId,
}

/// Spawns glyph entities through `Commands`.
///
/// Every glyph gets its own mesh and material so a falling glyph can be
/// tinted and fully released without touching its neighbours. Tint requests
/// are collected and applied by the caller, since the glyph's material is
/// only reachable through a query the stage does not hold.
pub struct SceneStage<'a, 'w, 's> {
    commands: &'a mut Commands<'w, 's>,
    meshes: &'a mut Assets<Mesh>,
    materials: &'a mut Assets<StandardMaterial>,
    font: &'a GlyphFont,
    config: &'a CountdownConfig,
    tinted: Vec<Entity>,
}

impl<'a, 'w, 's> SceneStage<'a, 'w, 's> {
    pub fn new(
        commands: &'a mut Commands<'w, 's>,
        meshes: &'a mut Assets<Mesh>,
        materials: &'a mut Assets<StandardMaterial>,
        font: &'a GlyphFont,
        config: &'a CountdownConfig,
    ) -> Self {
        Self {
            commands,
            meshes,
            materials,
            font,
            config,
            tinted: Vec::new(),
        }
    }

    /// Glyphs that asked to be recoloured as falling
    pub fn into_tinted(self) -> Vec<Entity> {
        self.tinted
    }

    fn glyph_assets(
        &mut self,
        text: &str,
        look: GlyphLook,
    ) -> (Handle<Mesh>, Handle<StandardMaterial>) {
        let mesh = self.font.text_mesh(text, &look.style).unwrap_or_else(|err| {
            warn!("{err}; rendering {text:?} without geometry");
            empty_mesh()
        });

        (self.meshes.add(mesh), self.materials.add(look.material()))
    }
}

impl DigitStage for SceneStage<'_, '_, '_> {
    fn spawn_digit(&mut self, track: TrackId, slot: usize, ch: char, position: Vec3) -> Entity {
        let mut buf = [0u8; 4];
        let (mesh, material) = self.glyph_assets(ch.encode_utf8(&mut buf), self.config.digit);

        self.commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_translation(position),
                DigitGlyph { track, slot },
                Name::new(format!("{track:?} digit {slot}")),
            ))
            .id()
    }

    fn spawn_unit(&mut self, track: TrackId, label: &str, position: Vec3) -> Entity {
        let (mesh, material) = self.glyph_assets(label, self.config.unit);

        self.commands
            .spawn((
                Mesh3d(mesh),
                MeshMaterial3d(material),
                Transform::from_translation(position),
                UnitLabel { track },
                Name::new(format!("{track:?} {label}")),
            ))
            .id()
    }

    fn tint_falling(&mut self, glyph: Entity) {
        self.tinted.push(glyph);
    }
}

/// Recolour glyphs that were just handed to a falling animation
pub fn apply_falling_tint(
    tinted: &[Entity],
    color: Color,
    glyphs: &Query<&MeshMaterial3d<StandardMaterial>, With<DigitGlyph>>,
    materials: &mut Assets<StandardMaterial>,
) {
    for &entity in tinted {
        let Ok(material) = glyphs.get(entity) else {
            continue;
        };
        if let Some(material) = materials.get_mut(&material.0) {
            material.base_color = color;
        }
    }
}
