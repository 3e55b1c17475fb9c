use bevy::prelude::*;

use crate::{
    config::CountdownConfig,
    countdown::{DigitAnimations, StepOutcome},
};

/// System: Step every falling and dropping glyph by one frame.
///
/// Expired falling glyphs are the only place glyph assets are released:
/// the entity is despawned and its mesh and material are removed from
/// their stores right away.
pub fn advance_digit_animations(
    mut commands: Commands,
    config: Res<CountdownConfig>,
    mut animations: ResMut<DigitAnimations>,
    mut glyphs: Query<(
        &mut Transform,
        &Mesh3d,
        &MeshMaterial3d<StandardMaterial>,
    )>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let tuning = config.animation;

    animations.retain_mut(|record| {
        let Ok((mut transform, mesh, material)) = glyphs.get_mut(record.entity) else {
            // glyph is gone, nothing left to animate
            return false;
        };

        match record.step(&mut transform, &tuning) {
            StepOutcome::Continue => true,
            StepOutcome::Settled => false,
            StepOutcome::Expired => {
                meshes.remove(&mesh.0);
                materials.remove(&material.0);
                commands.entity(record.entity).despawn();
                false
            }
        }
    });
}
