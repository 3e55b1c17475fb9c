//! Title models floating above each countdown row.

use std::f32::consts::FRAC_PI_2;

use bevy::prelude::*;

use crate::{config::TitleModelConfig, countdown::TrackId};

/// A title model root waiting for (or carrying) its override material
#[derive(Component, Debug, Clone)]
pub struct TitleModel {
    pub track: TrackId,
    pub material: Handle<StandardMaterial>,
}

/// Marker: every mesh under this title already uses the override material
#[derive(Component)]
pub struct TitleDressed;

pub fn spawn_title_model(
    commands: &mut Commands,
    materials: &mut Assets<StandardMaterial>,
    scene: Handle<Scene>,
    track: TrackId,
    title: &TitleModelConfig,
) {
    let material = materials.add(StandardMaterial {
        base_color: title.color,
        metallic: 0.3,
        perceptual_roughness: 0.4,
        ..default()
    });

    commands.spawn((
        SceneRoot(scene),
        Transform::from_translation(title.position)
            .with_rotation(Quat::from_rotation_x(FRAC_PI_2))
            .with_scale(Vec3::splat(title.scale)),
        TitleModel { track, material },
        Name::new(format!("{track:?} title")),
    ));

    info!("🏷️ {track:?} title placed at {}", title.position);
}

/// System: Swap the glTF materials of freshly instanced titles for the
/// title's own colour
pub fn dress_title_models(
    mut commands: Commands,
    titles: Query<(Entity, &TitleModel), Without<TitleDressed>>,
    children: Query<&Children>,
    mut mesh_materials: Query<&mut MeshMaterial3d<StandardMaterial>>,
) {
    for (root, title) in &titles {
        let mut dressed = 0;
        for descendant in children.iter_descendants(root) {
            if let Ok(mut material) = mesh_materials.get_mut(descendant) {
                material.0 = title.material.clone();
                dressed += 1;
            }
        }

        // the scene is instanced a frame or more after the root spawns
        if dressed > 0 {
            commands.entity(root).insert(TitleDressed);
            debug!("{:?} title dressed ({dressed} meshes)", title.track);
        }
    }
}
