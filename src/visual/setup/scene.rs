use bevy::prelude::*;

use crate::config::CountdownConfig;

/// Point light position, up and to the right of the display
const POINT_LIGHT_POSITION: Vec3 = Vec3::new(10.0, 10.0, 10.0);

const AMBIENT_BRIGHTNESS: f32 = 250.0;
const POINT_LIGHT_INTENSITY: f32 = 1_500_000.0;

pub fn setup_scene(mut commands: Commands, config: Res<CountdownConfig>) {
    commands.insert_resource(ClearColor(config.background));

    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: AMBIENT_BRIGHTNESS,
        affects_lightmapped_meshes: true,
    });

    commands.spawn((
        PointLight {
            color: Color::WHITE,
            intensity: POINT_LIGHT_INTENSITY,
            range: 100.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_translation(POINT_LIGHT_POSITION),
        Name::new("Key Light"),
    ));

    info!("Scene lit, background {:?}", config.background);
}
