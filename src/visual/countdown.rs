use bevy::prelude::*;
use chrono::Utc;

use crate::{
    config::CountdownConfig,
    countdown::{DigitAnimations, TimerTrack, TrackLayout, TrackUpdate},
    visual::{
        digits::{DigitGlyph, SceneStage, apply_falling_tint},
        glyphs::GlyphFont,
        loading::CountdownAssets,
    },
};

/// Both countdown rows. Tracks never read each other's state.
#[derive(Resource, Debug)]
pub struct CountdownTracks(Vec<TimerTrack>);

impl CountdownTracks {
    pub fn from_config(config: &CountdownConfig) -> Self {
        let tracks = config
            .tracks
            .iter()
            .map(|track| {
                TimerTrack::new(
                    track.id,
                    track.deadline.clone(),
                    TrackLayout {
                        baseline_y: track.offset_y,
                        spacing: config.spacing,
                        drop_height: config.drop_height,
                        unit_row_offset: config.unit_row_offset,
                    },
                )
            })
            .collect();

        Self(tracks)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut TimerTrack> {
        self.0.iter_mut()
    }
}

/// System: Build the per-track state from configuration
pub fn setup_tracks(mut commands: Commands, config: Res<CountdownConfig>) {
    commands.insert_resource(CountdownTracks::from_config(&config));
}

/// System: Recompute remaining time and swap the glyphs of changed slots
#[allow(clippy::too_many_arguments)]
pub fn tick_countdown(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    fonts: Res<Assets<GlyphFont>>,
    assets: Res<CountdownAssets>,
    config: Res<CountdownConfig>,
    mut tracks: ResMut<CountdownTracks>,
    mut animations: ResMut<DigitAnimations>,
    glyphs: Query<&MeshMaterial3d<StandardMaterial>, With<DigitGlyph>>,
) {
    let Some(font) = fonts.get(&assets.font) else {
        return;
    };

    let now = Utc::now();
    let mut stage = SceneStage::new(&mut commands, &mut meshes, &mut materials, font, &config);

    for track in tracks.iter_mut() {
        let current = track.deadline().remaining(now);

        match track.update(&current, &mut stage, &mut animations) {
            TrackUpdate::FirstPaint => {
                info!("⏳ {} countdown painted: {}", track.deadline().label(), current);
            }
            TrackUpdate::Changed(slots) => {
                debug!(
                    "{} countdown {} (slots {:?}, {} animating)",
                    track.deadline().label(),
                    current,
                    slots,
                    animations.len()
                );
            }
            TrackUpdate::Unchanged => {}
        }
    }

    let tinted = stage.into_tinted();
    apply_falling_tint(&tinted, config.falling_color, &glyphs, &mut materials);
}
