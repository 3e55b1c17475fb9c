use crate::config::CountdownConfig;
use crate::countdown::DigitAnimations;
use crate::visual::animations::advance_digit_animations;
use crate::visual::countdown::{setup_tracks, tick_countdown};
use crate::visual::glyphs::GlyphFontPlugin;
use crate::visual::loading::{CountdownPhase, LoadProgress, start_asset_loads, watch_asset_loads};
use crate::visual::setup::setup_scene;
use crate::visual::titles::dress_title_models;
use bevy::prelude::*;

pub struct CountdownPlugin;

impl Plugin for CountdownPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(GlyphFontPlugin)
            .init_resource::<CountdownConfig>()
            .init_resource::<DigitAnimations>()
            .init_resource::<LoadProgress>()
            .init_state::<CountdownPhase>()
            .add_systems(Startup, (setup_scene, setup_tracks, start_asset_loads).chain())
            .add_systems(
                Update,
                watch_asset_loads.run_if(in_state(CountdownPhase::Loading)),
            )
            .add_systems(OnEnter(CountdownPhase::Running), log_countdown_start)
            .add_systems(
                Update,
                (
                    // Diff the clock against the painted digits
                    tick_countdown,
                    // Step falling/dropping glyphs (spawns from the tick are visible here)
                    advance_digit_animations,
                )
                    .chain()
                    .run_if(in_state(CountdownPhase::Running)),
            )
            .add_systems(Update, dress_title_models);
    }
}

fn log_countdown_start(config: Res<CountdownConfig>) {
    for track in &config.tracks {
        info!(
            "⏱️ Counting down to {} deadline at {}",
            track.deadline.label(),
            track.deadline.at()
        );
    }
}
