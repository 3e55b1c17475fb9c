//! Asset loading and the join that starts the countdown.
//!
//! The font and both title models load independently. Each title is placed
//! in the scene as soon as its own load finishes; the countdown itself only
//! starts once all three are in, whatever order they arrive in. A failed
//! load is logged once and leaves the app waiting.

use bevy::asset::LoadState;
use bevy::gltf::Gltf;
use bevy::prelude::*;

use crate::{
    config::CountdownConfig,
    countdown::{TrackId, track::UNIT_LABELS},
    visual::{glyphs::GlyphFont, titles::spawn_title_model},
};

#[derive(States, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CountdownPhase {
    #[default]
    Loading,
    Running,
}

/// Handles for everything the countdown waits on
#[derive(Resource, Debug, Clone)]
pub struct CountdownAssets {
    pub font: Handle<GlyphFont>,
    pub bachelor_title: Handle<Gltf>,
    pub master_title: Handle<Gltf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prerequisite {
    Font,
    BachelorTitle,
    MasterTitle,
}

impl Prerequisite {
    pub const ALL: [Prerequisite; 3] = [
        Prerequisite::Font,
        Prerequisite::BachelorTitle,
        Prerequisite::MasterTitle,
    ];

    fn index(self) -> usize {
        self as usize
    }

    pub fn title_track(self) -> Option<TrackId> {
        match self {
            Prerequisite::Font => None,
            Prerequisite::BachelorTitle => Some(TrackId::Bachelor),
            Prerequisite::MasterTitle => Some(TrackId::Master),
        }
    }
}

/// Completion flags for the three prerequisites
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AssetGate {
    done: [bool; 3],
}

impl AssetGate {
    /// Mark `prerequisite` complete. Returns true only the first time.
    pub fn complete(&mut self, prerequisite: Prerequisite) -> bool {
        let slot = &mut self.done[prerequisite.index()];
        let newly = !*slot;
        *slot = true;
        newly
    }

    pub fn is_complete(&self, prerequisite: Prerequisite) -> bool {
        self.done[prerequisite.index()]
    }

    pub fn is_ready(&self) -> bool {
        self.done.iter().all(|&done| done)
    }
}

/// Load progress observed so far
#[derive(Resource, Debug, Default)]
pub struct LoadProgress {
    pub gate: AssetGate,
    reported_failures: [bool; 3],
}

impl LoadProgress {
    /// True the first time a failure of `prerequisite` is seen
    fn report_failure(&mut self, prerequisite: Prerequisite) -> bool {
        let slot = &mut self.reported_failures[prerequisite.index()];
        let newly = !*slot;
        *slot = true;
        newly
    }
}

/// System: Kick off the three loads
pub fn start_asset_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    config: Res<CountdownConfig>,
) {
    let assets = CountdownAssets {
        font: asset_server.load(config.font_path),
        bachelor_title: asset_server.load(config.track(TrackId::Bachelor).title.path),
        master_title: asset_server.load(config.track(TrackId::Master).title.path),
    };

    info!("📦 Loading font and title models...");
    commands.insert_resource(assets);
}

/// System: Poll load states, place finished titles and open the gate
#[allow(clippy::too_many_arguments)]
pub fn watch_asset_loads(
    mut commands: Commands,
    asset_server: Res<AssetServer>,
    assets: Res<CountdownAssets>,
    gltfs: Res<Assets<Gltf>>,
    fonts: Res<Assets<GlyphFont>>,
    config: Res<CountdownConfig>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut progress: ResMut<LoadProgress>,
    mut next_phase: ResMut<NextState<CountdownPhase>>,
) {
    for prerequisite in Prerequisite::ALL {
        if progress.gate.is_complete(prerequisite) {
            continue;
        }

        let id = match prerequisite {
            Prerequisite::Font => assets.font.id().untyped(),
            Prerequisite::BachelorTitle => assets.bachelor_title.id().untyped(),
            Prerequisite::MasterTitle => assets.master_title.id().untyped(),
        };

        match asset_server.load_state(id) {
            LoadState::Loaded => {
                progress.gate.complete(prerequisite);
                info!("✅ {prerequisite:?} loaded");

                if prerequisite == Prerequisite::Font {
                    check_font_coverage(fonts.get(&assets.font));
                }

                if let Some(track) = prerequisite.title_track() {
                    let handle = match track {
                        TrackId::Bachelor => &assets.bachelor_title,
                        TrackId::Master => &assets.master_title,
                    };
                    let scene = gltfs.get(handle).and_then(|gltf| {
                        gltf.default_scene
                            .clone()
                            .or_else(|| gltf.scenes.first().cloned())
                    });
                    match scene {
                        Some(scene) => spawn_title_model(
                            &mut commands,
                            &mut materials,
                            scene,
                            track,
                            &config.track(track).title,
                        ),
                        None => warn!("{prerequisite:?} has no scene to display"),
                    }
                }
            }
            LoadState::Failed(err) => {
                if progress.report_failure(prerequisite) {
                    error!("Failed to load {prerequisite:?}: {err}");
                }
            }
            _ => {}
        }
    }

    if progress.gate.is_ready() {
        info!("🚀 All assets ready, starting countdown");
        next_phase.set(CountdownPhase::Running);
    }
}

/// Warn about characters the display needs but the font cannot draw
fn check_font_coverage(font: Option<&GlyphFont>) {
    let Some(font) = font else {
        return;
    };

    let needed = std::iter::once("0123456789:").chain(UNIT_LABELS);
    for text in needed {
        if !font.covers(text) {
            warn!("Font {:?} cannot draw every character of {text:?}", font.name);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_opens_only_when_all_complete() {
        let mut gate = AssetGate::default();
        assert!(!gate.is_ready());

        assert!(gate.complete(Prerequisite::MasterTitle));
        assert!(!gate.is_ready());
        assert!(gate.complete(Prerequisite::Font));
        assert!(!gate.is_ready());
        assert!(gate.complete(Prerequisite::BachelorTitle));
        assert!(gate.is_ready());
    }

    #[test]
    fn test_gate_order_does_not_matter() {
        let orders = [
            [
                Prerequisite::Font,
                Prerequisite::BachelorTitle,
                Prerequisite::MasterTitle,
            ],
            [
                Prerequisite::BachelorTitle,
                Prerequisite::MasterTitle,
                Prerequisite::Font,
            ],
            [
                Prerequisite::MasterTitle,
                Prerequisite::Font,
                Prerequisite::BachelorTitle,
            ],
        ];

        for order in orders {
            let mut gate = AssetGate::default();
            for (i, prerequisite) in order.into_iter().enumerate() {
                assert!(!gate.is_ready());
                gate.complete(prerequisite);
                assert_eq!(gate.is_ready(), i == 2);
            }
        }
    }

    #[test]
    fn test_repeat_completion_is_not_new() {
        let mut gate = AssetGate::default();
        assert!(gate.complete(Prerequisite::Font));
        assert!(!gate.complete(Prerequisite::Font));
        assert!(gate.is_complete(Prerequisite::Font));
        assert!(!gate.is_ready());
    }

    #[test]
    fn test_failure_reported_once() {
        let mut progress = LoadProgress::default();
        assert!(progress.report_failure(Prerequisite::BachelorTitle));
        assert!(!progress.report_failure(Prerequisite::BachelorTitle));
        assert!(progress.report_failure(Prerequisite::Font));
        assert!(!progress.gate.is_ready());
    }
}
