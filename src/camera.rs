use std::f32::consts::{FRAC_PI_2, TAU};

use bevy::prelude::*;

use crate::input::{PointerButton, PointerEvent, PointerEventType, ScrollEvent};

/// Vertical field of view in degrees
const FOV_DEGREES: f32 = 77.0;
const CAMERA_DISTANCE: f32 = 13.0;

/// Keeps the orbit away from the poles so `looking_at` stays well defined
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ViewportSize>()
            .add_systems(Startup, setup_camera)
            .add_systems(Update, (update_viewport_size, orbit_camera).chain());
    }
}

/// Logical size of the primary window
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 720.0,
        }
    }
}

impl ViewportSize {
    pub fn aspect_ratio(&self) -> f32 {
        self.width / self.height.max(1.0)
    }
}

#[derive(Component)]
pub struct MainCamera;

/// Orbit/pan/zoom around a target with damped inertia.
///
/// Input accumulates into pending deltas; each frame applies `damping` of
/// the pending rotation and pan and keeps the rest for later frames, so
/// motion coasts to a stop after the pointer is released.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct OrbitController {
    pub target: Vec3,
    pub radius: f32,
    /// Rotation around +Y, 0 looks down -Z
    pub yaw: f32,
    /// Elevation above the XZ plane
    pub pitch: f32,
    pub damping: f32,
    pub rotate_speed: f32,
    /// Radius multiplier per scrolled line
    pub zoom_step: f32,
    pub min_radius: f32,
    pub max_radius: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            radius: CAMERA_DISTANCE,
            yaw: 0.0,
            pitch: 0.0,
            damping: 0.05,
            rotate_speed: 1.0,
            zoom_step: 0.95,
            min_radius: 2.0,
            max_radius: 60.0,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
        }
    }
}

impl OrbitController {
    /// Queue a rotation from a pointer drag of `delta` window pixels
    pub fn rotate(&mut self, delta: Vec2, viewport_height: f32) {
        let per_pixel = TAU / viewport_height.max(1.0) * self.rotate_speed;
        self.pending_yaw -= delta.x * per_pixel;
        self.pending_pitch += delta.y * per_pixel;
    }

    /// Queue a pan that keeps the point under the pointer roughly fixed
    pub fn pan(&mut self, delta: Vec2, viewport_height: f32, fov: f32) {
        let world_per_pixel = 2.0 * self.radius * (fov * 0.5).tan() / viewport_height.max(1.0);
        let rotation = self.rotation();
        let right = rotation * Vec3::X;
        let up = rotation * Vec3::Y;
        self.pending_pan += (-right * delta.x + up * delta.y) * world_per_pixel;
    }

    /// Zoom immediately; positive lines move closer
    pub fn zoom(&mut self, lines: f32) {
        self.radius = (self.radius * self.zoom_step.powf(lines)).clamp(self.min_radius, self.max_radius);
    }

    /// Apply one frame of pending motion
    pub fn advance(&mut self) {
        self.yaw += self.pending_yaw * self.damping;
        self.pitch = (self.pitch + self.pending_pitch * self.damping).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.target += self.pending_pan * self.damping;

        let keep = 1.0 - self.damping;
        self.pending_yaw *= keep;
        self.pending_pitch *= keep;
        self.pending_pan *= keep;
    }

    #[cfg(test)]
    pub fn is_coasting(&self) -> bool {
        self.pending_yaw.abs() > 1e-5 || self.pending_pitch.abs() > 1e-5 || self.pending_pan.length() > 1e-5
    }

    fn rotation(&self) -> Quat {
        Quat::from_euler(EulerRot::YXZ, self.yaw, -self.pitch, 0.0)
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.rotation() * Vec3::Z * self.radius
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.target, Vec3::Y)
    }
}

/// Setup a perspective camera looking at the display from +Z
fn setup_camera(mut commands: Commands) {
    let orbit = OrbitController::default();
    let transform = orbit.transform();

    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: FOV_DEGREES.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        transform,
        orbit,
        MainCamera,
    ));
}

/// Update the viewport resource when the window is resized.
/// The camera's own aspect ratio is kept in sync by Bevy.
fn update_viewport_size(mut viewport: ResMut<ViewportSize>, windows: Query<&Window>) {
    if let Ok(window) = windows.single() {
        let size = ViewportSize {
            width: window.width(),
            height: window.height(),
        };

        if (size.width - viewport.width).abs() > 0.5 || (size.height - viewport.height).abs() > 0.5 {
            *viewport = size;
            info!(
                "Viewport resized to {}x{} (aspect {:.3})",
                size.width,
                size.height,
                size.aspect_ratio()
            );
        }
    }
}

/// Feed pointer drags and wheel input into the orbit controller
fn orbit_camera(
    mut pointer_events: MessageReader<PointerEvent>,
    mut scroll_events: MessageReader<ScrollEvent>,
    viewport: Res<ViewportSize>,
    mut drag: Local<Option<(u64, PointerButton, Vec2)>>,
    mut cameras: Query<(&mut OrbitController, &mut Transform, &Projection), With<MainCamera>>,
) {
    let Ok((mut orbit, mut transform, projection)) = cameras.single_mut() else {
        return;
    };

    let fov = match projection {
        Projection::Perspective(perspective) => perspective.fov,
        _ => FOV_DEGREES.to_radians(),
    };

    for event in pointer_events.read() {
        match event.event_type {
            PointerEventType::Down => {
                if drag.is_none() {
                    *drag = Some((event.id, event.button, event.position));
                }
            }
            PointerEventType::Move => {
                let Some((id, button, last)) = *drag else {
                    continue;
                };
                if id != event.id || button != event.button {
                    continue;
                }

                let delta = event.position - last;
                match button {
                    PointerButton::Primary => orbit.rotate(delta, viewport.height),
                    PointerButton::Secondary => orbit.pan(delta, viewport.height, fov),
                }
                *drag = Some((id, button, event.position));
            }
            PointerEventType::Up => {
                if matches!(*drag, Some((id, button, _)) if id == event.id && button == event.button) {
                    *drag = None;
                }
            }
        }
    }

    for event in scroll_events.read() {
        orbit.zoom(event.lines);
    }

    orbit.advance();
    *transform = orbit.transform();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_eye_on_positive_z() {
        let orbit = OrbitController::default();
        let eye = orbit.eye();
        assert!((eye - Vec3::new(0.0, 0.0, 13.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotation_coasts_and_decays() {
        let mut orbit = OrbitController::default();
        orbit.rotate(Vec2::new(100.0, 0.0), 720.0);

        orbit.advance();
        let first = orbit.yaw;
        assert!(first < 0.0);

        orbit.advance();
        let second_step = orbit.yaw - first;
        assert!(second_step < 0.0);
        assert!(second_step.abs() < first.abs());

        for _ in 0..500 {
            orbit.advance();
        }
        assert!(!orbit.is_coasting());

        // total rotation converges on the full drag amount
        let expected = -100.0 * TAU / 720.0;
        assert!((orbit.yaw - expected).abs() < 1e-3);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut orbit = OrbitController::default();
        orbit.rotate(Vec2::new(0.0, 100_000.0), 720.0);
        for _ in 0..200 {
            orbit.advance();
        }
        assert!(orbit.pitch <= PITCH_LIMIT);
        assert!(orbit.eye().y > 0.0);
    }

    #[test]
    fn test_zoom_is_clamped() {
        let mut orbit = OrbitController::default();
        orbit.zoom(1.0);
        assert!((orbit.radius - 13.0 * 0.95).abs() < 1e-5);

        orbit.zoom(1_000.0);
        assert_eq!(orbit.radius, orbit.min_radius);
        orbit.zoom(-1_000.0);
        assert_eq!(orbit.radius, orbit.max_radius);
    }

    #[test]
    fn test_pan_moves_target_sideways() {
        let mut orbit = OrbitController::default();
        orbit.pan(Vec2::new(50.0, 0.0), 720.0, FOV_DEGREES.to_radians());
        for _ in 0..500 {
            orbit.advance();
        }
        assert!(orbit.target.x < 0.0);
        assert!(orbit.target.y.abs() < 1e-4);
        assert!(orbit.target.z.abs() < 1e-4);
    }

    #[test]
    fn test_viewport_aspect() {
        let viewport = ViewportSize {
            width: 1920.0,
            height: 1080.0,
        };
        assert!((viewport.aspect_ratio() - 16.0 / 9.0).abs() < 1e-5);
    }
}
