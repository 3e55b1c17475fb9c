//! In-flight digit animations.
//!
//! Records are appended by the track diff and stepped once per frame.
//! A falling record owns a glyph that has left its slot; a dropping record
//! only borrows the slot's glyph until it settles.

use std::f32::consts::TAU;

use bevy::prelude::*;

use crate::config::AnimationTuning;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationKind {
    /// Retiring glyph tumbling out of view. `euler` holds its XYZ Euler
    /// angles, taken from the glyph's rotation on the first step.
    Falling { euler: Option<Vec3> },
    /// Incoming glyph easing down onto its slot's baseline
    Dropping { target_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationRecord {
    pub entity: Entity,
    pub kind: AnimationKind,
    pub progress: f64,
}

/// What the scheduler should do with a record after stepping it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Continue,
    /// Dropping glyph reached its slot; the glyph stays live
    Settled,
    /// Falling glyph is done; despawn it and release its assets
    Expired,
}

impl AnimationRecord {
    pub fn falling(entity: Entity) -> Self {
        Self {
            entity,
            kind: AnimationKind::Falling { euler: None },
            progress: 0.0,
        }
    }

    pub fn dropping(entity: Entity, target_y: f32) -> Self {
        Self {
            entity,
            kind: AnimationKind::Dropping { target_y },
            progress: 0.0,
        }
    }

    pub fn is_falling(&self) -> bool {
        matches!(self.kind, AnimationKind::Falling { .. })
    }

    /// Advance one frame and write the result into `transform`
    pub fn step(&mut self, transform: &mut Transform, tuning: &AnimationTuning) -> StepOutcome {
        self.progress += tuning.progress_step;

        match &mut self.kind {
            AnimationKind::Falling { euler } => {
                transform.translation.y -= self.progress as f32 * tuning.fall_speed;

                // a glyph cut off mid-drop keeps tumbling from its current angle
                let euler = euler
                    .get_or_insert_with(|| Vec3::from(transform.rotation.to_euler(EulerRot::XYZ)));
                euler.x += tuning.fall_spin_x;
                euler.z += tuning.fall_spin_z;
                transform.rotation = Quat::from_euler(EulerRot::XYZ, euler.x, euler.y, euler.z);

                if self.progress > tuning.falling_threshold {
                    StepOutcome::Expired
                } else {
                    StepOutcome::Continue
                }
            }
            AnimationKind::Dropping { target_y } => {
                let target_y = *target_y;
                let t = (self.progress / tuning.dropping_threshold).min(1.0) as f32;
                let ease = ease_out_cubic(t);

                // Reads the live y, so each frame eases from wherever the
                // previous frame left the glyph.
                let start_y = transform.translation.y;
                transform.translation.y = start_y - (start_y - target_y) * ease;
                transform.rotation = Quat::from_rotation_x((1.0 - ease) * TAU);

                if self.progress >= tuning.dropping_threshold {
                    transform.translation.y = target_y;
                    transform.rotation = Quat::IDENTITY;
                    StepOutcome::Settled
                } else {
                    StepOutcome::Continue
                }
            }
        }
    }
}

/// Ease-out cubic: fast at start, decelerates at end
pub fn ease_out_cubic(t: f32) -> f32 {
    let x = 1.0 - t;
    1.0 - x * x * x
}

/// Every live animation record, across both tracks
#[derive(Resource, Debug, Default)]
pub struct DigitAnimations {
    records: Vec<AnimationRecord>,
}

impl DigitAnimations {
    /// Hand a glyph that just left its slot over to a falling record.
    ///
    /// If the glyph was still dropping in, that record is cancelled so the
    /// glyph is only ever stepped by one record per frame.
    pub fn push_falling(&mut self, entity: Entity) {
        self.records
            .retain(|record| record.entity != entity || record.is_falling());
        self.records.push(AnimationRecord::falling(entity));
    }

    pub fn push_dropping(&mut self, entity: Entity, target_y: f32) {
        self.records.push(AnimationRecord::dropping(entity, target_y));
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &AnimationRecord> {
        self.records.iter()
    }

    /// Keep only the records for which `f` returns true
    pub fn retain_mut(&mut self, f: impl FnMut(&mut AnimationRecord) -> bool) {
        self.records.retain_mut(f);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity() -> Entity {
        World::new().spawn_empty().id()
    }

    #[test]
    fn test_falling_expires_once_past_threshold() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::falling(entity());
        let mut transform = Transform::from_xyz(0.0, 5.0, 0.0);

        let mut frames = 0;
        loop {
            let before = record.progress;
            let outcome = record.step(&mut transform, &tuning);
            frames += 1;
            if outcome == StepOutcome::Expired {
                assert!(record.progress > tuning.falling_threshold);
                assert!(before <= tuning.falling_threshold);
                break;
            }
            assert_eq!(outcome, StepOutcome::Continue);
            assert!(record.progress <= tuning.falling_threshold);
            assert!(frames < 100, "falling record never expired");
        }

        assert_eq!(frames, 30);
        assert!(transform.translation.y < 5.0);
    }

    #[test]
    fn test_dropping_settles_on_twentieth_frame() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::dropping(entity(), 5.0);
        let mut transform = Transform::from_xyz(0.0, 20.0, 0.0);

        for frame in 1..20 {
            assert_eq!(
                record.step(&mut transform, &tuning),
                StepOutcome::Continue,
                "settled early on frame {frame}"
            );
        }
        assert_eq!(record.step(&mut transform, &tuning), StepOutcome::Settled);
    }

    #[test]
    fn test_falling_moves_down_and_spins() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::falling(entity());
        let mut transform = Transform::from_xyz(1.0, 5.0, 0.0);

        record.step(&mut transform, &tuning);
        assert!((transform.translation.y - (5.0 - 0.05 * 0.3)).abs() < 1e-6);
        assert_eq!(transform.translation.x, 1.0);
        assert_ne!(transform.rotation, Quat::IDENTITY);

        let AnimationKind::Falling { euler: Some(euler) } = record.kind else {
            panic!("expected a seeded falling record");
        };
        assert!((euler.x - 0.1).abs() < 1e-6);
        assert!(euler.y.abs() < 1e-6);
        assert!((euler.z - 0.05).abs() < 1e-6);

        record.step(&mut transform, &tuning);
        let expected = Quat::from_euler(EulerRot::XYZ, 0.2, 0.0, 0.1);
        assert!(transform.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_falling_continues_from_current_rotation() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::falling(entity());
        let mut transform =
            Transform::from_xyz(0.0, 9.0, 0.0).with_rotation(Quat::from_rotation_x(1.0));

        record.step(&mut transform, &tuning);

        let expected = Quat::from_euler(EulerRot::XYZ, 1.1, 0.0, 0.05);
        assert!(transform.rotation.angle_between(expected) < 1e-4);
    }

    #[test]
    fn test_dropping_settles_exactly_on_target() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::dropping(entity(), 5.0);
        let mut transform = Transform::from_xyz(0.0, 20.0, 0.0);

        let mut last_y = transform.translation.y;
        let outcome = loop {
            let outcome = record.step(&mut transform, &tuning);
            if outcome != StepOutcome::Continue {
                break outcome;
            }
            assert!(record.progress < tuning.dropping_threshold);
            assert!(transform.translation.y <= last_y);
            assert!(transform.translation.y >= 5.0);
            last_y = transform.translation.y;
        };

        assert_eq!(outcome, StepOutcome::Settled);
        assert_eq!(transform.translation.y, 5.0);
        assert_eq!(transform.rotation, Quat::IDENTITY);
    }

    #[test]
    fn test_dropping_first_frame_eases_from_live_position() {
        let tuning = AnimationTuning::default();
        let mut record = AnimationRecord::dropping(entity(), 0.0);
        let mut transform = Transform::from_xyz(0.0, 15.0, 0.0);

        record.step(&mut transform, &tuning);
        let ease = ease_out_cubic(0.05);
        assert!((transform.translation.y - 15.0 * (1.0 - ease)).abs() < 1e-5);

        let y_after_first = transform.translation.y;
        record.step(&mut transform, &tuning);
        let ease = ease_out_cubic(0.1);
        assert!((transform.translation.y - y_after_first * (1.0 - ease)).abs() < 1e-5);
    }

    #[test]
    fn test_ease_out_cubic_bounds() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut last = 0.0;
        for i in 1..=20 {
            let v = ease_out_cubic(i as f32 / 20.0);
            assert!(v > last);
            last = v;
        }
    }

    #[test]
    fn test_push_falling_cancels_in_flight_drop() {
        let mut animations = DigitAnimations::default();
        let glyph = entity();

        animations.push_dropping(glyph, 5.0);
        assert_eq!(animations.len(), 1);

        animations.push_falling(glyph);
        assert_eq!(animations.len(), 1);
        assert!(animations.iter().all(AnimationRecord::is_falling));
    }
}
