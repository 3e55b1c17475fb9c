//! Per-track digit diffing.
//!
//! A track remembers the last string it painted and which glyph entity sits in
//! each of its eleven slots. Only slots whose character changed get new
//! glyphs; everything else is left alone.

use bevy::prelude::*;

use super::animation::DigitAnimations;
use super::clock::{Deadline, SLOT_COUNT, TimeString};

/// Slot offsets (in spacings) of the day, hour, min and sec labels:
/// the middle of each two-digit field.
pub const UNIT_SLOT_CENTERS: [f32; 4] = [0.5, 3.5, 6.5, 9.5];
pub const UNIT_LABELS: [&str; 4] = ["day", "hour", "min", "sec"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackId {
    Bachelor,
    Master,
}

/// Whatever spawns and tints glyphs for a track
pub trait DigitStage {
    fn spawn_digit(&mut self, track: TrackId, slot: usize, ch: char, position: Vec3) -> Entity;
    fn spawn_unit(&mut self, track: TrackId, label: &str, position: Vec3) -> Entity;
    /// Recolour a glyph that is about to fall
    fn tint_falling(&mut self, glyph: Entity);
}

/// Row geometry shared by every slot of a track
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackLayout {
    pub baseline_y: f32,
    pub spacing: f32,
    pub drop_height: f32,
    pub unit_row_offset: f32,
}

impl TrackLayout {
    /// X of slot 0; the row is centred on the origin
    pub fn start_x(&self) -> f32 {
        -(SLOT_COUNT as f32 * self.spacing) / 2.0
    }

    pub fn slot_position(&self, slot: usize) -> Vec3 {
        Vec3::new(
            self.start_x() + slot as f32 * self.spacing,
            self.baseline_y,
            0.0,
        )
    }

    pub fn unit_position(&self, unit: usize) -> Vec3 {
        Vec3::new(
            self.start_x() + UNIT_SLOT_CENTERS[unit] * self.spacing,
            self.baseline_y - self.unit_row_offset,
            0.0,
        )
    }
}

/// What an update did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackUpdate {
    /// All slots and unit labels were created without animation
    FirstPaint,
    /// These slots were swapped for new glyphs
    Changed(Vec<usize>),
    Unchanged,
}

#[derive(Debug)]
pub struct TimerTrack {
    id: TrackId,
    deadline: Deadline,
    layout: TrackLayout,
    /// `None` until the first paint
    previous: Option<TimeString>,
    slots: [Option<Entity>; SLOT_COUNT],
    units: Vec<Entity>,
}

impl TimerTrack {
    pub fn new(id: TrackId, deadline: Deadline, layout: TrackLayout) -> Self {
        Self {
            id,
            deadline,
            layout,
            previous: None,
            slots: [None; SLOT_COUNT],
            units: Vec::with_capacity(UNIT_LABELS.len()),
        }
    }

    pub fn deadline(&self) -> &Deadline {
        &self.deadline
    }

    #[cfg(test)]
    pub fn previous(&self) -> Option<&TimeString> {
        self.previous.as_ref()
    }

    #[cfg(test)]
    pub fn slot(&self, slot: usize) -> Option<Entity> {
        self.slots[slot]
    }

    #[cfg(test)]
    pub fn units(&self) -> &[Entity] {
        &self.units
    }

    /// Bring the track's glyphs in line with `current`
    pub fn update(
        &mut self,
        current: &TimeString,
        stage: &mut impl DigitStage,
        animations: &mut DigitAnimations,
    ) -> TrackUpdate {
        let Some(previous) = self.previous else {
            self.first_paint(current, stage);
            self.previous = Some(*current);
            return TrackUpdate::FirstPaint;
        };

        let changed: Vec<usize> = current.changed_slots(&previous).collect();
        if changed.is_empty() {
            return TrackUpdate::Unchanged;
        }

        for &slot in &changed {
            if let Some(outgoing) = self.slots[slot].take() {
                stage.tint_falling(outgoing);
                animations.push_falling(outgoing);
            }

            let target = self.layout.slot_position(slot);
            let start = target + Vec3::Y * self.layout.drop_height;
            let incoming = stage.spawn_digit(self.id, slot, current.char_at(slot), start);
            self.slots[slot] = Some(incoming);
            animations.push_dropping(incoming, target.y);
        }

        self.previous = Some(*current);
        TrackUpdate::Changed(changed)
    }

    fn first_paint(&mut self, current: &TimeString, stage: &mut impl DigitStage) {
        for (slot, ch) in current.chars().enumerate() {
            let position = self.layout.slot_position(slot);
            self.slots[slot] = Some(stage.spawn_digit(self.id, slot, ch, position));
        }

        for (unit, label) in UNIT_LABELS.iter().enumerate() {
            let position = self.layout.unit_position(unit);
            self.units.push(stage.spawn_unit(self.id, label, position));
        }
    }
}
