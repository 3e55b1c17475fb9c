//! Remaining-time computation and the fixed-width `DD:HH:MM:SS` field.

use std::fmt;

use chrono::{DateTime, FixedOffset, Utc};
#[cfg(test)]
use thiserror::Error;

/// Number of characters in a formatted time string
pub const SLOT_COUNT: usize = 11;

const MILLIS_PER_SECOND: i64 = 1000;
const MILLIS_PER_MINUTE: i64 = 60 * MILLIS_PER_SECOND;
const MILLIS_PER_HOUR: i64 = 60 * MILLIS_PER_MINUTE;
const MILLIS_PER_DAY: i64 = 24 * MILLIS_PER_HOUR;

/// Largest day count that still fits the two-character field
const MAX_DAYS: u32 = 99;

/// Slot indices holding the `:` separators
#[cfg(test)]
const SEPARATOR_SLOTS: [usize; 3] = [2, 5, 8];

/// A fixed point in time the display counts down to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deadline {
    label: &'static str,
    at: DateTime<FixedOffset>,
}

impl Deadline {
    pub fn new(label: &'static str, at: DateTime<FixedOffset>) -> Self {
        Self { label, at }
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn at(&self) -> DateTime<FixedOffset> {
        self.at
    }

    /// Time left before this deadline, as shown on the display
    pub fn remaining(&self, now: DateTime<Utc>) -> TimeString {
        remaining(&self.at, now)
    }
}

/// Decomposed remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Remaining {
    pub days: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl Remaining {
    /// Floor-divide a millisecond distance into display fields.
    /// Negative distances collapse to zero.
    pub fn from_millis(distance: i64) -> Self {
        if distance < 0 {
            return Self::default();
        }

        let days = distance / MILLIS_PER_DAY;
        let hours = (distance % MILLIS_PER_DAY) / MILLIS_PER_HOUR;
        let minutes = (distance % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        let seconds = (distance % MILLIS_PER_MINUTE) / MILLIS_PER_SECOND;

        Self {
            days: u32::try_from(days).unwrap_or(u32::MAX),
            hours: hours as u32,
            minutes: minutes as u32,
            seconds: seconds as u32,
        }
    }
}

#[cfg(test)]
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TimeStringError {
    #[error("time string must be 11 characters, got {0}")]
    Length(usize),
    #[error("unexpected character {found:?} at slot {slot}")]
    Character { slot: usize, found: char },
}

/// Exactly eleven ASCII characters in the pattern `DD:HH:MM:SS`
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeString([u8; SLOT_COUNT]);

impl TimeString {
    pub const ZERO: TimeString = TimeString(*b"00:00:00:00");

    pub fn from_remaining(remaining: Remaining) -> Self {
        let mut bytes = Self::ZERO.0;
        let fields = [
            remaining.days.min(MAX_DAYS),
            remaining.hours,
            remaining.minutes,
            remaining.seconds,
        ];

        for (field, value) in fields.into_iter().enumerate() {
            let start = field * 3;
            let value = value % 100;
            bytes[start] = b'0' + (value / 10) as u8;
            bytes[start + 1] = b'0' + (value % 10) as u8;
        }

        Self(bytes)
    }

    /// Validate a hand-written string against the fixed pattern
    #[cfg(test)]
    pub fn parse(text: &str) -> Result<Self, TimeStringError> {
        let chars: Vec<char> = text.chars().collect();
        if chars.len() != SLOT_COUNT {
            return Err(TimeStringError::Length(chars.len()));
        }

        let mut bytes = [0u8; SLOT_COUNT];
        for (slot, &ch) in chars.iter().enumerate() {
            let valid = if SEPARATOR_SLOTS.contains(&slot) {
                ch == ':'
            } else {
                ch.is_ascii_digit()
            };
            if !valid {
                return Err(TimeStringError::Character { slot, found: ch });
            }
            bytes[slot] = ch as u8;
        }

        Ok(Self(bytes))
    }

    /// Character at `slot` (0..11)
    pub fn char_at(&self, slot: usize) -> char {
        self.0[slot] as char
    }

    pub fn chars(&self) -> impl Iterator<Item = char> + '_ {
        self.0.iter().map(|&b| b as char)
    }

    /// Slots whose character differs from `other`
    pub fn changed_slots(&self, other: &TimeString) -> impl Iterator<Item = usize> + '_ {
        let other = other.0;
        (0..SLOT_COUNT).filter(move |&slot| self.0[slot] != other[slot])
    }
}

impl fmt::Display for TimeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in self.chars() {
            write!(f, "{ch}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for TimeString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TimeString(\"{self}\")")
    }
}

/// Remaining time until `deadline`, clamped at zero once it has passed
pub fn remaining(deadline: &DateTime<FixedOffset>, now: DateTime<Utc>) -> TimeString {
    let distance = deadline.with_timezone(&Utc) - now;
    TimeString::from_remaining(Remaining::from_millis(distance.num_milliseconds()))
}
