pub mod animation;
pub mod clock;
pub mod track;

pub use animation::{DigitAnimations, StepOutcome};
pub use clock::Deadline;
pub use track::{DigitStage, TimerTrack, TrackId, TrackLayout, TrackUpdate};
