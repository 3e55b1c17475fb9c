pub mod animations;
pub mod countdown;
pub mod digits;
pub mod glyphs;
pub mod loading;
pub mod plugin;
pub mod setup;
pub mod titles;
