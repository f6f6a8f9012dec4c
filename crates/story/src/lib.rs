//! Scroll-driven World Cup map story.
//!
//! Data flows one way: [`formats`] rows and records are normalized into
//! [`tournament::Tournament`]s, flattened into [`steps::Step`]s, and the
//! [`machine::StoryMachine`] turns focus changes into commands on a
//! [`present::Presenter`].

pub mod active;
pub mod audio;
pub mod camera;
pub mod config;
pub mod error;
pub mod flags;
pub mod focus;
pub mod machine;
pub mod normalize;
pub mod overlay;
pub mod panels;
pub mod present;
pub mod steps;
pub mod tournament;
pub mod transition;

#[cfg(test)]
mod test_support;

pub use config::StoryConfig;
pub use error::StoryError;
pub use machine::StoryMachine;
pub use present::Presenter;
pub use steps::{Step, StepKind, build_narrative_steps};
pub use transition::Story;
