pub mod event_bus;
pub mod timers;
pub mod tween;

pub use event_bus::*;
pub use timers::*;
pub use tween::*;
