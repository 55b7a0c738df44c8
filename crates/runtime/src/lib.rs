pub mod input;
pub mod listeners;

pub use input::*;
pub use listeners::*;
