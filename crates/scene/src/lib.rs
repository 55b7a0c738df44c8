pub mod config;
pub mod globe;
pub mod picking;
pub mod shape;
pub mod view;

pub use config::*;
pub use globe::*;
pub use picking::*;
pub use shape::*;
pub use view::*;
