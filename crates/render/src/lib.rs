pub mod clip;
pub mod config;
pub mod error;
pub mod frame;
pub mod globe;
pub mod paint;
pub mod svg;

pub use clip::*;
pub use config::*;
pub use error::*;
pub use frame::*;
pub use globe::*;
pub use paint::*;
pub use svg::to_svg;
