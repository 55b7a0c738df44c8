pub mod boundaries;
pub mod error;
pub mod geojson;
pub mod geometry;
pub mod topojson;

pub use boundaries::*;
pub use error::*;
pub use geometry::*;
pub use topojson::Topology;
