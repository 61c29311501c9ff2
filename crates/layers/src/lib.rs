pub mod raster;
pub mod symbology;
pub mod vector;

pub use raster::*;
pub use symbology::*;
pub use vector::*;
