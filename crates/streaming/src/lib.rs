pub mod io;
pub mod pipeline;

pub use io::*;
pub use pipeline::*;
