pub mod frame;
pub mod job;
pub mod viewport;

pub use frame::*;
pub use job::*;
pub use viewport::*;
