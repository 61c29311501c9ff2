pub mod config;
pub mod driver;
pub mod error;
pub mod headless;
pub mod keys;
pub mod logging;
pub mod ui;
