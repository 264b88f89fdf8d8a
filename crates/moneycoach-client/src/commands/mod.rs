pub mod common;
pub mod dash;
pub mod log;
pub mod reset;
pub mod settings;
pub mod setup;
