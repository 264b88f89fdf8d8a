pub mod aggregate;
pub mod coach;
pub mod commands;
pub mod config;
pub mod contracts;
pub mod error;
pub mod expense;
pub mod locale;
pub mod migrations;
pub mod profile;
pub mod prompt;
pub mod state;
pub mod store;
pub mod view;

pub use contracts::envelope::{FailureEnvelope, SuccessEnvelope};
pub use error::{ClientError, ClientResult};

pub const API_VERSION: &str = env!("CARGO_PKG_VERSION");
