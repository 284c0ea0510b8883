pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{InMemorySampleRepository, RestSampleRepository};
pub use config::TomlConfig;
pub use crate::core::{service::SampleService, session::PlateSession};
pub use utils::error::{IceError, Result};
