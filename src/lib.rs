pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;
pub mod web;

pub use config::{CliArgs, UploaderConfig};
pub use core::dispatcher::UploadDispatcher;
pub use utils::error::{Result, UploaderError};
