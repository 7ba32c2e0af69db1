pub mod error;
pub mod logger;
pub mod rotation;
pub mod telemetry;
pub mod validation;
