pub mod aggregate;
pub mod application;
pub mod domain;
pub mod error;
pub mod ports;
pub mod reports;
pub mod utils;

pub use error::PipelineError;
