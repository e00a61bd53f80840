pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod upload;

pub use error::{EtlError, Result};
