pub mod config;
pub mod error;
pub mod model;
pub mod utils;

pub use config::ClientConfig;
pub use error::{Error, Result};
pub use model::*;
