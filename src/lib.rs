pub mod config;
pub mod error;
pub mod license;
pub mod manifest;
pub mod resolver;
pub mod weights;

pub use error::{Result, WeightmapError};
pub use resolver::Resolver;
