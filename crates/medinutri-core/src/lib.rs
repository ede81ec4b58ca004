pub mod config;
pub mod error;
pub mod types;

pub use config::MediNutriConfig;
pub use error::{MediNutriError, Result};
pub use types::*;
