pub mod angle;
pub mod config;
pub mod types;

pub use angle::*;
pub use config::*;
pub use types::*;
