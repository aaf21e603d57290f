pub mod board;
pub mod config;
pub mod error;
pub mod format;
pub mod lenient;
pub mod shape;
pub mod stats;
pub mod types;

pub use board::*;
pub use config::*;
pub use error::*;
pub use format::*;
pub use shape::*;
pub use stats::*;
pub use types::*;
