pub mod models;
pub mod return_rate;


pub use models::*;
pub use return_rate::*;
