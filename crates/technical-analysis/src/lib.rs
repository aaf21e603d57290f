pub mod indicators;
pub mod percent_b;

#[cfg(test)]
mod indicators_tests;

pub use indicators::*;
pub use percent_b::*;
