//! Reads numeric and text metrics out of scan-engine selection reasons.
//!
//! A selection reason is one line of comma-separated clauses produced per
//! matched window, for example
//! `60日平台期: 价格区间0.18, 均线收敛0.02, 波动率0.03, 低位: 从高点下跌45.20%, 高点日期2023-02-10`.

pub mod aggregate;
pub mod extract;
pub mod info;

pub use aggregate::*;
pub use extract::*;
pub use info::*;
