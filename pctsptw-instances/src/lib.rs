mod error;
pub use error::*;
mod tokens;

pub mod metric;
pub mod pctsptw;
pub mod quota;
pub mod rewards;
pub mod tsptw;
