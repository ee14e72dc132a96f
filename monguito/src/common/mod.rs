//! Shared constants, sort specifications and small utilities.

mod constants;
mod sort_order;
pub mod util;

pub use constants::*;
pub use sort_order::*;
pub use util::*;
