//! Type definitions for adchart

mod chart;
mod error;
mod point;

pub use chart::*;
pub use error::*;
pub use point::*;
