//! Generation - island maps and initial populations.

mod map;
mod population;

pub use map::*;
pub use population::*;
