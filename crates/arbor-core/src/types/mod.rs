//! Domain types for binomial option pricing.
//!
//! - [`OptionSide`]: Call or put
//! - [`ExerciseStyle`]: European, American or averaging (Asian)
//! - [`PayoffStyle`]: Fixed or floating strike for averaging contracts

mod side;
mod style;

pub use side::OptionSide;
pub use style::{ExerciseStyle, PayoffStyle};
