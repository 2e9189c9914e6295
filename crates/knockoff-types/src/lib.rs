mod error;
mod matrix;

pub use error::{KnockoffError, Result};
pub use matrix::GramMatrix;
