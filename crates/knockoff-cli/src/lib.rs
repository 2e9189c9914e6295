mod cli;
mod io;

pub use cli::{run, Args};
pub use io::{read_matrix, write_solution};
