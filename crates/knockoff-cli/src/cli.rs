use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;

use knockoff_solver::ShrinkageSolver;

use crate::io::{read_matrix, write_solution};

/// Compute knockoff shrinkage coefficients s from a JSON matrix G by solving
/// maximize sum(s) s.t. 0 <= s <= 1, [[G, G - diag(s)], [G - diag(s), G]] >= 0.
#[derive(Debug, Parser)]
#[command(name = "solve-sdp", version)]
pub struct Args {
    /// JSON array of p arrays of p numbers. Standard input when omitted or "-".
    pub infile: Option<PathBuf>,

    /// Where to write the JSON array s. Standard output when omitted or "-".
    pub outfile: Option<PathBuf>,
}

/// Read G, solve, write s*. Returns s* for callers that want it.
pub fn run(args: &Args) -> Result<Vec<f64>> {
    let gram = match stream_path(&args.infile) {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("opening input {}", path.display()))?;
            read_matrix(BufReader::new(file))
                .with_context(|| format!("reading matrix from {}", path.display()))?
        }
        None => read_matrix(io::stdin().lock()).context("reading matrix from standard input")?,
    };
    debug!(p = gram.dim(), "read input matrix");

    let solution = ShrinkageSolver::new()
        .solve(&gram)
        .context("solving shrinkage SDP")?;

    match stream_path(&args.outfile) {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("creating output {}", path.display()))?;
            write_solution(BufWriter::new(file), &solution.s)
                .with_context(|| format!("writing solution to {}", path.display()))?;
        }
        None => write_solution(io::stdout().lock(), &solution.s)
            .context("writing solution to standard output")?,
    }

    Ok(solution.s)
}

fn stream_path(path: &Option<PathBuf>) -> Option<&Path> {
    match path.as_deref() {
        Some(p) if p == Path::new("-") => None,
        other => other,
    }
}
