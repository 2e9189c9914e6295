use serde_json::Value;
use std::io::{Read, Write};

use knockoff_types::{GramMatrix, Result};

/// Read one JSON value (array of p arrays of p numbers) into G
pub fn read_matrix<R: Read>(reader: R) -> Result<GramMatrix> {
    let value: Value = serde_json::from_reader(reader)?;
    GramMatrix::from_json_value(&value)
}

/// Write s* as a single flat JSON array
pub fn write_solution<W: Write>(mut writer: W, s: &[f64]) -> Result<()> {
    serde_json::to_writer(&mut writer, s)?;
    writer.flush()?;
    Ok(())
}
