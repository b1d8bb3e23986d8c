//! Plain-text data files: case inputs and the flat weight dump.

use std::fs;
use std::path::Path;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::feedforward::{Topology, Weights};

/// Reads the inputs of one case from a text file.
///
/// The first non-empty line holds exactly `width` whitespace-separated numbers;
/// anything after that line is ignored.
pub fn load_case_inputs(path: &Path, width: usize) -> Result<Vec<f64>> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;

    let (line_no, line) = contents
        .lines()
        .enumerate()
        .find(|(_, line)| !line.trim().is_empty())
        .ok_or_else(|| Error::Parse {
            path: path.to_owned(),
            line: 1,
            message: "file holds no values".to_owned(),
        })?;

    let values = line
        .split_whitespace()
        .map(|value| {
            value.parse::<f64>().map_err(|_| Error::Parse {
                path: path.to_owned(),
                line: line_no + 1,
                message: format!("can't parse value {:?}", value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if values.len() != width {
        return Err(Error::Parse {
            path: path.to_owned(),
            line: line_no + 1,
            message: format!("expected {} value(s), but got {}", width, values.len()),
        });
    }

    debug!(path = %path.display(), width, "loaded case inputs");
    Ok(values)
}

/// Loads weights written by `save_weights`, checking them against `topology`.
pub fn load_weights(path: &Path, topology: &Topology) -> Result<Weights> {
    let dump = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let weights = Weights::parse(topology, &dump).map_err(|source| Error::Weights {
        path: path.to_owned(),
        source,
    })?;
    debug!(path = %path.display(), %topology, "loaded weights");
    Ok(weights)
}

/// Writes weights as a flat dump: one line per source neuron, a blank line after each layer.
pub fn save_weights(path: &Path, weights: &Weights) -> Result<()> {
    if path.exists() {
        warn!(path = %path.display(), "overwriting existing weights file");
    }
    fs::write(path, weights.to_string()).map_err(|e| Error::io(path, e))?;
    debug!(path = %path.display(), "saved weights");
    Ok(())
}
