use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};
use thiserror::Error;

/// The number of neurons in each layer.
///
/// Layer 0 is the input layer, the last one is the output layer and everything
/// in between is hidden. A topology is validated once on construction and never
/// changes afterwards, so every buffer sized from it stays consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<usize>", into = "Vec<usize>")]
pub struct Topology {
    layers: Box<[usize]>,
}

impl Topology {
    /// Returns topology for given layer sizes.
    ///
    /// # Returns
    /// * `Ok(Topology)` if there are at least two layers and none of them is empty;
    /// * `Err(TopologyError)` otherwise.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::Topology;
    /// let topology = Topology::new(&[2, 5, 1]).unwrap();
    /// assert_eq!(topology.input_size(), 2);
    /// assert_eq!(topology.output_size(), 1);
    /// assert!(Topology::new(&[3]).is_err());
    /// ```
    pub fn new(layers: &[usize]) -> Result<Topology, TopologyError> {
        if layers.len() < 2 {
            return Err(TopologyError::TooFewLayers(layers.len()));
        }
        if let Some(index) = layers.iter().position(|&size| size == 0) {
            return Err(TopologyError::EmptyLayer(index));
        }

        Ok(Topology {
            layers: layers.to_owned().into_boxed_slice(),
        })
    }

    pub fn layers(&self) -> &[usize] {
        &self.layers
    }

    /// Number of layers, input and output included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Always `false`, a valid topology has at least two layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn input_size(&self) -> usize {
        self.layers[0]
    }

    pub fn output_size(&self) -> usize {
        self.layers[self.layers.len() - 1]
    }

    /// Iterates over `(source_size, dest_size)` of every pair of adjacent layers.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.layers.windows(2).map(|pair| (pair[0], pair[1]))
    }

    /// Total number of weights between all layers.
    pub fn weights_count(&self) -> usize {
        self.transitions().map(|(src, dst)| src * dst).sum()
    }
}

impl TryFrom<Vec<usize>> for Topology {
    type Error = TopologyError;

    fn try_from(layers: Vec<usize>) -> Result<Self, Self::Error> {
        Topology::new(&layers)
    }
}

impl From<Topology> for Vec<usize> {
    fn from(topology: Topology) -> Self {
        topology.layers.into_vec()
    }
}

/// Parses the dashed form used in reports, e.g. `2-5-1`.
impl FromStr for Topology {
    type Err = TopologyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let layers = s
            .split('-')
            .map(|part| {
                part.trim()
                    .parse::<usize>()
                    .map_err(|_| TopologyError::BadLayerSize(part.trim().to_owned()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Topology::new(&layers)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut layers = self.layers.iter();
        if let Some(first) = layers.next() {
            write!(f, "{}", first)?;
        }
        for size in layers {
            write!(f, "-{}", size)?;
        }
        Ok(())
    }
}

/// Error structure for `Topology::new`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TopologyError {
    #[error("Net must have at least two layers (input and output), but got {0} layer(s)!")]
    TooFewLayers(usize),
    #[error("Every layer must have at least one neuron, but layer {0} is empty!")]
    EmptyLayer(usize),
    #[error("Can't parse layer size {0:?}!")]
    BadLayerSize(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_single_layer() {
        assert_eq!(Topology::new(&[4]), Err(TopologyError::TooFewLayers(1)));
        assert_eq!(Topology::new(&[]), Err(TopologyError::TooFewLayers(0)));
    }

    #[test]
    fn rejects_empty_layer() {
        assert_eq!(
            Topology::new(&[3, 0, 1]),
            Err(TopologyError::EmptyLayer(1))
        );
    }

    #[test]
    fn dashed_form_round_trips() {
        let topology: Topology = "2-5-3-1".parse().unwrap();
        assert_eq!(topology.layers(), &[2, 5, 3, 1]);
        assert_eq!(topology.to_string(), "2-5-3-1");
        assert!("2-x-1".parse::<Topology>().is_err());
    }

    #[test]
    fn counts_weights_between_layers() {
        let topology = Topology::new(&[2, 3, 4]).unwrap();
        assert_eq!(
            topology.transitions().collect::<Vec<_>>(),
            vec![(2, 3), (3, 4)]
        );
        assert_eq!(topology.weights_count(), 2 * 3 + 3 * 4);
    }

    #[test]
    fn deserializes_from_json_array() {
        let topology: Topology = serde_json::from_str("[10, 4, 2]").unwrap();
        assert_eq!(topology.output_size(), 2);
        assert!(serde_json::from_str::<Topology>("[10]").is_err());
    }
}
