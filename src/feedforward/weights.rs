use rand::{
    distributions::{Distribution, Uniform},
    Rng,
};
use std::fmt;
use thiserror::Error;

use super::topology::Topology;

/// Dense weight matrix between two adjacent layers.
///
/// Stored row-major: row `g` holds the weights leaving source neuron `g`,
/// `values = [row_0][row_1] ... [row_N]`, each row `dests` long.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightMatrix {
    sources: usize,
    dests: usize,
    values: Box<[f64]>,
}

impl WeightMatrix {
    fn filled(sources: usize, dests: usize, value: f64) -> WeightMatrix {
        WeightMatrix {
            sources,
            dests,
            values: vec![value; sources * dests].into_boxed_slice(),
        }
    }

    pub fn sources(&self) -> usize {
        self.sources
    }

    pub fn dests(&self) -> usize {
        self.dests
    }

    /// Weight from source neuron `source` to destination neuron `dest`.
    pub fn get(&self, source: usize, dest: usize) -> f64 {
        self.values[source * self.dests + dest]
    }

    pub fn set(&mut self, source: usize, dest: usize, value: f64) {
        self.values[source * self.dests + dest] = value;
    }

    /// Weights leaving source neuron `source`, one per destination neuron.
    pub fn row(&self, source: usize) -> &[f64] {
        &self.values[source * self.dests..(source + 1) * self.dests]
    }

    pub fn row_mut(&mut self, source: usize) -> &mut [f64] {
        &mut self.values[source * self.dests..(source + 1) * self.dests]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.dests)
    }
}

/// All weights of a network, one matrix per pair of adjacent layers.
///
/// `Weights` carries no biases: a neuron's weighted sum is only the dot product
/// of the previous layer's activations with its incoming weights.
#[derive(Debug, Clone, PartialEq)]
pub struct Weights {
    matrices: Box<[WeightMatrix]>,
}

impl Weights {
    /// Every weight set to `value`.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Topology, Weights};
    /// let topology = Topology::new(&[2, 2, 1]).unwrap();
    /// let weights = Weights::filled(&topology, 0.5);
    /// assert_eq!(weights.matrix(1).get(1, 0), 0.5);
    /// ```
    pub fn filled(topology: &Topology, value: f64) -> Weights {
        Weights {
            matrices: topology
                .transitions()
                .map(|(src, dst)| WeightMatrix::filled(src, dst, value))
                .collect(),
        }
    }

    /// Random weights drawn uniformly from `[min, max]`.
    ///
    /// # Panics
    /// If `min > max` or either bound is not finite.
    pub fn random<R: Rng + ?Sized>(topology: &Topology, min: f64, max: f64, rng: &mut R) -> Weights {
        let weights_between = Uniform::new_inclusive(min, max);
        Weights {
            matrices: topology
                .transitions()
                .map(|(src, dst)| WeightMatrix {
                    sources: src,
                    dests: dst,
                    values: (0..src * dst).map(|_| weights_between.sample(rng)).collect(),
                })
                .collect(),
        }
    }

    /// Builds weights from nested rows: `rows[k][g][b]` is the weight from neuron `g`
    /// of layer `k` to neuron `b` of layer `k + 1`.
    ///
    /// # Returns
    /// * `Ok(Weights)` if every dimension matches `topology`;
    /// * `Err(WeightsError)` otherwise.
    pub fn from_rows(topology: &Topology, rows: &[Vec<Vec<f64>>]) -> Result<Weights, WeightsError> {
        let transitions = topology.len() - 1;
        if rows.len() != transitions {
            return Err(WeightsError::BadLayerCount {
                expected: transitions,
                got: rows.len(),
            });
        }

        let mut matrices = Vec::with_capacity(transitions);
        for (layer, ((src, dst), layer_rows)) in topology.transitions().zip(rows).enumerate() {
            if layer_rows.len() != src {
                return Err(WeightsError::BadRowCount {
                    layer,
                    expected: src,
                    got: layer_rows.len(),
                });
            }
            let mut values = Vec::with_capacity(src * dst);
            for (row, weights) in layer_rows.iter().enumerate() {
                if weights.len() != dst {
                    return Err(WeightsError::BadRowWidth {
                        layer,
                        row,
                        expected: dst,
                        got: weights.len(),
                    });
                }
                values.extend_from_slice(weights);
            }
            matrices.push(WeightMatrix {
                sources: src,
                dests: dst,
                values: values.into_boxed_slice(),
            });
        }

        Ok(Weights {
            matrices: matrices.into_boxed_slice(),
        })
    }

    /// Parses the flat dump produced by `Weights`'s `Display`.
    ///
    /// One line per source neuron holding its outgoing weights separated by
    /// whitespace; layers follow each other in order. Blank lines between layers
    /// are skipped, so only the number of rows and their widths matter.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Topology, Weights};
    /// let topology = Topology::new(&[2, 1]).unwrap();
    /// let weights = Weights::parse(&topology, "0.25 \n-1.5 \n\n").unwrap();
    /// assert_eq!(weights.matrix(0).row(1), &[-1.5]);
    /// ```
    pub fn parse(topology: &Topology, dump: &str) -> Result<Weights, WeightsError> {
        let mut lines = dump
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .filter(|(_, line)| !line.is_empty());

        let mut rows = Vec::with_capacity(topology.len() - 1);
        for (layer, (src, dst)) in topology.transitions().enumerate() {
            let mut layer_rows = Vec::with_capacity(src);
            for row in 0..src {
                let (line_no, line) = lines.next().ok_or(WeightsError::BadRowCount {
                    layer,
                    expected: src,
                    got: row,
                })?;
                let weights = line
                    .split_whitespace()
                    .map(|value| {
                        value.parse::<f64>().map_err(|_| WeightsError::BadValue {
                            line: line_no,
                            value: value.to_owned(),
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if weights.len() != dst {
                    return Err(WeightsError::BadRowWidth {
                        layer,
                        row,
                        expected: dst,
                        got: weights.len(),
                    });
                }
                layer_rows.push(weights);
            }
            rows.push(layer_rows);
        }

        if let Some((line, _)) = lines.next() {
            return Err(WeightsError::TrailingData { line });
        }

        Weights::from_rows(topology, &rows)
    }

    /// Checks that the matrices have exactly the dimensions `topology` asks for.
    pub fn check_topology(&self, topology: &Topology) -> Result<(), WeightsError> {
        let transitions = topology.len() - 1;
        if self.matrices.len() != transitions {
            return Err(WeightsError::BadLayerCount {
                expected: transitions,
                got: self.matrices.len(),
            });
        }
        for (layer, ((src, dst), matrix)) in topology.transitions().zip(self.matrices.iter()).enumerate() {
            if matrix.sources != src {
                return Err(WeightsError::BadRowCount {
                    layer,
                    expected: src,
                    got: matrix.sources,
                });
            }
            if matrix.dests != dst {
                return Err(WeightsError::BadRowWidth {
                    layer,
                    row: 0,
                    expected: dst,
                    got: matrix.dests,
                });
            }
        }
        Ok(())
    }

    /// Matrix between layer `layer` and layer `layer + 1`.
    pub fn matrix(&self, layer: usize) -> &WeightMatrix {
        &self.matrices[layer]
    }

    pub fn matrix_mut(&mut self, layer: usize) -> &mut WeightMatrix {
        &mut self.matrices[layer]
    }

    pub fn matrices(&self) -> &[WeightMatrix] {
        &self.matrices
    }

    /// Nested copy of all weights, the inverse of `Weights::from_rows`.
    pub fn to_rows(&self) -> Vec<Vec<Vec<f64>>> {
        self.matrices
            .iter()
            .map(|matrix| matrix.rows().map(|row| row.to_vec()).collect())
            .collect()
    }
}

/// Writes the flat dump read back by `Weights::parse`.
///
/// Values use the shortest representation that parses back to the same `f64`,
/// so a dump reloads bit for bit.
impl fmt::Display for Weights {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for matrix in self.matrices.iter() {
            for row in matrix.rows() {
                for weight in row {
                    write!(f, "{} ", weight)?;
                }
                writeln!(f)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Error structure for weights that don't fit a topology
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WeightsError {
    #[error("Expected weights for {expected} layer transition(s), but got {got}!")]
    BadLayerCount { expected: usize, got: usize },
    #[error("Expected {expected} weight row(s) for layer {layer}, but got {got}!")]
    BadRowCount {
        layer: usize,
        expected: usize,
        got: usize,
    },
    #[error("Expected {expected} weight(s) in row {row} of layer {layer}, but got {got}!")]
    BadRowWidth {
        layer: usize,
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("Can't parse weight {value:?} on line {line}!")]
    BadValue { line: usize, value: String },
    #[error("Unexpected weights after the last layer, on line {line}!")]
    TrailingData { line: usize },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn topology() -> Topology {
        Topology::new(&[3, 2, 1]).unwrap()
    }

    #[test]
    fn random_weights_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let weights = Weights::random(&topology(), -1.5, 0.5, &mut rng);
        weights.check_topology(&topology()).unwrap();
        for matrix in weights.matrices() {
            for row in matrix.rows() {
                assert!(row.iter().all(|w| (-1.5..=0.5).contains(w)));
            }
        }
    }

    #[test]
    fn random_weights_are_reproducible_with_seed() {
        let a = Weights::random(&topology(), -1.0, 1.0, &mut StdRng::seed_from_u64(42));
        let b = Weights::random(&topology(), -1.0, 1.0, &mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn dump_layout_is_row_per_source_and_blank_line_per_layer() {
        let weights = Weights::from_rows(
            &topology(),
            &[
                vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]],
                vec![vec![0.5], vec![-0.25]],
            ],
        )
        .unwrap();
        assert_eq!(
            weights.to_string(),
            "1 2 \n3 4 \n5 6 \n\n0.5 \n-0.25 \n\n"
        );
    }

    #[test]
    fn parse_restores_exact_values() {
        let mut rng = StdRng::seed_from_u64(3);
        let weights = Weights::random(&topology(), -10.0, 10.0, &mut rng);
        let parsed = Weights::parse(&topology(), &weights.to_string()).unwrap();
        assert_eq!(parsed, weights);
    }

    #[test]
    fn parse_rejects_wrong_dimensions() {
        let topology = Topology::new(&[2, 1]).unwrap();
        assert_eq!(
            Weights::parse(&topology, "1 2\n3\n"),
            Err(WeightsError::BadRowWidth {
                layer: 0,
                row: 0,
                expected: 1,
                got: 2
            })
        );
        assert_eq!(
            Weights::parse(&topology, "1\n"),
            Err(WeightsError::BadRowCount {
                layer: 0,
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            Weights::parse(&topology, "1\n2\n\n3\n"),
            Err(WeightsError::TrailingData { line: 4 })
        );
        assert!(matches!(
            Weights::parse(&topology, "1\nabc\n"),
            Err(WeightsError::BadValue { line: 2, .. })
        ));
    }

    #[test]
    fn check_topology_detects_mismatch() {
        let weights = Weights::filled(&topology(), 0.1);
        let other = Topology::new(&[3, 4, 1]).unwrap();
        assert_eq!(
            weights.check_topology(&other),
            Err(WeightsError::BadRowWidth {
                layer: 0,
                row: 0,
                expected: 4,
                got: 2
            })
        );
    }
}
