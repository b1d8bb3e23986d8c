use thiserror::Error;

use super::topology::Topology;

/// One training or test case: inputs and the outputs the network should give for them.
#[derive(Debug, Clone, PartialEq)]
pub struct Case {
    pub inputs: Box<[f64]>,
    pub targets: Box<[f64]>,
}

impl Case {
    pub fn new(inputs: impl Into<Box<[f64]>>, targets: impl Into<Box<[f64]>>) -> Case {
        Case {
            inputs: inputs.into(),
            targets: targets.into(),
        }
    }
}

/// Ordered cases with sizes checked against a topology.
///
/// Order is kept exactly as given, training sweeps cases in that order.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSet {
    input_size: usize,
    output_size: usize,
    cases: Vec<Case>,
}

impl CaseSet {
    /// # Returns
    /// * `Ok(CaseSet)` if every case has `topology.input_size()` inputs and
    ///   `topology.output_size()` targets;
    /// * `Err(CaseError)` naming the first case that doesn't.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Case, CaseSet, Topology};
    /// let topology = Topology::new(&[2, 2, 1]).unwrap();
    /// let cases = CaseSet::new(&topology, vec![
    ///     Case::new(vec![0.0, 1.0], vec![1.0]),
    ///     Case::new(vec![1.0, 1.0], vec![0.0]),
    /// ]).unwrap();
    /// assert_eq!(cases.len(), 2);
    /// ```
    pub fn new(topology: &Topology, cases: Vec<Case>) -> Result<CaseSet, CaseError> {
        let input_size = topology.input_size();
        let output_size = topology.output_size();

        for (i, case) in cases.iter().enumerate() {
            if case.inputs.len() != input_size {
                return Err(CaseError::WrongInputsCount {
                    case: i,
                    expected: input_size,
                    got: case.inputs.len(),
                });
            }
            if case.targets.len() != output_size {
                return Err(CaseError::WrongTargetsCount {
                    case: i,
                    expected: output_size,
                    got: case.targets.len(),
                });
            }
        }

        Ok(CaseSet {
            input_size,
            output_size,
            cases,
        })
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }

    pub fn output_size(&self) -> usize {
        self.output_size
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Case> {
        self.cases.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Case> {
        self.cases.iter()
    }
}

impl<'a> IntoIterator for &'a CaseSet {
    type Item = &'a Case;
    type IntoIter = std::slice::Iter<'a, Case>;

    fn into_iter(self) -> Self::IntoIter {
        self.cases.iter()
    }
}

/// Error structure for `CaseSet::new`
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CaseError {
    #[error("Expected {expected} input(s), but cases[{case}] got {got}!")]
    WrongInputsCount {
        case: usize,
        expected: usize,
        got: usize,
    },
    #[error("Expected {expected} target(s), but cases[{case}] got {got}!")]
    WrongTargetsCount {
        case: usize,
        expected: usize,
        got: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_first_bad_case() {
        let topology = Topology::new(&[2, 1]).unwrap();
        let result = CaseSet::new(
            &topology,
            vec![
                Case::new(vec![0.0, 0.0], vec![0.0]),
                Case::new(vec![0.0, 0.0], vec![0.0, 1.0]),
                Case::new(vec![0.0], vec![0.0]),
            ],
        );
        assert_eq!(
            result,
            Err(CaseError::WrongTargetsCount {
                case: 1,
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn empty_case_set_is_allowed() {
        let topology = Topology::new(&[2, 1]).unwrap();
        let cases = CaseSet::new(&topology, vec![]).unwrap();
        assert!(cases.is_empty());
        assert_eq!(cases.input_size(), 2);
    }
}
