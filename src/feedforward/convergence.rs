use tracing::{debug, info};

use super::cases::CaseSet;
use super::net::{Net, SizeMismatch};
use super::trainer::{TrainError, Trainer};

/// When `Trainer::train_until` has to stop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopCriteria {
    /// Epoch cap. At least one epoch is always run.
    pub max_iterations: usize,

    /// Training stops once the average error of an epoch is at or below this value.
    pub error_threshold: f64,

    /// Log progress every that many epochs, `0` disables progress logging.
    pub progress_interval: usize,
}

impl StopCriteria {
    pub fn new(max_iterations: usize, error_threshold: f64) -> StopCriteria {
        StopCriteria {
            max_iterations,
            error_threshold,
            progress_interval: 0,
        }
    }

    pub fn with_progress_interval(mut self, progress_interval: usize) -> StopCriteria {
        self.progress_interval = progress_interval;
        self
    }
}

/// What `Trainer::train_until` ended with.
///
/// Both flags are evaluated after the last epoch, so both may be set.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrainingOutcome {
    pub epochs: usize,
    pub average_error: f64,
    pub max_iterations_reached: bool,
    pub error_threshold_reached: bool,
}

impl Trainer {
    fn check_case_set(&self, cases: &CaseSet) -> Result<(), TrainError> {
        let topology = &self.net.topology;
        if cases.input_size() != topology.input_size() {
            return Err(TrainError::BadInputs(SizeMismatch {
                expected: topology.input_size(),
                got: cases.input_size(),
            }));
        }
        if cases.output_size() != topology.output_size() {
            return Err(TrainError::BadTargets(SizeMismatch {
                expected: topology.output_size(),
                got: cases.output_size(),
            }));
        }
        if cases.is_empty() {
            return Err(TrainError::NoCases);
        }
        Ok(())
    }

    /// Trains on every case once, in order, and measures the error right after each
    /// case's own update.
    fn sweep(&mut self, cases: &CaseSet) -> f64 {
        let mut total_error = 0.0;
        for case in cases {
            self.train_case(&case.inputs, &case.targets);
            self.net.forward(&case.inputs, None);
            total_error += Net::half_squared_error(self.net.outputs(), &case.targets);
        }
        total_error / cases.len() as f64
    }

    /// Performs one epoch: `Trainer::train` for every case of `cases`, in order.
    ///
    /// # Returns
    /// * `Ok(f64)` - the average error over the epoch, every case measured just after
    ///   its own weight update;
    /// * `Err(TrainError)` if `cases` is empty or doesn't fit the network.
    pub fn train_epoch(&mut self, cases: &CaseSet) -> Result<f64, TrainError> {
        self.check_case_set(cases)?;
        Ok(self.sweep(cases))
    }

    /// Repeats epochs until `criteria` says to stop.
    ///
    /// After every epoch both conditions are checked: epoch count reaching
    /// `max_iterations` and average error at or below `error_threshold`.
    ///
    /// # Examples
    /// ```
    /// # use nlayer::feedforward::{Case, CaseSet, Net, StopCriteria, Topology, Weights};
    /// let topology = Topology::new(&[2, 3, 1]).unwrap();
    /// let cases = CaseSet::new(&topology, vec![Case::new(vec![1.0, 0.5], vec![0.8])]).unwrap();
    /// let mut trainer = Net::new(topology.clone(), Weights::filled(&topology, 0.2))
    ///     .unwrap()
    ///     .build_trainer(0.5);
    ///
    /// let outcome = trainer.train_until(&cases, &StopCriteria::new(100, 0.0)).unwrap();
    /// assert_eq!(outcome.epochs, 100);
    /// assert!(outcome.max_iterations_reached);
    /// ```
    pub fn train_until(
        &mut self,
        cases: &CaseSet,
        criteria: &StopCriteria,
    ) -> Result<TrainingOutcome, TrainError> {
        self.check_case_set(cases)?;
        debug!(
            cases = cases.len(),
            max_iterations = criteria.max_iterations,
            error_threshold = criteria.error_threshold,
            "training started"
        );

        let mut epochs = 0;
        loop {
            let average_error = self.sweep(cases);
            epochs += 1;

            if criteria.progress_interval != 0 && epochs % criteria.progress_interval == 0 {
                info!(epoch = epochs, average_error, "training progress");
            }

            let max_iterations_reached = epochs >= criteria.max_iterations;
            let error_threshold_reached = average_error <= criteria.error_threshold;
            if max_iterations_reached || error_threshold_reached {
                info!(
                    epochs,
                    average_error, max_iterations_reached, error_threshold_reached, "training finished"
                );
                return Ok(TrainingOutcome {
                    epochs,
                    average_error,
                    max_iterations_reached,
                    error_threshold_reached,
                });
            }
        }
    }
}
