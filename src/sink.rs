//! Channel types for feeding probe data from a simulator into the visualizer.
//!
//! The simulator runs on its own thread and owns a [`ProbeSink`]. Every batch
//! is tagged with the `(target, capability)` pair it was probed from; the UI
//! thread dispatches it to the plots subscribed to that pair.

use std::sync::mpsc::{Receiver, SendError, Sender};

use crate::data::samples::SampleBlock;

/// One block of probed samples.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeBatch {
    /// Label of the probed target.
    pub target: String,
    /// Name of the probed capability.
    pub capability: String,
    /// Simulation step of the first row of `data`.
    pub start_step: u64,
    /// Simulated seconds per step.
    pub step_size: f64,
    /// `(samples × dimensions)`.
    pub data: SampleBlock,
}

/// Sending half of the probe channel.
#[derive(Clone)]
pub struct ProbeSink {
    tx: Sender<ProbeBatch>,
}

impl ProbeSink {
    pub fn send(&self, batch: ProbeBatch) -> Result<(), SendError<ProbeBatch>> {
        self.tx.send(batch)
    }

    /// Send a block for `(target, capability)`.
    pub fn send_batch(
        &self,
        target: impl Into<String>,
        capability: impl Into<String>,
        start_step: u64,
        step_size: f64,
        data: SampleBlock,
    ) -> Result<(), SendError<ProbeBatch>> {
        self.send(ProbeBatch {
            target: target.into(),
            capability: capability.into(),
            start_step,
            step_size,
            data,
        })
    }
}

/// Create a new probe channel.
pub fn channel() -> (ProbeSink, Receiver<ProbeBatch>) {
    let (tx, rx) = std::sync::mpsc::channel();
    (ProbeSink { tx }, rx)
}
